use glam::{Mat4, Vec3};
use hecs::{Entity, World};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::collision::Collider;

mod description;

pub use description::{BodyDescription, SceneDescription, SceneError};

/// Deeper chains are treated as a parent cycle
pub const MAX_HIERARCHY_DEPTH: usize = 64;

/// Local transform, relative to `Parent` if present
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Transform(pub Mat4);
pub struct Velocity(pub Vec3);
pub struct Parent(pub Entity);
/// Disables the entity and all of its descendants
pub struct Hidden;
pub struct Name(pub String);

pub fn system_movement(world: &mut World, dt: f32) {
    for (_entity, (transform, velocity)) in world.query_mut::<(&mut Transform, &Velocity)>() {
        transform.0.w_axis.x += velocity.0.x * dt;
        transform.0.w_axis.y += velocity.0.y * dt;
        transform.0.w_axis.z += velocity.0.z * dt;
    }
}

fn local_transform(world: &World, entity: Entity) -> Mat4 {
    world
        .get::<&Transform>(entity)
        .map(|transform| transform.0)
        .unwrap_or(Mat4::IDENTITY)
}

/// Parent of `entity`, ignoring links to despawned entities
fn parent_of(world: &World, entity: Entity) -> Option<Entity> {
    let parent = world.get::<&Parent>(entity).ok()?.0;
    world.contains(parent).then_some(parent)
}

pub fn world_transform(world: &World, entity: Entity) -> Mat4 {
    let mut transform = local_transform(world, entity);
    let mut current = entity;
    for _ in 0..MAX_HIERARCHY_DEPTH {
        let Some(parent) = parent_of(world, current) else {
            return transform;
        };
        transform = local_transform(world, parent) * transform;
        current = parent;
    }
    warn!("Hierarchy of {entity:?} is deeper than {MAX_HIERARCHY_DEPTH}, assuming a parent cycle");
    transform
}

/// False if the entity or any of its ancestors is hidden
pub fn is_active(world: &World, entity: Entity) -> bool {
    let mut current = entity;
    for _ in 0..=MAX_HIERARCHY_DEPTH {
        if world.get::<&Hidden>(current).is_ok() {
            return false;
        }
        match parent_of(world, current) {
            Some(parent) => current = parent,
            None => return true,
        }
    }
    true
}

/// Active collider entities and their world transforms, sorted by entity id
pub fn active_colliders(world: &World) -> Vec<(Entity, Mat4)> {
    let mut query = world.query::<&Collider>();
    let mut colliders: Vec<(Entity, Mat4)> = query
        .iter()
        .map(|(entity, _collider)| entity)
        .filter(|entity| is_active(world, *entity))
        .map(|entity| (entity, world_transform(world, entity)))
        .collect();
    colliders.sort_by_key(|(entity, _)| entity.id());
    colliders
}
