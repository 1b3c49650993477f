use std::collections::HashMap;

use glam::Mat4;
use hecs::{Entity, Ref, World};
use log::{debug, trace};

use crate::{
    collision::{
        Collider, ColliderPair, CollisionEvent, CollisionEventKind, CollisionPoints,
        CollisionRecord, GjkConfig,
    },
    scene::active_colliders,
};

/// Narrow phase for one scene.
///
/// Keeps one record per collider pair ever tested and turns the per-tick
/// boolean outcome into enter / colliding / exit events.
#[derive(Debug, Default)]
pub struct PhysicsWorld {
    config: GjkConfig,
    records: HashMap<ColliderPair, CollisionRecord>,
    pairs_tested_last_tick: usize,
}

impl PhysicsWorld {
    pub fn new(config: GjkConfig) -> PhysicsWorld {
        Self {
            config,
            records: HashMap::new(),
            pairs_tested_last_tick: 0,
        }
    }

    /// Tests every unordered pair of active colliders once. Transforms must
    /// already reflect this tick.
    pub fn update(&mut self, world: &World) -> Vec<CollisionEvent> {
        let colliders: Vec<(Entity, Mat4, Ref<'_, Collider>)> = active_colliders(world)
            .into_iter()
            .filter_map(|(entity, transform)| {
                let collider = world.get::<&Collider>(entity).ok()?;
                Some((entity, transform, collider))
            })
            .collect();

        let mut events: Vec<CollisionEvent> = Vec::new();
        let mut pairs_tested = 0;

        // Iterate over all unique pairs
        for i in 0..colliders.len() {
            for j in (i + 1)..colliders.len() {
                let (entity_a, transform_a, collider_a) = &colliders[i];
                let (entity_b, transform_b, collider_b) = &colliders[j];

                let record = self
                    .records
                    .entry(ColliderPair::new(*entity_a, *entity_b))
                    .or_insert_with(|| {
                        debug!("New collision record for {entity_a:?} and {entity_b:?}");
                        CollisionRecord::new(*entity_a, *entity_b)
                    });

                let was_colliding = record.has_collision();
                let has_collision = collider_a.test_collision_with(
                    collider_b,
                    transform_a,
                    transform_b,
                    &self.config,
                );
                record.points = CollisionPoints {
                    has_collision,
                    ..Default::default()
                };
                pairs_tested += 1;

                let transition = CollisionEventKind::from_transition(was_colliding, has_collision);
                if let Some(kind) = transition {
                    trace!("{kind:?}: {entity_a:?} and {entity_b:?}");
                    events.push(CollisionEvent {
                        a: *entity_a,
                        b: *entity_b,
                        kind,
                    });
                }
            }
        }
        self.pairs_tested_last_tick = pairs_tested;
        events
    }

    pub fn record(&self, a: Entity, b: Entity) -> Option<&CollisionRecord> {
        if a == b {
            return None;
        }
        self.records.get(&ColliderPair::new(a, b))
    }

    pub fn records(&self) -> impl Iterator<Item = &CollisionRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn pairs_tested_last_tick(&self) -> usize {
        self.pairs_tested_last_tick
    }

    /// Drops records whose colliders no longer exist. `update` never does this
    /// on its own.
    pub fn prune_stale(&mut self, world: &World) -> usize {
        let before = self.records.len();
        self.records.retain(|pair, _| {
            let (a, b) = pair.entities();
            world.contains(a) && world.contains(b)
        });
        let pruned = before - self.records.len();
        if pruned > 0 {
            debug!("Pruned {pruned} stale collision records");
        }
        pruned
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.pairs_tested_last_tick = 0;
    }
}
