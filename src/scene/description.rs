use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
    sync::Arc,
};

use glam::{Mat4, Quat, Vec3};
use hecs::{Entity, EntityBuilder, World};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::{Collider, ConvexShape, GjkConfig, ShapeError};

use super::{Hidden, Name, Parent, Transform, Velocity};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Could not read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid scene description: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Body '{0}' is declared more than once")]
    DuplicateBody(String),
    #[error("Body '{body}' references unknown parent '{parent}'")]
    UnknownParent { body: String, parent: String },
    #[error("Body '{body}' has an invalid shape: {source}")]
    InvalidShape {
        body: String,
        #[source]
        source: ShapeError,
    },
    #[error(transparent)]
    NoSuchEntity(#[from] hecs::NoSuchEntity),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BodyDescription {
    pub name: String,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub velocity: Vec3,
    pub parent: Option<String>,
    pub hidden: bool,
    /// No shapes means no collider
    pub shapes: Vec<ConvexShape>,
}

impl Default for BodyDescription {
    fn default() -> Self {
        Self {
            name: String::new(),
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            velocity: Vec3::ZERO,
            parent: None,
            hidden: false,
            shapes: Vec::new(),
        }
    }
}

impl BodyDescription {
    fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SceneDescription {
    pub gjk: GjkConfig,
    pub bodies: Vec<BodyDescription>,
}

impl SceneDescription {
    pub fn from_json_str(json: &str) -> Result<SceneDescription, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<SceneDescription, SceneError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Two unit spheres approaching along x, passing through each other
    pub fn approaching_spheres() -> SceneDescription {
        let sphere = ConvexShape::Sphere { radius: 1.0 };
        Self {
            gjk: GjkConfig::default(),
            bodies: vec![
                BodyDescription {
                    name: "mover".to_string(),
                    translation: Vec3::new(-4.0, 0.0, 0.0),
                    velocity: Vec3::new(2.0, 0.0, 0.0),
                    shapes: vec![sphere.clone()],
                    ..Default::default()
                },
                BodyDescription {
                    name: "target".to_string(),
                    translation: Vec3::new(4.0, 0.25, 0.0),
                    shapes: vec![sphere.clone()],
                    ..Default::default()
                },
                BodyDescription {
                    name: "ghost".to_string(),
                    translation: Vec3::new(4.0, 0.0, 0.0),
                    hidden: true,
                    shapes: vec![sphere],
                    ..Default::default()
                },
            ],
        }
    }

    /// Spawns every body, returning entities by name. Nothing is spawned if
    /// the description is invalid.
    pub fn spawn(&self, world: &mut World) -> Result<HashMap<String, Entity>, SceneError> {
        let colliders = self.validate()?;

        let mut entities: HashMap<String, Entity> = HashMap::new();
        for (body, collider) in self.bodies.iter().zip(colliders) {
            let mut builder = EntityBuilder::new();
            builder.add(Name(body.name.clone()));
            builder.add(Transform(body.transform()));
            if body.velocity != Vec3::ZERO {
                builder.add(Velocity(body.velocity));
            }
            if body.hidden {
                builder.add(Hidden);
            }
            if let Some(collider) = collider {
                builder.add(collider);
            }
            let entity = world.spawn(builder.build());
            debug!("Spawned body '{}' as {entity:?}", body.name);
            entities.insert(body.name.clone(), entity);
        }

        // Parents may be declared after their children
        for body in &self.bodies {
            if let Some(parent) = &body.parent {
                world.insert_one(entities[&body.name], Parent(entities[parent]))?;
            }
        }
        Ok(entities)
    }

    fn validate(&self) -> Result<Vec<Option<Collider>>, SceneError> {
        let mut names: HashSet<&str> = HashSet::new();
        for body in &self.bodies {
            if !names.insert(&body.name) {
                return Err(SceneError::DuplicateBody(body.name.clone()));
            }
        }

        let mut colliders = Vec::with_capacity(self.bodies.len());
        for body in &self.bodies {
            if let Some(parent) = &body.parent {
                if !names.contains(parent.as_str()) {
                    return Err(SceneError::UnknownParent {
                        body: body.name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
            if body.shapes.is_empty() {
                colliders.push(None);
                continue;
            }
            let mut collider = Collider::default();
            for shape in &body.shapes {
                let shape = shape
                    .clone()
                    .validated()
                    .map_err(|source| SceneError::InvalidShape {
                        body: body.name.clone(),
                        source,
                    })?;
                collider.add_shape(Arc::new(shape));
            }
            colliders.push(Some(collider));
        }
        Ok(colliders)
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4Swizzles};
    use hecs::World;

    use crate::{
        collision::{Collider, CollisionEventKind, ConvexShape, PhysicsWorld},
        scene::{Hidden, Parent, Velocity, system_movement, world_transform},
    };

    use super::{SceneDescription, SceneError};

    const SCENE: &str = r#"{
        "gjk": { "max_iterations": 32 },
        "bodies": [
            { "name": "arm", "translation": [0, 1, 0], "parent": "base",
              "shapes": [ { "Sphere": { "radius": 0.5 } } ] },
            { "name": "base", "translation": [5, 0, 0], "velocity": [0, 0, 1] },
            { "name": "crate", "translation": [5, 1, 0], "hidden": true,
              "shapes": [ { "Mesh": { "vertices": [[0, 0, 0], [1, 0, 0], [0, 0, 0]] } } ] }
        ]
    }"#;

    #[test]
    fn test_load_and_spawn() {
        let description = SceneDescription::from_json_str(SCENE).unwrap();
        assert_eq!(description.gjk.max_iterations, 32);
        // Missing field keeps its default
        assert_eq!(description.gjk.tolerance, 1e-5);

        let mut world = World::new();
        let entities = description.spawn(&mut world).unwrap();
        assert_eq!(entities.len(), 3);

        let arm = entities["arm"];
        let base = entities["base"];
        let crate_entity = entities["crate"];
        assert_eq!(world.get::<&Parent>(arm).unwrap().0, base);
        assert!(world.get::<&Velocity>(base).is_ok());
        assert!(world.get::<&Collider>(base).is_err());
        assert!(world.get::<&Hidden>(crate_entity).is_ok());
        let position = world_transform(&world, arm).w_axis.xyz();
        assert_eq!(position, Vec3::new(5.0, 1.0, 0.0));

        // Mesh vertices are deduplicated on load
        let collider = world.get::<&Collider>(crate_entity).unwrap();
        match collider.shapes()[0].as_ref() {
            ConvexShape::Mesh { vertices } => assert_eq!(vertices.len(), 2),
            other => panic!("Unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_unknown_parent() {
        let json = r#"{ "bodies": [ { "name": "a", "parent": "nope" } ] }"#;
        let description = SceneDescription::from_json_str(json).unwrap();
        let mut world = World::new();
        let result = description.spawn(&mut world);
        assert!(matches!(result, Err(SceneError::UnknownParent { .. })));
        assert_eq!(world.len(), 0, "Nothing spawned for an invalid scene");
    }

    #[test]
    fn test_duplicate_body() {
        let json = r#"{ "bodies": [ { "name": "a" }, { "name": "a" } ] }"#;
        let description = SceneDescription::from_json_str(json).unwrap();
        let result = description.spawn(&mut World::new());
        assert!(matches!(result, Err(SceneError::DuplicateBody(name)) if name == "a"));
    }

    #[test]
    fn test_invalid_shape() {
        let json = r#"{ "bodies": [
            { "name": "a", "shapes": [ { "Mesh": { "vertices": [] } } ] }
        ] }"#;
        let description = SceneDescription::from_json_str(json).unwrap();
        let result = description.spawn(&mut World::new());
        assert!(matches!(result, Err(SceneError::InvalidShape { .. })));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            SceneDescription::from_json_str("{ bodies"),
            Err(SceneError::Json(_))
        ));
    }

    #[test]
    fn test_approaching_spheres_scene() {
        let description = SceneDescription::approaching_spheres();
        let mut world = World::new();
        let entities = description.spawn(&mut world).unwrap();
        let mut physics = PhysicsWorld::new(description.gjk);

        let mut kinds = Vec::new();
        for _ in 0..80 {
            system_movement(&mut world, 0.1);
            for event in physics.update(&world) {
                assert!(event.concerns(entities["mover"]));
                assert!(!event.concerns(entities["ghost"]));
                kinds.push(event.kind);
            }
        }
        assert_eq!(kinds.first(), Some(&CollisionEventKind::Enter));
        assert_eq!(kinds.last(), Some(&CollisionEventKind::Exit));
        let colliding = kinds
            .iter()
            .filter(|kind| **kind == CollisionEventKind::Colliding)
            .count();
        assert_eq!(colliding, kinds.len() - 2);
        assert!(colliding > 10);
    }
}
