use std::sync::Arc;

use glam::Mat4;
use log::error;

use super::{
    ConvexShape,
    gjk::{self, GjkConfig, GjkError},
};

/// Collision participant. Owns shared, read-only convex shapes; the world
/// transform is supplied per query.
#[derive(Debug, Clone, Default)]
pub struct Collider {
    shapes: Vec<Arc<ConvexShape>>,
}

impl Collider {
    pub fn new(shapes: Vec<Arc<ConvexShape>>) -> Collider {
        Self { shapes }
    }

    pub fn from_shape(shape: ConvexShape) -> Collider {
        Self {
            shapes: vec![Arc::new(shape)],
        }
    }

    pub fn add_shape(&mut self, shape: Arc<ConvexShape>) {
        self.shapes.push(shape);
    }

    pub fn shapes(&self) -> &[Arc<ConvexShape>] {
        &self.shapes
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn test_collision(
        &self,
        other: &Collider,
        transform_self: &Mat4,
        transform_other: &Mat4,
    ) -> bool {
        self.test_collision_with(
            other,
            transform_self,
            transform_other,
            &GjkConfig::default(),
        )
    }

    /// True if any shape of `self` intersects any shape of `other`.
    ///
    /// Panics if GJK reports a broken simplex invariant. Other GJK failures are
    /// logged and count as no collision.
    pub fn test_collision_with(
        &self,
        other: &Collider,
        transform_self: &Mat4,
        transform_other: &Mat4,
        config: &GjkConfig,
    ) -> bool {
        match self.try_test_collision(other, transform_self, transform_other, config) {
            Ok(hit) => hit,
            Err(GjkError::Simplex(err)) => panic!("GJK invariant violated: {err}"),
            Err(err) => {
                error!("Collision test failed, reporting no collision: {err}");
                false
            }
        }
    }

    pub fn try_test_collision(
        &self,
        other: &Collider,
        transform_self: &Mat4,
        transform_other: &Mat4,
        config: &GjkConfig,
    ) -> Result<bool, GjkError> {
        for own_shape in &self.shapes {
            for other_shape in &other.shapes {
                let outcome = gjk::intersect(
                    own_shape,
                    transform_self,
                    other_shape,
                    transform_other,
                    config,
                )?;
                if outcome.intersecting {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}
