use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::AABB;

#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("Mesh shape needs at least one vertex")]
    EmptyMesh,
    #[error("Invalid sphere radius {0}")]
    InvalidRadius(f32),
}

/// Convex primitive described in its own local frame.
///
/// Only the support query is needed to run GJK against it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ConvexShape {
    // Centered on the local origin
    Sphere { radius: f32 },
    // Distinct vertex positions only
    Mesh { vertices: Vec<Vec3> },
}

impl ConvexShape {
    pub fn sphere(radius: f32) -> Result<ConvexShape, ShapeError> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(ShapeError::InvalidRadius(radius));
        }
        Ok(ConvexShape::Sphere { radius })
    }

    pub fn mesh(vertices: impl IntoIterator<Item = Vec3>) -> Result<ConvexShape, ShapeError> {
        let vertices = distinct(vertices);
        if vertices.is_empty() {
            return Err(ShapeError::EmptyMesh);
        }
        Ok(ConvexShape::Mesh { vertices })
    }

    /// Re-run constructor validation, e.g. after deserializing
    pub fn validated(self) -> Result<ConvexShape, ShapeError> {
        match self {
            ConvexShape::Sphere { radius } => ConvexShape::sphere(radius),
            ConvexShape::Mesh { vertices } => ConvexShape::mesh(vertices),
        }
    }

    /// Box mesh centered on the local origin. Zero extents collapse corners,
    /// down to a single vertex for `Vec3::ZERO`.
    pub fn cuboid(half_extents: Vec3) -> ConvexShape {
        let h = half_extents.abs();
        let corners = (0..8).map(|i| {
            Vec3::new(
                if i & 1 == 0 { -h.x } else { h.x },
                if i & 2 == 0 { -h.y } else { h.y },
                if i & 4 == 0 { -h.z } else { h.z },
            )
        });
        // Never empty, there is always at least one corner
        ConvexShape::Mesh {
            vertices: distinct(corners),
        }
    }

    /// Most extreme point of the shape along `direction`, both in local space.
    pub fn furthest_point(&self, direction: Vec3) -> Vec3 {
        match self {
            ConvexShape::Sphere { radius } => direction.normalize_or_zero() * *radius,
            ConvexShape::Mesh { vertices } => {
                let mut max = f32::NEG_INFINITY;
                let mut furthest = vertices.first().copied().unwrap_or(Vec3::ZERO);
                for vertex in vertices {
                    let dot = vertex.dot(direction);
                    if dot > max {
                        max = dot;
                        furthest = *vertex;
                    }
                }
                furthest
            }
        }
    }

    pub fn world_aabb(&self, transform: &Mat4) -> AABB {
        match self {
            ConvexShape::Sphere { radius } => {
                let center = transform.transform_point3(Vec3::ZERO);
                // Per-axis extent of the transformed sphere
                let m = transform.transpose();
                let extent = Vec3::new(
                    m.x_axis.truncate().length(),
                    m.y_axis.truncate().length(),
                    m.z_axis.truncate().length(),
                ) * *radius;
                AABB::new(center - extent, center + extent)
            }
            ConvexShape::Mesh { vertices } => {
                AABB::from_points(vertices.iter().map(|v| transform.transform_point3(*v)))
            }
        }
    }
}

/// Drops repeated positions, keeping first occurrences in order
fn distinct(vertices: impl IntoIterator<Item = Vec3>) -> Vec<Vec3> {
    let mut distinct: Vec<Vec3> = Vec::new();
    for vertex in vertices {
        if !distinct.contains(&vertex) {
            distinct.push(vertex);
        }
    }
    distinct
}
