use glam::{Mat4, Vec3};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ConvexShape, Simplex, SimplexError};

/// Arbitrary first search direction
const SEED_DIRECTION: Vec3 = Vec3::X;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GjkConfig {
    /// Safety net against configurations that never make progress
    pub max_iterations: u32,
    /// Relative tolerance (sine of an angle) for collinear / coplanar checks
    pub tolerance: f32,
}

impl Default for GjkConfig {
    fn default() -> Self {
        Self {
            max_iterations: 128,
            tolerance: 1e-5,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GjkError {
    #[error(transparent)]
    Simplex(#[from] SimplexError),
    #[error("GJK did not converge within {0} iterations")]
    IterationLimit(u32),
    #[error("Search direction is not finite, simplex had {simplex_len} points")]
    NonFiniteDirection { simplex_len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GjkOutcome {
    pub intersecting: bool,
    pub iterations: u32,
    /// Largest simplex seen during the query
    pub peak_simplex_len: usize,
}

/// Two shapes under their world transforms, queried as one Minkowski difference
struct MinkowskiPair<'a> {
    shape_a: &'a ConvexShape,
    transform_a: &'a Mat4,
    inverse_a: Mat4,
    shape_b: &'a ConvexShape,
    transform_b: &'a Mat4,
    inverse_b: Mat4,
}

impl<'a> MinkowskiPair<'a> {
    fn new(
        shape_a: &'a ConvexShape,
        transform_a: &'a Mat4,
        shape_b: &'a ConvexShape,
        transform_b: &'a Mat4,
    ) -> Self {
        Self {
            shape_a,
            transform_a,
            inverse_a: transform_a.inverse(),
            shape_b,
            transform_b,
            inverse_b: transform_b.inverse(),
        }
    }

    /// World-space support point of A - B along the world-space `direction`
    fn support(&self, direction: Vec3) -> Vec3 {
        // Directions carry no position, so only the linear part of the inverse applies
        let local_direction_a = self.inverse_a.transform_vector3(direction);
        let local_direction_b = self.inverse_b.transform_vector3(direction);

        let local_furthest_a = self.shape_a.furthest_point(local_direction_a);
        let local_furthest_b = self.shape_b.furthest_point(-local_direction_b);

        self.transform_a.transform_point3(local_furthest_a)
            - self.transform_b.transform_point3(local_furthest_b)
    }
}

/// Decides whether two convex shapes intersect.
///
/// Touching shapes count as intersecting when the contact is detected exactly
/// or within `config.tolerance`; right at the boundary the answer is subject to
/// floating point noise.
pub fn intersect(
    shape_a: &ConvexShape,
    transform_a: &Mat4,
    shape_b: &ConvexShape,
    transform_b: &Mat4,
    config: &GjkConfig,
) -> Result<GjkOutcome, GjkError> {
    let pair = MinkowskiPair::new(shape_a, transform_a, shape_b, transform_b);
    let tolerance = config.tolerance;

    let mut simplex = Simplex::new();
    let first = pair.support(SEED_DIRECTION);
    simplex.push_front(first)?;
    let mut direction = -first;
    let mut peak_simplex_len = simplex.len();

    let outcome = |intersecting: bool, iterations: u32, peak_simplex_len: usize| GjkOutcome {
        intersecting,
        iterations,
        peak_simplex_len,
    };

    for iteration in 1..=config.max_iterations {
        if !direction.is_finite() {
            return Err(GjkError::NonFiniteDirection {
                simplex_len: simplex.len(),
            });
        }
        if direction == Vec3::ZERO {
            // A support point landed exactly on the origin
            debug!(
                "Zero search direction with {} simplex points, shapes are touching",
                simplex.len()
            );
            return Ok(outcome(true, iteration, peak_simplex_len));
        }

        let support = pair.support(direction);
        trace!("GJK iteration {iteration}: direction {direction}, support {support}");
        if support.dot(direction) <= 0.0 {
            // Nothing of A - B lies past the origin along `direction`
            return Ok(outcome(false, iteration, peak_simplex_len));
        }

        simplex.push_front(support)?;
        peak_simplex_len = peak_simplex_len.max(simplex.len());

        if next_simplex(&mut simplex, &mut direction, tolerance) {
            return Ok(outcome(true, iteration, peak_simplex_len));
        }
    }
    Err(GjkError::IterationLimit(config.max_iterations))
}

fn same_direction(a: Vec3, b: Vec3) -> bool {
    a.dot(b) > 0.0
}

/// Sine of the angle between `a` and `b` is within `tolerance`
fn nearly_parallel(a: Vec3, b: Vec3, tolerance: f32) -> bool {
    a.cross(b).length_squared()
        <= tolerance * tolerance * a.length_squared() * b.length_squared()
}

/// Shrinks the simplex to the feature closest to the origin and updates the
/// search direction. Returns true once the origin is enclosed.
fn next_simplex(simplex: &mut Simplex, direction: &mut Vec3, tolerance: f32) -> bool {
    match simplex.len() {
        2 => line(simplex, direction, tolerance),
        3 => triangle(simplex, direction, tolerance),
        4 => tetrahedron(simplex, direction, tolerance),
        _ => false,
    }
}

fn line(simplex: &mut Simplex, direction: &mut Vec3, tolerance: f32) -> bool {
    let a = simplex.get(0);
    let b = simplex.get(1);

    let ab = b - a;
    let ao = -a;

    if same_direction(ab, ao) {
        if nearly_parallel(ab, ao, tolerance) {
            // Origin sits on the line through a and b
            if ab.dot(ao) <= ab.length_squared() {
                debug!("Origin lies on simplex segment, shapes are touching");
                return true;
            }
            simplex.set(&[a]);
            *direction = ao;
            return false;
        }
        *direction = ab.cross(ao).cross(ab);
    } else {
        simplex.set(&[a]);
        *direction = ao;
    }
    false
}

fn triangle(simplex: &mut Simplex, direction: &mut Vec3, tolerance: f32) -> bool {
    let a = simplex.get(0);
    let b = simplex.get(1);
    let c = simplex.get(2);

    let ab = b - a;
    let ac = c - a;
    let ao = -a;

    if nearly_parallel(ab, ac, tolerance) {
        // Collinear, keep the longer edge from a
        let far = if ab.length_squared() >= ac.length_squared() {
            b
        } else {
            c
        };
        simplex.set(&[a, far]);
        return line(simplex, direction, tolerance);
    }

    let abc = ab.cross(ac);

    if same_direction(abc.cross(ac), ao) {
        if same_direction(ac, ao) {
            simplex.set(&[a, c]);
        } else {
            simplex.set(&[a, b]);
        }
        return line(simplex, direction, tolerance);
    }

    if same_direction(ab.cross(abc), ao) {
        simplex.set(&[a, b]);
        return line(simplex, direction, tolerance);
    }

    // Origin projects inside the triangle
    let height = abc.dot(ao);
    if height.abs() <= tolerance * abc.length() * ao.length() {
        debug!("Origin lies on simplex triangle, shapes are touching");
        return true;
    }
    if height > 0.0 {
        *direction = abc;
    } else {
        simplex.set(&[a, c, b]);
        *direction = -abc;
    }
    false
}

fn tetrahedron(simplex: &mut Simplex, direction: &mut Vec3, tolerance: f32) -> bool {
    let a = simplex.get(0);
    let b = simplex.get(1);
    let c = simplex.get(2);
    let d = simplex.get(3);

    let ab = b - a;
    let ac = c - a;
    let ad = d - a;
    let ao = -a;

    // Face bcd is never tested: a was found searching past it towards the origin
    let abc = ab.cross(ac);
    let acd = ac.cross(ad);
    let adb = ad.cross(ab);

    if same_direction(abc, ao) {
        simplex.set(&[a, b, c]);
        return triangle(simplex, direction, tolerance);
    }
    if same_direction(acd, ao) {
        simplex.set(&[a, c, d]);
        return triangle(simplex, direction, tolerance);
    }
    if same_direction(adb, ao) {
        simplex.set(&[a, d, b]);
        return triangle(simplex, direction, tolerance);
    }
    true
}
