use glam::Vec3;
use thiserror::Error;

pub const SIMPLEX_CAPACITY: usize = 4;

#[derive(Debug, Error, PartialEq)]
pub enum SimplexError {
    #[error("Simplex has a maximum size of 4")]
    Overflow,
}

/// Up to four Minkowski-difference points, newest always at index 0.
///
/// Lives for exactly one GJK query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simplex {
    points: [Vec3; SIMPLEX_CAPACITY],
    len: usize,
}

impl Default for Simplex {
    fn default() -> Self {
        Self::new()
    }
}

impl Simplex {
    pub fn new() -> Simplex {
        Self {
            points: [Vec3::ZERO; SIMPLEX_CAPACITY],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points[..self.len]
    }

    pub fn push_front(&mut self, point: Vec3) -> Result<(), SimplexError> {
        if self.len >= SIMPLEX_CAPACITY {
            return Err(SimplexError::Overflow);
        }
        self.points.copy_within(0..self.len, 1);
        self.points[0] = point;
        self.len += 1;
        Ok(())
    }

    /// Replace the contents, keeping the given order (newest first)
    pub(super) fn set(&mut self, points: &[Vec3]) {
        debug_assert!(points.len() <= SIMPLEX_CAPACITY);
        self.points[..points.len()].copy_from_slice(points);
        self.len = points.len();
    }

    pub(super) fn get(&self, index: usize) -> Vec3 {
        debug_assert!(index < self.len, "Simplex index {index} out of bounds");
        self.points[index]
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::{Simplex, SimplexError};

    #[test]
    fn test_push_front_keeps_newest_first() {
        let mut simplex = Simplex::new();
        simplex.push_front(Vec3::X).unwrap();
        simplex.push_front(Vec3::Y).unwrap();
        simplex.push_front(Vec3::Z).unwrap();
        assert_eq!(simplex.points(), &[Vec3::Z, Vec3::Y, Vec3::X]);
    }

    #[test]
    fn test_push_front_overflow() {
        let mut simplex = Simplex::new();
        for i in 0..4 {
            simplex.push_front(Vec3::splat(i as f32)).unwrap();
        }
        assert_eq!(simplex.push_front(Vec3::ONE), Err(SimplexError::Overflow));
        // Contents untouched by the rejected push
        assert_eq!(simplex.len(), 4);
        assert_eq!(simplex.get(0), Vec3::splat(3.0));
    }

    #[test]
    fn test_set_shrinks() {
        let mut simplex = Simplex::new();
        for i in 0..4 {
            simplex.push_front(Vec3::splat(i as f32)).unwrap();
        }
        simplex.set(&[Vec3::ONE, Vec3::ZERO]);
        assert_eq!(simplex.points(), &[Vec3::ONE, Vec3::ZERO]);
        assert!(!simplex.is_empty());
    }
}
