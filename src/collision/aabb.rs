use glam::Vec3;

/// World-space axis aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> AABB {
        debug_assert!(max.x >= min.x, "Invalid bounds: x axis");
        debug_assert!(max.y >= min.y, "Invalid bounds: y axis");
        debug_assert!(max.z >= min.z, "Invalid bounds: z axis");
        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> AABB {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in points {
            min = min.min(p);
            max = max.max(p);
        }
        if min.x > max.x {
            // No points
            return Self {
                min: Vec3::ZERO,
                max: Vec3::ZERO,
            };
        }
        Self { min, max }
    }

    pub fn intersects(&self, other: &AABB) -> bool {
        // For each axis, check if one box is completely to one side of the other
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::AABB;

    #[test]
    fn test_intersection_true() {
        let a = AABB::new(Vec3::splat(-0.5), Vec3::splat(0.5));
        let b = AABB::new(Vec3::splat(0.5), Vec3::splat(1.5));
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_intersection_close_but_false() {
        let a = AABB::new(Vec3::splat(-0.5), Vec3::splat(0.5));
        let b = AABB::new(Vec3::splat(0.55), Vec3::splat(1.45));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_from_points() {
        let bb = AABB::from_points([
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.5),
            Vec3::new(0.0, 0.0, -4.0),
        ]);
        assert_eq!(bb.min, Vec3::new(-1.0, -2.0, -4.0));
        assert_eq!(bb.max, Vec3::new(1.0, 3.0, 0.5));
    }

    #[test]
    fn test_from_no_points() {
        let bb = AABB::from_points(std::iter::empty());
        assert_eq!(bb, AABB::new(Vec3::ZERO, Vec3::ZERO));
    }

    #[test]
    fn test_separated_on_one_axis_only() {
        let a = AABB::from_points([Vec3::ZERO, Vec3::ONE]);
        let b = AABB::from_points([Vec3::new(0.5, 0.5, 1.01), Vec3::new(2.0, 2.0, 2.0)]);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }
}
