//! Axis-aligned boxes shared by the level, the collision checks and the arcade collaborator.

use glam::Vec2;

/// An axis-aligned bounding box in world space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// A box whose bottom edge is centered on `feet`.
    pub fn from_bottom_center(feet: Vec2, size: Vec2) -> Self {
        Self {
            min: Vec2::new(feet.x - size.x / 2.0, feet.y - size.y),
            max: Vec2::new(feet.x + size.x / 2.0, feet.y),
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Strict overlap; boxes that merely share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x && self.min.y < other.max.y && self.max.y > other.min.y
    }

    /// Inclusive horizontal containment.
    pub fn spans_x(&self, x: f32) -> bool {
        x >= self.min.x && x <= self.max.x
    }

    pub fn translated(&self, offset: Vec2) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_center_box() {
        let aabb = Aabb::from_bottom_center(Vec2::new(100.0, 200.0), Vec2::new(20.0, 40.0));
        assert_eq!(aabb.min, Vec2::new(90.0, 160.0));
        assert_eq!(aabb.max, Vec2::new(110.0, 200.0));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&b.translated(Vec2::new(-0.5, 0.0))));
    }

    #[test]
    fn test_spans_x_is_inclusive() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        assert!(a.spans_x(0.0));
        assert!(a.spans_x(10.0));
        assert!(!a.spans_x(10.01));
    }
}
