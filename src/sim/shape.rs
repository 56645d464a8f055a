//! Axis-aligned box geometry for bodies, platforms and hazards
//!
//! A box is defined by:
//! - center: world position of its midpoint
//! - half: half width / half height (left = center.x - half.x, etc.)

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self {
            center,
            half: half.abs(),
        }
    }

    /// Build from a center and full size
    pub fn from_size(center: Vec2, size: Vec2) -> Self {
        Self::new(center, size * 0.5)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    /// Trailing edge when scrolling right
    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.half.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y - self.half.y
    }

    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }

    /// Closest point inside the box to `point`
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min(), self.max())
    }

    /// Horizontal extents overlap (touching edges do not count)
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        (self.center.x - other.center.x).abs() < self.half.x + other.half.x
    }

    /// Boxes overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half + other.half;
        d.x < reach.x && d.y < reach.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let b = Aabb::from_size(Vec2::new(10.0, -2.0), Vec2::new(4.0, 0.5));
        assert_eq!(b.left(), 8.0);
        assert_eq!(b.right(), 12.0);
        assert_eq!(b.top(), -1.75);
        assert_eq!(b.bottom(), -2.25);
        assert_eq!(b.size(), Vec2::new(4.0, 0.5));
    }

    #[test]
    fn test_negative_half_is_normalized() {
        let b = Aabb::new(Vec2::ZERO, Vec2::new(-1.0, 2.0));
        assert_eq!(b.half, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_overlaps_excludes_touching() {
        let a = Aabb::new(Vec2::ZERO, Vec2::ONE);
        let touching = Aabb::new(Vec2::new(2.0, 0.0), Vec2::ONE);
        let inside = Aabb::new(Vec2::new(1.5, 0.5), Vec2::ONE);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_closest_point() {
        let b = Aabb::new(Vec2::ZERO, Vec2::ONE);
        assert_eq!(b.closest_point(Vec2::new(3.0, 0.5)), Vec2::new(1.0, 0.5));
        assert_eq!(b.closest_point(Vec2::new(0.2, 0.3)), Vec2::new(0.2, 0.3));
    }
}
