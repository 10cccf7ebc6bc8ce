//! Axis-aligned rectangle geometry
//!
//! Rectangles are stored as top-left corner plus size, in world units with
//! y growing downward (screen convention).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of `size` centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(
            center.x - size.x / 2.0,
            center.y - size.y / 2.0,
            size.x,
            size.y,
        )
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True for zero-area, negative or NaN sized rectangles
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Strict overlap test. Rectangles that only share an edge do not
    /// intersect, and an empty rectangle intersects nothing.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Point containment (edges inclusive)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// True when `other` lies entirely inside this rectangle (edges inclusive)
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x && other.right() <= self.right() && other.y >= self.y && other.bottom() <= self.bottom()
    }

    /// Same rectangle moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Split into four equal quadrants: top-left, top-right, bottom-left, bottom-right
    pub fn quadrants(&self) -> [Rect; 4] {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        [
            Rect::new(self.x, self.y, hw, hh),
            Rect::new(self.x + hw, self.y, hw, hh),
            Rect::new(self.x, self.y + hh, hw, hh),
            Rect::new(self.x + hw, self.y + hh, hw, hh),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects_overlap_and_touching() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Shared edge is not an overlap
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!a.intersects(&Rect::new(20.0, 20.0, 1.0, 1.0)));
    }

    #[test]
    fn test_empty_rect_never_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(Rect::new(5.0, 5.0, 0.0, 3.0).is_empty());
        assert!(!a.intersects(&Rect::new(5.0, 5.0, 0.0, 3.0)));
        assert!(!Rect::new(0.0, 0.0, f32::NAN, 1.0).intersects(&a));
    }

    #[test]
    fn test_quadrants_tile_parent() {
        let r = Rect::new(0.0, 0.0, 800.0, 600.0);
        let q = r.quadrants();
        let area: f32 = q.iter().map(|c| c.width * c.height).sum();
        assert!((area - 800.0 * 600.0).abs() < 1e-3);
        assert_eq!(q[3], Rect::new(400.0, 300.0, 400.0, 300.0));
    }

    #[test]
    fn test_contains_rect() {
        let world = Rect::new(0.0, 0.0, 800.0, 600.0);
        assert!(world.contains_rect(&Rect::new(0.0, 0.0, 800.0, 600.0)));
        assert!(world.contains_rect(&Rect::new(10.0, 10.0, 5.0, 5.0)));
        assert!(!world.contains_rect(&Rect::new(-5.0, 100.0, 10.0, 10.0)));
        assert!(!world.contains_rect(&Rect::new(795.0, 100.0, 10.0, 10.0)));
    }

    #[test]
    fn test_from_center() {
        let r = Rect::from_center(Vec2::new(10.0, 10.0), Vec2::splat(2.0));
        assert_eq!(r, Rect::new(9.0, 9.0, 2.0, 2.0));
        assert_eq!(r.center(), Vec2::new(10.0, 10.0));
    }
}
