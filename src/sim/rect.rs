//! Axis-aligned rectangle geometry shared by every body
//!
//! Bounds are half-open: `[x, x + w) × [y, y + h)`. Screen coordinates, so
//! `y` grows downward and the arena bottom is `y == height`.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An integer axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: IVec2,
    /// Width and height
    pub size: IVec2,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            pos: IVec2::new(x, y),
            size: IVec2::new(w, h),
        }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.pos.y
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.size.y
    }

    /// One past the rightmost column
    #[inline]
    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x
    }

    /// One past the lowest row
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y
    }

    /// Horizontal centre (integer, rounds toward the left edge)
    #[inline]
    pub fn center_x(&self) -> i32 {
        self.pos.x + self.size.x / 2
    }

    /// Centre point (integer)
    pub fn center(&self) -> IVec2 {
        self.pos + self.size / 2
    }

    /// True if the rectangles share any area. Empty rectangles never intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.size.x <= 0 || self.size.y <= 0 || other.size.x <= 0 || other.size.y <= 0 {
            return false;
        }
        self.pos.x < other.right()
            && other.pos.x < self.right()
            && self.pos.y < other.bottom()
            && other.pos.y < self.bottom()
    }

    /// Move so the horizontal span stays inside `[0, max_x]`
    pub fn clamp_x(&mut self, max_x: i32) {
        let limit = (max_x - self.size.x).max(0);
        self.pos.x = self.pos.x.clamp(0, limit);
    }

    /// Translate by a delta
    #[inline]
    pub fn translate(&mut self, delta: IVec2) {
        self.pos += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_intersects_touching_edges_is_miss() {
        // Half-open bounds: sharing an edge is not an overlap
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!a.intersects(&b));
        let c = Rect::new(0, 10, 10, 10);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_intersects_empty_rect() {
        let a = Rect::new(0, 0, 10, 10);
        let empty = Rect::new(2, 2, 0, 5);
        assert!(!a.intersects(&empty));
    }

    #[test]
    fn test_clamp_x() {
        let mut r = Rect::new(-20, 0, 100, 10);
        r.clamp_x(600);
        assert_eq!(r.x(), 0);

        r.pos.x = 550;
        r.clamp_x(600);
        assert_eq!(r.x(), 500);

        // Wider than the arena pins to the left edge
        let mut wide = Rect::new(30, 0, 700, 10);
        wide.clamp_x(600);
        assert_eq!(wide.x(), 0);
    }

    #[test]
    fn test_center() {
        let r = Rect::new(10, 20, 100, 18);
        assert_eq!(r.center_x(), 60);
        assert_eq!(r.center(), IVec2::new(60, 29));
        assert_eq!(r.right(), 110);
        assert_eq!(r.bottom(), 38);
    }
}
