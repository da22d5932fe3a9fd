//! Viewport geometry
//!
//! Axis-aligned rectangles in logical pixels, used by the polling detector to
//! decide whether an element lies inside the proximity zone.

use serde::{Deserialize, Serialize};

use crate::loader::ProximityMargin;

/// Axis-aligned rectangle, origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Grow the rectangle outward by `margin` on all four sides
    pub fn expand(&self, margin: ProximityMargin) -> Self {
        let m = margin.px();
        Self {
            x: self.x - m,
            y: self.y - m,
            width: self.width + 2.0 * m,
            height: self.height + 2.0 * m,
        }
    }

    /// Edge-inclusive intersection test. Touching rectangles intersect, which
    /// matches how browsers report an element sitting exactly on the margin.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    /// Same rectangle moved by (dx, dy)
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Anything with on-page bounds in document coordinates
pub trait Bounded {
    fn bounds(&self) -> Rect;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand() {
        let viewport = Rect::new(0.0, 100.0, 800.0, 600.0);
        let zone = viewport.expand(ProximityMargin::default());
        assert_eq!(zone, Rect::new(-50.0, 50.0, 900.0, 700.0));
        assert_eq!(zone.bottom(), 750.0);
    }

    #[test]
    fn test_intersects() {
        let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);

        assert!(viewport.intersects(&Rect::new(10.0, 10.0, 100.0, 100.0)));
        // Partially overlapping the bottom edge
        assert!(viewport.intersects(&Rect::new(0.0, 550.0, 100.0, 100.0)));
        // Touching edge counts
        assert!(viewport.intersects(&Rect::new(0.0, 600.0, 100.0, 100.0)));
        // Fully below
        assert!(!viewport.intersects(&Rect::new(0.0, 601.0, 100.0, 100.0)));
        // Fully to the right
        assert!(!viewport.intersects(&Rect::new(900.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_margin_pulls_element_into_zone() {
        let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
        let element = Rect::new(0.0, 640.0, 200.0, 200.0);

        assert!(!viewport.intersects(&element));
        assert!(viewport.expand(ProximityMargin::default()).intersects(&element));
        assert!(!viewport
            .expand(ProximityMargin::new(39.0).unwrap())
            .intersects(&element));
    }
}
