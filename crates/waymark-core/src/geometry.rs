//! Positions and extents of flowchart nodes.
//!
//! Flowchart space grows right (+X) and down (+Y). A node's position is its
//! **top-left** corner, which is what the canvas rendering the persisted
//! document expects.

use serde::{Deserialize, Serialize};

/// A coordinate in flowchart space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns the area covered by a node of `size` whose top-left corner is `self`.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds {
            left: self.x,
            top: self.y,
            right: self.x + size.width,
            bottom: self.y + size.height,
        }
    }
}

/// Width and height of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }
}

/// Axis-aligned area covered by a node.
///
/// Bounds are half-open: two nodes that only touch along an edge do not
/// overlap.
///
/// ```
/// # use waymark_core::geometry::{Point, Size};
/// let size = Size::new(10.0, 10.0);
/// let a = Point::new(0.0, 0.0).to_bounds(size);
/// assert!(a.intersects(Point::new(5.0, 5.0).to_bounds(size)));
/// assert!(!a.intersects(Point::new(10.0, 0.0).to_bounds(size)));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl Bounds {
    pub fn top(self) -> f32 {
        self.top
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    /// Returns true if the vertical spans of both areas overlap.
    pub fn overlaps_vertically(self, other: Self) -> bool {
        self.top < other.bottom && other.top < self.bottom
    }

    /// Returns true if both areas overlap.
    pub fn intersects(self, other: Self) -> bool {
        self.left < other.right && other.left < self.right && self.overlaps_vertically(other)
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            1.0f32..500.0,
            1.0f32..500.0,
        )
            .prop_map(|(x, y, w, h)| Point::new(x, y).to_bounds(Size::new(w, h)))
    }

    proptest! {
        #[test]
        fn intersects_is_symmetric(a in bounds_strategy(), b in bounds_strategy()) {
            prop_assert_eq!(a.intersects(b), b.intersects(a));
        }

        #[test]
        fn bounds_intersect_themselves(a in bounds_strategy()) {
            prop_assert!(a.intersects(a));
        }
    }
}
