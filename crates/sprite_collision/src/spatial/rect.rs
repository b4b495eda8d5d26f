//! World-space axis-aligned rectangles
//!
//! Screen convention: `min.y` is the top edge and `max.y` the bottom edge.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Real, Vec2};

/// Axis-aligned rectangle used for bounding boxes and quadtree regions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Rect {
    /// Create a rectangle from its corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a rectangle from the top-left corner and a size
    pub fn from_origin_size(x: Real, y: Real, width: Real, height: Real) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    /// Create a rectangle centered at a point with given half-extents
    pub fn from_center_extents(center: Vec2, extents: Vec2) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Left edge
    pub fn left(&self) -> Real {
        self.min.x
    }

    /// Right edge
    pub fn right(&self) -> Real {
        self.max.x
    }

    /// Top edge
    pub fn top(&self) -> Real {
        self.min.y
    }

    /// Bottom edge
    pub fn bottom(&self) -> Real {
        self.max.y
    }

    /// Horizontal size
    pub fn width(&self) -> Real {
        self.max.x - self.min.x
    }

    /// Vertical size
    pub fn height(&self) -> Real {
        self.max.y - self.min.y
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Half-size on each axis
    pub fn extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Whether the two rectangles share any area or edge
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Whether `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    /// Whether a point lies inside or on the edge
    pub fn contains_point(&self, p: &Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Smallest rectangle enclosing both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }
}
