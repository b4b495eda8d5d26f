//! Debug drawing primitives
//!
//! Colliders describe themselves through the [`DebugDraw`] sink. The
//! bundled [`DebugDrawList`] records what was drawn so a renderer (or a
//! test) can consume it later.

use nalgebra::Vector4;

use crate::foundation::math::{Real, Vec2};

/// RGBA color, components in 0..=1
pub type Color = Vector4<f32>;

/// Receiver of debug geometry in world coordinates
pub trait DebugDraw {
    /// A single point
    fn point(&mut self, position: Vec2, color: Color);

    /// A circle outline
    fn circle(&mut self, center: Vec2, radius: Real, color: Color);

    /// A closed polygon outline
    fn polygon(&mut self, vertices: &[Vec2], color: Color);
}

/// Recorded debug shape
#[derive(Clone, Debug, PartialEq)]
pub enum DebugShape {
    /// Point at position
    Point {
        /// World position
        position: Vec2,
        /// Draw color
        color: Color,
        /// Seconds left before the shape expires
        duration: f32,
    },

    /// Circle at center with radius
    Circle {
        /// World center
        center: Vec2,
        /// World radius
        radius: Real,
        /// Draw color
        color: Color,
        /// Seconds left before the shape expires
        duration: f32,
    },

    /// Closed outline through the vertices
    Polygon {
        /// World vertices in drawing order
        vertices: Vec<Vec2>,
        /// Draw color
        color: Color,
        /// Seconds left before the shape expires
        duration: f32,
    },
}

impl DebugShape {
    /// Remaining duration
    pub fn duration(&self) -> f32 {
        match self {
            DebugShape::Point { duration, .. }
            | DebugShape::Circle { duration, .. }
            | DebugShape::Polygon { duration, .. } => *duration,
        }
    }

    /// Color the shape is drawn with
    pub fn color(&self) -> Color {
        match self {
            DebugShape::Point { color, .. }
            | DebugShape::Circle { color, .. }
            | DebugShape::Polygon { color, .. } => *color,
        }
    }

    /// Decrease duration by delta_time, returns true if expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        match self {
            DebugShape::Point { duration, .. }
            | DebugShape::Circle { duration, .. }
            | DebugShape::Polygon { duration, .. } => {
                *duration -= delta_time;
                *duration <= 0.0
            }
        }
    }
}

/// Recording debug sink. Shapes drawn through [`DebugDraw`] last one frame.
#[derive(Debug, Clone)]
pub struct DebugDrawList {
    shapes: Vec<DebugShape>,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawList {
    /// Create an empty, enabled list
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            enabled: true,
        }
    }

    /// Green, the usual collider outline color
    pub fn default_color() -> Color {
        Color::new(0.0, 1.0, 0.0, 1.0)
    }

    /// Shapes drawn this frame
    pub fn shapes(&self) -> &[DebugShape] {
        &self.shapes
    }

    /// Number of recorded shapes
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Age shapes and drop the expired ones
    pub fn tick(&mut self, delta_time: f32) {
        self.shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    fn push(&mut self, shape: DebugShape) {
        if self.enabled {
            self.shapes.push(shape);
        }
    }
}

impl Default for DebugDrawList {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugDraw for DebugDrawList {
    fn point(&mut self, position: Vec2, color: Color) {
        self.push(DebugShape::Point {
            position,
            color,
            duration: 0.0,
        });
    }

    fn circle(&mut self, center: Vec2, radius: Real, color: Color) {
        self.push(DebugShape::Circle {
            center,
            radius,
            color,
            duration: 0.0,
        });
    }

    fn polygon(&mut self, vertices: &[Vec2], color: Color) {
        self.push(DebugShape::Polygon {
            vertices: vertices.to_vec(),
            color,
            duration: 0.0,
        });
    }
}
