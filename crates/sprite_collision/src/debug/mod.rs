//! Debug visualization
//!
//! Colliders and the quadtree can be drawn into any [`DebugDraw`] sink;
//! [`CollisionDebugVisualizer`] collects a whole world's worth per frame.

pub mod collision_debug;
pub mod draw;

pub use collision_debug::{CollisionDebugColors, CollisionDebugVisualizer};
pub use draw::{Color, DebugDraw, DebugDrawList, DebugShape};
