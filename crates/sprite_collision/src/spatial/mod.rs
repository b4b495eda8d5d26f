//! Spatial partitioning data structures
//!
//! Provides the broad-phase index used to prune collision candidates
//! in 2D screen space.

mod quadtree;
mod rect;

pub use quadtree::{Quadtree, QuadtreeConfig, QuadtreeEntry, QuadtreeNode};
pub use rect::Rect;
