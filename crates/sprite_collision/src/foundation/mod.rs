//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the collision core:
//! - 2D math types and vector helpers
//! - The affine `Transform2D`
//! - Handle-based collections
//! - Logging utilities

pub mod math;
pub mod transform;
pub mod collections;
pub mod logging;
