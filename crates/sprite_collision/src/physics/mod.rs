//! Bodies, collision checks and responses
//!
//! # Module Organization
//!
//! - [`collision`] - Collider shapes and the SAT narrow phase
//! - [`body`] - Kinematic state and contact flags
//! - [`swept`] - Swept boxes and multisampling against tunneling
//! - [`response`] - What happens to two bodies once they touch
//! - [`world`] - Body and group storage, broad phase and per-frame upkeep

pub mod body;
pub mod collision;
pub mod response;
pub mod swept;
pub mod world;

pub use body::{Body, Touching};
pub use collision::{Collider, ColliderSpec, CollisionShape};
pub use response::{ContactCallback, ImpactParams, ResponseMode};
pub use world::{CollisionWorld, Group, SpatialIndex, Target};
