//! Collision shapes and the narrow phase
//!
//! # Architecture
//!
//! - **Local-space storage**: every shape keeps its own size plus a local
//!   transform, and receives a parent transform from its owner
//! - **Cached world state**: center, axes and projected extents are
//!   recomputed on every mutation, never on read
//! - **Closed variant set**: [`Collider`] is an enum over the four kinds,
//!   all of which implement [`CollisionShape`]
//!
//! # Module Organization
//!
//! - [`shape`] - Shared transform state and the `CollisionShape` contract
//! - [`primitives`] - Point, circle, AABB and OBB colliders
//! - [`sat`] - Separating Axis Theorem overlap and MTV
//! - [`request`] - Validated collider construction requests

pub mod primitives;
pub mod request;
pub mod sat;
pub mod shape;

pub use primitives::{AabbCollider, CircleCollider, ObbCollider, PointCollider};
pub use request::ColliderSpec;
pub use shape::{Collider, CollisionShape, OwnerFrame, ShapeTransform};
