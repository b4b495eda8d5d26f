//! # Sprite Collision
//!
//! 2D collision detection and response for sprite-based game runtimes.
//!
//! ## Features
//!
//! - **Collider shapes**: points, circles, axis-aligned and oriented boxes
//!   that follow their owner's position, rotation and scale
//! - **SAT narrow phase**: overlap tests with a minimum translation vector
//! - **Quadtree broad phase**: optional pruning of group checks
//! - **Tunneling prevention**: swept boxes and sub-step multisampling
//! - **Responses**: overlap, displace, collide, bounce and bounce-off
//!
//! ## Quick Start
//!
//! ```rust
//! use sprite_collision::prelude::*;
//!
//! let mut world = CollisionWorld::new(CollisionSettings::default());
//! let player = world.add_body(Body::new(Vec2::new(0.0, 0.0)).with_size(10.0, 10.0));
//! let wall = world.add_body(Body::new(Vec2::new(8.0, 0.0)).with_size(10.0, 10.0).immovable());
//!
//! world.step_all();
//! assert!(world.collide(player, wall, None).unwrap());
//! assert!(world.body(player).unwrap().touching.contains(Touching::RIGHT));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod debug;
pub mod error;
pub mod foundation;
pub mod physics;
pub mod spatial;

pub use error::{CollisionError, Result};

/// Common imports for collision users
pub mod prelude {
    pub use crate::{
        config::{CollisionSettings, Config, MultisampleOptions, QuadtreeSettings, SatOptions},
        debug::{CollisionDebugVisualizer, DebugDraw, DebugDrawList},
        error::{CollisionError, Result},
        foundation::{
            collections::{BodyHandle, GroupHandle},
            math::{Real, Vec2},
            transform::Transform2D,
        },
        physics::{
            Body, Collider, ColliderSpec, CollisionShape, CollisionWorld, ContactCallback, ResponseMode,
            SpatialIndex, Target, Touching,
        },
        spatial::{Quadtree, QuadtreeConfig, Rect},
    };
}
