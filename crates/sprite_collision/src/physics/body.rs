//! Moving bodies
//!
//! A [`Body`] carries the kinematic state the collision core reads and
//! writes: position, velocity, mass, restitution and contact flags. Its
//! collider is created lazily because the body's size may not be known yet.

use bitflags::bitflags;
use log::{debug, trace, warn};

use crate::error::Result;
use crate::foundation::collections::GroupHandle;
use crate::foundation::math::{utils, Real, Vec2};

use super::collision::{Collider, ColliderSpec, CollisionShape, ObbCollider, OwnerFrame};
use super::swept;

bitflags! {
    /// Sides on which the last collision check found contact
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Touching: u8 {
        /// Contact on the left side
        const LEFT = 1 << 0;
        /// Contact on the right side
        const RIGHT = 1 << 1;
        /// Contact on the top side
        const TOP = 1 << 2;
        /// Contact on the bottom side
        const BOTTOM = 1 << 3;
    }
}

impl Touching {
    /// Contact sides implied by a displacement applied to the subject
    pub fn from_displacement(displacement: &Vec2) -> Self {
        let mut touching = Touching::empty();
        touching.set(Touching::LEFT, displacement.x > 0.0);
        touching.set(Touching::RIGHT, displacement.x < 0.0);
        touching.set(Touching::TOP, displacement.y > 0.0);
        touching.set(Touching::BOTTOM, displacement.y < 0.0);
        touching
    }
}

/// A moving object taking part in collisions
#[derive(Debug, Clone)]
pub struct Body {
    /// World position
    pub position: Vec2,
    /// Position at the start of the last step
    pub previous_position: Vec2,
    /// Displacement per step
    pub velocity: Vec2,
    /// Rotation in radians
    pub rotation: Real,
    /// Per-axis scale
    pub scale: Vec2,
    /// Unscaled size, `None` while unknown
    pub size: Option<Vec2>,
    /// Mass used by bounce responses
    pub mass: Real,
    /// Coefficient of restitution, 0 (inelastic) to 1 (elastic)
    pub restitution: Real,
    /// Immovable bodies are never displaced by collisions
    pub immovable: bool,
    /// Fraction of velocity lost each step
    pub friction: Real,
    /// Speed cap applied each step
    pub max_speed: Option<Real>,
    /// Contact flags from the last collision check
    pub touching: Touching,
    /// Set once the body has been removed from its world
    pub removed: bool,

    collider: Option<Collider>,
    pub(crate) swept: Collider,
    pub(crate) swept_valid: bool,
    pub(crate) groups: Vec<GroupHandle>,
}

impl Body {
    /// Create a stationary, unsized body at `position`
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            previous_position: position,
            velocity: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            size: None,
            mass: 1.0,
            restitution: 1.0,
            immovable: false,
            friction: 0.0,
            max_speed: None,
            touching: Touching::empty(),
            removed: false,
            collider: None,
            swept: ObbCollider::default().into(),
            swept_valid: false,
            groups: Vec::new(),
        }
    }

    /// Set the unscaled size
    pub fn with_size(mut self, width: Real, height: Real) -> Self {
        self.size = Some(Vec2::new(width, height));
        self
    }

    /// Set the velocity
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the mass
    pub fn with_mass(mut self, mass: Real) -> Self {
        self.mass = mass;
        self
    }

    /// Set the restitution
    pub fn with_restitution(mut self, restitution: Real) -> Self {
        self.restitution = restitution;
        self
    }

    /// Mark the body immovable
    pub fn immovable(mut self) -> Self {
        self.immovable = true;
        self
    }

    /// Current placement as seen by colliders
    pub fn frame(&self) -> OwnerFrame {
        OwnerFrame {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
            size: self.size,
        }
    }

    /// The collider, if one has been created
    pub fn collider(&self) -> Option<&Collider> {
        self.collider.as_ref()
    }

    /// Mutable access to the collider
    pub fn collider_mut(&mut self) -> Option<&mut Collider> {
        self.collider.as_mut()
    }

    /// Swept box covering the last step's motion
    pub fn swept_collider(&self) -> &Collider {
        &self.swept
    }

    /// Groups this body belongs to
    pub fn groups(&self) -> &[GroupHandle] {
        &self.groups
    }

    /// Replace the collider with one built from `spec`.
    ///
    /// The request is validated first; on error the old collider is kept.
    pub fn set_collider(&mut self, spec: &ColliderSpec) -> Result<()> {
        let collider = spec.build(&self.frame()).map_err(|e| {
            warn!("Rejected collider request {spec:?}: {e}");
            e
        })?;
        debug!("Created {} collider at {:?}", collider.kind(), collider.center());
        self.collider = Some(collider);
        self.swept = ObbCollider::default().into();
        self.swept_valid = false;
        Ok(())
    }

    /// Create an oriented box matching the body's size.
    ///
    /// Returns false, leaving the body without a collider, while the size
    /// is still unknown.
    pub fn set_default_collider(&mut self) -> bool {
        if self.size.is_none() {
            trace!("Body at {:?} has no size yet, deferring collider", self.position);
            return false;
        }
        self.set_collider(&ColliderSpec::default()).is_ok()
    }

    /// Make sure a collider exists, creating the default one if possible
    pub fn ensure_collider(&mut self) -> bool {
        self.collider.is_some() || self.set_default_collider()
    }

    /// Refresh the collider after the body's placement changed
    pub fn sync_collider(&mut self) {
        let frame = self.frame();
        if let Some(collider) = self.collider.as_mut() {
            collider.update_from_owner(&frame);
        }
    }

    /// Collider to use for broad-phase tests: the swept box while moving,
    /// the real collider otherwise.
    ///
    /// The swept box only exists once a step has been taken with the
    /// current collider; until then the real collider is used.
    pub fn broad_phase_collider(&self) -> Option<&Collider> {
        if utils::is_zero(&self.velocity) || !self.swept_valid {
            self.collider.as_ref()
        } else {
            self.collider.as_ref().map(|_| &self.swept)
        }
    }

    /// Cap the speed while keeping the direction
    pub fn limit_speed(&mut self, max: Real) {
        let speed = self.velocity.norm();
        if speed > max {
            self.velocity *= max / speed;
        }
    }

    /// Advance one simulation step
    pub fn step(&mut self) {
        if self.removed {
            return;
        }

        if utils::is_zero(&self.velocity) {
            self.swept_valid = false;
        } else {
            swept::update_swept_collider(self);
        }

        self.previous_position = self.position;

        self.velocity *= 1.0 - self.friction;
        if let Some(max) = self.max_speed {
            self.limit_speed(max);
        }

        self.position += self.velocity;
        self.sync_collider();
    }
}
