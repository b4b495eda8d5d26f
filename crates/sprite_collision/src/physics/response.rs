//! Collision response policy
//!
//! Given a subject and another body, find the displacement between them
//! and react according to a [`ResponseMode`]: report only, push the other
//! body away, or move the subject out and exchange momentum along the
//! collision normal.

use serde::{Deserialize, Serialize};

use crate::config::CollisionSettings;
use crate::foundation::math::{utils, Real, Vec2};

use super::body::{Body, Touching};
use super::swept;

/// Reaction invoked after a contact is resolved, with `(subject, other)`
pub type ContactCallback<'a> = &'a mut dyn FnMut(&mut Body, &mut Body);

/// How a detected contact is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseMode {
    /// Detection only; the callback is not invoked
    IsTouching,
    /// Detection only; the callback is invoked
    Overlap,
    /// Push the other body out of the subject
    Displace,
    /// Move the subject out and stop it against the other body
    Collide,
    /// Move the subject out and exchange momentum with the other body
    Bounce,
    /// Move the subject out and reflect it off the other body, which is
    /// treated as immovable
    BounceOff,
}

impl ResponseMode {
    /// Whether the subject is moved out of the other body
    pub fn moves_subject(self) -> bool {
        matches!(self, ResponseMode::Collide | ResponseMode::Bounce | ResponseMode::BounceOff)
    }

    /// Whether the mode only reports contacts, leaving both bodies where
    /// they were
    pub fn is_detection_only(self) -> bool {
        matches!(self, ResponseMode::IsTouching | ResponseMode::Overlap)
    }

    /// Whether velocities change
    pub fn changes_velocity(self) -> bool {
        self.moves_subject()
    }

    /// Whether a contact callback is invoked
    pub fn invokes_callback(self) -> bool {
        self != ResponseMode::IsTouching
    }
}

/// Body properties as seen by the impulse computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactParams {
    /// Mass
    pub mass: Real,
    /// Coefficient of restitution
    pub restitution: Real,
    /// Infinite inertia
    pub immovable: bool,
}

impl ImpactParams {
    /// Parameters of a body as it is
    pub fn of(body: &Body) -> Self {
        Self {
            mass: body.mass,
            restitution: body.restitution,
            immovable: body.immovable,
        }
    }

    /// Parameters for `(subject, other)` under `mode`.
    ///
    /// `Collide` treats the other body as immovable and perfectly
    /// inelastic; `BounceOff` treats it as immovable. The bodies
    /// themselves are never modified.
    pub fn for_pair(mode: ResponseMode, subject: &Body, other: &Body) -> (Self, Self) {
        let mut other_params = Self::of(other);
        match mode {
            ResponseMode::Collide => {
                other_params.immovable = true;
                other_params.restitution = 0.0;
            }
            ResponseMode::BounceOff => other_params.immovable = true,
            _ => {}
        }
        (Self::of(subject), other_params)
    }
}

/// Post-impact velocities along the collision normal.
///
/// `v1` and `v2` are the velocity components along the normal. An
/// immovable participant takes mass 1 and the other mass 0, so it acts as
/// infinitely heavy. Restitution is the product of both coefficients.
pub fn bounce_velocities(v1: Vec2, v2: Vec2, first: &ImpactParams, second: &ImpactParams) -> (Vec2, Vec2) {
    let (m1, m2) = if first.immovable {
        (1.0, 0.0)
    } else if second.immovable {
        (0.0, 1.0)
    } else {
        (first.mass, second.mass)
    };

    let combined = m1 + m2;
    if combined == 0.0 {
        return (v1, v2);
    }

    let e = first.restitution * second.restitution;
    let momentum = v1 * m1 + v2 * m2;
    let v1_final = ((v2 - v1) * (m2 * e) + momentum) / combined;
    let v2_final = ((v1 - v2) * (m1 * e) + momentum) / combined;
    (v1_final, v2_final)
}

/// Resolve one pair without resetting the subject's contact flags.
///
/// Flags for this pair are OR-ed into `subject.touching`, so a caller
/// checking a subject against several bodies resets them once and
/// accumulates. Returns whether the bodies were in contact.
pub fn resolve_pair(
    mode: ResponseMode,
    subject: &mut Body,
    other: &mut Body,
    settings: &CollisionSettings,
    callback: Option<ContactCallback<'_>>,
) -> bool {
    if subject.removed || other.removed {
        return false;
    }

    // Bodies whose size is still unknown cannot collide yet
    let subject_ready = subject.ensure_collider();
    let other_ready = other.ensure_collider();
    if !(subject_ready && other_ready) {
        return false;
    }

    let ends = (subject.position, other.position);
    let displacement = swept::find_displacement(subject, other, &settings.multisample, &settings.sat);

    // Multisampling may leave both bodies at the contact sub-step
    if mode.is_detection_only() && (subject.position, other.position) != ends {
        subject.position = ends.0;
        other.position = ends.1;
        subject.sync_collider();
        other.sync_collider();
    }

    if utils::is_zero(&displacement) {
        return false;
    }

    subject.touching |= Touching::from_displacement(&displacement);

    if mode == ResponseMode::Displace && !other.immovable {
        other.position -= displacement;
        other.sync_collider();
    } else if mode.moves_subject() && !subject.immovable {
        subject.position += displacement;
        subject.previous_position = subject.position;
        subject.sync_collider();
    }

    if mode.changes_velocity() {
        let (first, second) = ImpactParams::for_pair(mode, subject, other);
        let v1 = utils::project(&subject.velocity, &displacement);
        let v2 = utils::project(&other.velocity, &displacement);
        let (v1_final, v2_final) = bounce_velocities(v1, v2, &first, &second);
        subject.velocity += v1_final - v1;
        other.velocity += v2_final - v2;
    }

    if mode.invokes_callback() {
        if let Some(callback) = callback {
            callback(subject, other);
        }
    }
    true
}

/// Reset the subject's contact flags and resolve one pair
pub fn resolve(
    mode: ResponseMode,
    subject: &mut Body,
    other: &mut Body,
    settings: &CollisionSettings,
    callback: Option<ContactCallback<'_>>,
) -> bool {
    subject.touching = Touching::empty();
    resolve_pair(mode, subject, other, settings, callback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::shape::CollisionShape;
    use approx::assert_relative_eq;

    fn square(x: Real, y: Real) -> Body {
        let mut body = Body::new(Vec2::new(x, y)).with_size(10.0, 10.0);
        body.ensure_collider();
        body
    }

    fn params(mass: Real, restitution: Real) -> ImpactParams {
        ImpactParams {
            mass,
            restitution,
            immovable: false,
        }
    }

    #[test]
    fn test_elastic_exchange() {
        let (v1, v2) = bounce_velocities(
            Vec2::new(5.0, 0.0),
            Vec2::new(-5.0, 0.0),
            &params(1.0, 1.0),
            &params(1.0, 1.0),
        );
        assert_relative_eq!(v1, Vec2::new(-5.0, 0.0));
        assert_relative_eq!(v2, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_inelastic_common_velocity() {
        let (v1, v2) = bounce_velocities(
            Vec2::new(5.0, 0.0),
            Vec2::new(-5.0, 0.0),
            &params(1.0, 0.0),
            &params(1.0, 1.0),
        );
        assert_relative_eq!(v1, Vec2::zeros());
        assert_relative_eq!(v2, Vec2::zeros());

        // Unequal masses settle on the momentum-weighted velocity
        let (v1, v2) = bounce_velocities(
            Vec2::new(6.0, 0.0),
            Vec2::new(0.0, 0.0),
            &params(2.0, 0.0),
            &params(1.0, 0.0),
        );
        assert_relative_eq!(v1.x, 4.0);
        assert_relative_eq!(v2.x, 4.0);
    }

    #[test]
    fn test_momentum_is_conserved_between_movable_bodies() {
        for (m1, m2, e) in [(1.0, 3.0, 0.5), (2.5, 0.5, 1.0), (4.0, 4.0, 0.0)] {
            let u1 = Vec2::new(3.0, 0.0);
            let u2 = Vec2::new(-1.0, 0.0);
            let (v1, v2) = bounce_velocities(u1, u2, &params(m1, e), &params(m2, 1.0));
            assert_relative_eq!(u1 * m1 + u2 * m2, v1 * m1 + v2 * m2, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_immovable_side_acts_as_infinite_mass() {
        let wall = ImpactParams {
            immovable: true,
            ..params(1.0, 1.0)
        };
        let (v1, v2) = bounce_velocities(Vec2::new(4.0, 0.0), Vec2::zeros(), &params(3.0, 1.0), &wall);
        assert_relative_eq!(v1, Vec2::new(-4.0, 0.0));
        assert_relative_eq!(v2, Vec2::zeros());
    }

    #[test]
    fn test_overrides_do_not_touch_bodies() {
        let subject = square(0.0, 0.0);
        let other = square(5.0, 0.0).with_restitution(0.7);
        let (_, collide) = ImpactParams::for_pair(ResponseMode::Collide, &subject, &other);
        let (_, bounce_off) = ImpactParams::for_pair(ResponseMode::BounceOff, &subject, &other);

        assert!(collide.immovable);
        assert_eq!(collide.restitution, 0.0);
        assert!(bounce_off.immovable);
        assert_eq!(bounce_off.restitution, 0.7);
        assert!(!other.immovable);
        assert_eq!(other.restitution, 0.7);
    }

    #[test]
    fn test_overlap_modes_only_detect() {
        for (mode, expect_callback) in [(ResponseMode::IsTouching, false), (ResponseMode::Overlap, true)] {
            let mut a = square(0.0, 0.0).with_velocity(Vec2::new(0.0, 0.0));
            let mut b = square(8.0, 0.0);
            let mut calls = 0;
            let mut count = |_: &mut Body, _: &mut Body| calls += 1;

            assert!(resolve(mode, &mut a, &mut b, &CollisionSettings::default(), Some(&mut count)));
            assert_eq!(calls, usize::from(expect_callback));
            assert_eq!(a.position, Vec2::zeros());
            assert_eq!(b.position, Vec2::new(8.0, 0.0));
            assert_eq!(a.touching, Touching::RIGHT);
        }
    }

    #[test]
    fn test_fast_overlap_leaves_bodies_at_end_of_step() {
        for mode in [ResponseMode::IsTouching, ResponseMode::Overlap] {
            let mut bullet = square(0.0, 0.0).with_velocity(Vec2::new(100.0, 0.0));
            let mut wall = Body::new(Vec2::new(50.0, 0.0)).with_size(2.0, 100.0);
            wall.ensure_collider();
            bullet.step();
            wall.step();

            assert!(resolve(mode, &mut bullet, &mut wall, &CollisionSettings::default(), None));
            assert_eq!(bullet.touching, Touching::RIGHT);
            assert_eq!(bullet.position, Vec2::new(100.0, 0.0));
            assert_eq!(wall.position, Vec2::new(50.0, 0.0));
            assert_eq!(bullet.collider().map(|c| c.center()), Some(Vec2::new(100.0, 0.0)));
        }
    }

    #[test]
    fn test_displace_pushes_other() {
        let mut a = square(0.0, 0.0);
        let mut b = square(8.0, 0.0);
        assert!(resolve(ResponseMode::Displace, &mut a, &mut b, &CollisionSettings::default(), None));
        assert_eq!(a.position, Vec2::zeros());
        assert_relative_eq!(b.position.x, 10.0, epsilon = 1e-9);
        assert!(!resolve(ResponseMode::Displace, &mut a, &mut b, &CollisionSettings::default(), None));
    }

    #[test]
    fn test_collide_stops_subject() {
        let mut a = square(0.0, 0.0);
        let mut b = square(20.0, 0.0);
        a.velocity = Vec2::new(15.0, 3.0);
        a.step();
        b.step();

        assert!(resolve(ResponseMode::Collide, &mut a, &mut b, &CollisionSettings::default(), None));
        assert_relative_eq!(a.velocity.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(a.velocity.y, 3.0, epsilon = 1e-9);
        assert_eq!(b.velocity, Vec2::zeros());
        assert_eq!(b.position, Vec2::new(20.0, 0.0));
        assert!(a.position.x + 5.0 <= 15.0 + 1e-9);
    }

    #[test]
    fn test_bounce_exchanges_velocity() {
        let mut a = square(0.0, 0.0).with_velocity(Vec2::new(2.0, 0.0));
        let mut b = square(12.0, 0.0).with_velocity(Vec2::new(-2.0, 0.0));
        a.step();
        b.step();

        assert!(resolve(ResponseMode::Bounce, &mut a, &mut b, &CollisionSettings::default(), None));
        assert_relative_eq!(a.velocity.x, -2.0, epsilon = 1e-9);
        assert_relative_eq!(b.velocity.x, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bounce_off_reflects_subject_only() {
        let mut a = square(0.0, 0.0).with_velocity(Vec2::new(3.0, 0.0));
        let mut b = square(12.0, 0.0).with_velocity(Vec2::new(-1.0, 0.0));
        a.step();
        b.step();

        assert!(resolve(ResponseMode::BounceOff, &mut a, &mut b, &CollisionSettings::default(), None));
        // Relative normal speed reverses against an immovable partner
        assert_relative_eq!(a.velocity.x, -5.0, epsilon = 1e-9);
        assert_relative_eq!(b.velocity.x, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_immovable_bodies_never_move() {
        let modes = [
            ResponseMode::IsTouching,
            ResponseMode::Overlap,
            ResponseMode::Displace,
            ResponseMode::Collide,
            ResponseMode::Bounce,
            ResponseMode::BounceOff,
        ];
        for mode in modes {
            for (subject_fixed, other_fixed) in [(true, false), (false, true), (true, true)] {
                let mut a = square(0.0, 0.0).with_velocity(Vec2::new(30.0, 1.0));
                let mut b = square(40.0, 0.0).with_velocity(Vec2::new(-30.0, 0.0));
                a.immovable = subject_fixed;
                b.immovable = other_fixed;
                a.step();
                b.step();
                let (a_end, b_end) = (a.position, b.position);

                assert!(resolve(mode, &mut a, &mut b, &CollisionSettings::default(), None), "{mode:?}");
                if subject_fixed {
                    assert_eq!(a.position, a_end, "{mode:?} moved an immovable subject");
                }
                if other_fixed {
                    assert_eq!(b.position, b_end, "{mode:?} moved an immovable other");
                }
            }
        }
    }

    #[test]
    fn test_unsized_body_reports_no_contact() {
        let mut a = square(0.0, 0.0);
        let mut b = Body::new(Vec2::new(1.0, 1.0));
        let mut called = false;
        let mut cb = |_: &mut Body, _: &mut Body| called = true;
        assert!(!resolve(ResponseMode::Bounce, &mut a, &mut b, &CollisionSettings::default(), Some(&mut cb)));
        assert!(!called);
    }
}
