//! Swept collision and tunneling prevention
//!
//! A body moving fast enough can start a step on one side of a thin
//! obstacle and end it on the other, so a single end-of-frame test misses
//! the contact. Each moving body keeps an oriented box covering its whole
//! step. When two such boxes overlap, the step is replayed in sub-steps
//! and the exact colliders are tested at every one of them.

use log::debug;

use crate::config::{MultisampleOptions, SatOptions};
use crate::foundation::math::{utils, Vec2};

use super::body::Body;
use super::collision::{sat, CollisionShape, ObbCollider};

/// Reshape `body`'s swept box around the step it is about to take.
///
/// Call before integrating. The box is centered halfway along the
/// velocity, as long as the velocity plus the collider's extent along it,
/// and as wide as the collider across it.
pub fn update_swept_collider(body: &mut Body) {
    let Some(collider) = body.collider() else {
        return;
    };

    let velocity = body.velocity;
    let width = velocity.norm() + 2.0 * collider.radius_on_axis(&velocity);
    let height = 2.0 * collider.radius_on_axis(&utils::perpendicular(&velocity));
    let center = body.position + velocity * 0.5;

    body.swept = ObbCollider::new(center, width, height, utils::heading(&velocity)).into();
    body.swept_valid = true;
}

/// Whether the two bodies' broad-phase shapes overlap this step
pub fn swept_colliders_overlap(a: &Body, b: &Body, options: &SatOptions) -> bool {
    match (a.broad_phase_collider(), b.broad_phase_collider()) {
        (Some(sa), Some(sb)) => !utils::is_zero(&sat::collide_with(sa, sb, options)),
        _ => false,
    }
}

/// Replay the step in sub-steps looking for a contact the end-of-frame
/// test would miss.
///
/// On a hit the bodies are left at the sub-step position, except that
/// immovable bodies are returned to their end position.
fn multisample(a: &mut Body, b: &mut Body, options: &MultisampleOptions, sat_options: &SatOptions) -> Option<Vec2> {
    let radius = a.collider()?.min_radius().max(b.collider()?.min_radius());
    let relative_speed = (a.velocity - b.velocity).norm();
    if relative_speed == 0.0 {
        return None;
    }

    let timestep = options.min_timestep.max(radius / relative_speed);
    if !(timestep > 0.0 && timestep < 1.0) {
        return None;
    }

    let (a_end, b_end) = (a.position, b.position);
    let (a_start, b_start) = (a.previous_position, b.previous_position);

    let mut k: u32 = 1;
    while f64::from(k) * timestep < 1.0 {
        let t = f64::from(k) * timestep;
        a.position = a_start + (a_end - a_start) * t;
        b.position = b_start + (b_end - b_start) * t;
        a.sync_collider();
        b.sync_collider();

        let displacement = match (a.collider(), b.collider()) {
            (Some(ca), Some(cb)) => sat::collide_with(ca, cb, sat_options),
            _ => Vec2::zeros(),
        };

        if !utils::is_zero(&displacement) {
            debug!("Multisample hit at t = {t:.3} ({k} of {:.0} samples)", (1.0 / timestep).ceil());
            if a.immovable {
                a.position = a_end;
                a.sync_collider();
            }
            if b.immovable {
                b.position = b_end;
                b.sync_collider();
            }
            return Some(displacement);
        }
        k += 1;
    }

    a.position = a_end;
    b.position = b_end;
    None
}

/// Displacement that moves `a` out of `b`, zero if they do not touch.
///
/// Runs the multisampling pass when the swept boxes overlap, then falls
/// back to a single end-of-frame test.
pub fn find_displacement(
    a: &mut Body,
    b: &mut Body,
    options: &MultisampleOptions,
    sat_options: &SatOptions,
) -> Vec2 {
    if options.enabled && swept_colliders_overlap(a, b, sat_options) {
        if let Some(displacement) = multisample(a, b, options, sat_options) {
            return displacement;
        }
    }

    a.sync_collider();
    b.sync_collider();
    match (a.collider(), b.collider()) {
        (Some(ca), Some(cb)) => sat::collide_with(ca, cb, sat_options),
        _ => Vec2::zeros(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::ColliderSpec;
    use approx::assert_relative_eq;

    fn projectile() -> Body {
        let mut body = Body::new(Vec2::new(0.0, 0.0))
            .with_size(10.0, 10.0)
            .with_velocity(Vec2::new(100.0, 0.0));
        body.ensure_collider();
        body
    }

    fn wall() -> Body {
        let mut body = Body::new(Vec2::new(50.0, 0.0)).with_size(2.0, 100.0);
        body.ensure_collider();
        body
    }

    #[test]
    fn test_swept_box_covers_the_step() {
        let mut body = projectile();
        body.velocity = Vec2::new(0.0, 40.0);
        body.step();

        let swept = body.swept_collider();
        assert_relative_eq!(swept.center().y, 20.0, epsilon = 1e-9);
        let bounds = swept.bounding_box();
        assert_relative_eq!(bounds.height(), 50.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.width(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_single_end_of_frame_test_misses_thin_wall() {
        let mut a = projectile();
        let mut b = wall();
        a.step();
        b.step();

        let disabled = MultisampleOptions {
            enabled: false,
            ..MultisampleOptions::default()
        };
        let displacement = find_displacement(&mut a, &mut b, &disabled, &SatOptions::default());
        assert_eq!(displacement, Vec2::zeros());
    }

    #[test]
    fn test_multisampling_catches_tunneling() {
        let mut a = projectile();
        let mut b = wall();
        a.step();
        b.step();
        assert!(swept_colliders_overlap(&a, &b, &SatOptions::default()));

        let displacement =
            find_displacement(&mut a, &mut b, &MultisampleOptions::default(), &SatOptions::default());
        assert!(displacement.x < 0.0);
        assert_relative_eq!(displacement.y, 0.0);

        // A is left where the contact happened; applying the displacement
        // puts its right face on the wall's left face.
        let right_face = a.position.x + displacement.x + 5.0;
        assert_relative_eq!(right_face, 49.0, epsilon = 1e-9);
        assert_eq!(b.position, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn test_immovable_body_snaps_back_to_end_position() {
        let mut a = projectile();
        let mut b = wall().immovable();
        b.velocity = Vec2::new(-4.0, 0.0);
        a.step();
        b.step();
        let b_end = b.position;

        let displacement =
            find_displacement(&mut a, &mut b, &MultisampleOptions::default(), &SatOptions::default());
        assert!(!utils::is_zero(&displacement));
        assert_eq!(b.position, b_end);
        assert_eq!(b.collider().map(|c| c.center()), Some(b_end));
    }

    #[test]
    fn test_zero_relative_speed_skips_multisampling() {
        let mut a = projectile();
        let mut b = wall();
        b.velocity = a.velocity;
        a.step();
        b.step();

        let displacement =
            find_displacement(&mut a, &mut b, &MultisampleOptions::default(), &SatOptions::default());
        assert_eq!(displacement, Vec2::zeros());
        assert_eq!(a.position, Vec2::new(100.0, 0.0));
        assert_eq!(b.position, Vec2::new(150.0, 0.0));
    }

    #[test]
    fn test_missing_collider_reports_no_contact() {
        let mut a = projectile();
        let mut b = Body::new(Vec2::new(5.0, 0.0));
        a.step();
        let displacement =
            find_displacement(&mut a, &mut b, &MultisampleOptions::default(), &SatOptions::default());
        assert_eq!(displacement, Vec2::zeros());
    }

    #[test]
    fn test_slow_bodies_use_end_of_frame_test() {
        let mut a = Body::new(Vec2::zeros()).with_velocity(Vec2::new(1.0, 0.0));
        a.set_collider(&ColliderSpec::Circle {
            offset: Vec2::zeros(),
            radius: Some(5.0),
        })
        .unwrap();
        let mut b = Body::new(Vec2::new(10.5, 0.0));
        b.set_collider(&ColliderSpec::Circle {
            offset: Vec2::zeros(),
            radius: Some(5.0),
        })
        .unwrap();
        a.step();
        b.step();

        let displacement =
            find_displacement(&mut a, &mut b, &MultisampleOptions::default(), &SatOptions::default());
        assert_relative_eq!(displacement.x, -0.5, epsilon = 1e-9);
        assert_eq!(a.position, Vec2::new(1.0, 0.0));
    }
}
