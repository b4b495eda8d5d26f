//! Separating Axis Theorem narrow phase
//!
//! Valid only for convex, centrosymmetric shapes. Because every collider is
//! symmetric about its center, the projection of a shape on an axis is fully
//! described by one radius, and the overlap on an axis reduces to
//! `ra + rb - |delta . axis|`.

use crate::config::SatOptions;
use crate::foundation::math::{utils, x_axis, Real, Vec2};

use super::shape::{Collider, CollisionShape};

/// Normalized axes worth testing for the pair.
///
/// Zero axes become the X axis. When two axes are parallel only the later
/// one is kept.
pub fn candidate_axes(a: &Collider, b: &Collider, tolerance: Real) -> Vec<Vec2> {
    let axes: Vec<Vec2> = a
        .candidate_axes(b)
        .into_iter()
        .chain(b.candidate_axes(a))
        .map(|axis| if utils::is_zero(&axis) { x_axis() } else { axis })
        .collect();

    axes.iter()
        .enumerate()
        .filter(|(i, axis)| {
            !axes[i + 1..]
                .iter()
                .any(|later| utils::is_parallel(axis, later, tolerance))
        })
        .map(|(_, axis)| axis.normalize())
        .collect()
}

/// Minimum translation vector for `a` with explicit options.
///
/// The result points from `b` towards `a`; adding it to `a`'s position
/// separates the pair. When the centers coincide exactly the axis itself
/// is used, so the result is `-axis * overlap`.
pub fn collide_with(a: &Collider, b: &Collider, options: &SatOptions) -> Vec2 {
    let delta = b.center() - a.center();
    let mut smallest: Option<(Real, Vec2)> = None;

    for axis in candidate_axes(a, b, options.parallel_tolerance) {
        let distance = delta.dot(&axis);
        let overlap = a.radius_on_axis(&axis) + b.radius_on_axis(&axis) - distance.abs();
        if overlap <= 0.0 {
            return Vec2::zeros();
        }

        if smallest.map_or(true, |(best, _)| overlap < best) {
            let direction = if distance == 0.0 { axis } else { axis * distance.signum() };
            smallest = Some((overlap, direction));
        }
    }

    smallest.map_or_else(Vec2::zeros, |(overlap, direction)| -direction * overlap)
}

/// Minimum translation vector moving `a` out of `b`, zero when disjoint
pub fn collide(a: &Collider, b: &Collider) -> Vec2 {
    collide_with(a, b, &SatOptions::default())
}

/// Whether the two shapes overlap
pub fn overlap(a: &Collider, b: &Collider) -> bool {
    !utils::is_zero(&collide(a, b))
}
