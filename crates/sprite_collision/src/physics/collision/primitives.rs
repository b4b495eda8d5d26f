//! Concrete collider kinds
//!
//! Point, circle, axis-aligned box and oriented box. All are convex and
//! centrosymmetric, which is what lets the SAT resolver compare projected
//! radii against the projected center distance.

use crate::debug::draw::{Color, DebugDraw};
use crate::foundation::math::{x_axis, y_axis, Real, Vec2};

use super::shape::{Collider, CollisionShape, OwnerFrame, ShapeTransform};

/// Projected radius of a box given two adjacent half-diagonals
fn box_radius_on_axis(half_diagonals: &[Vec2; 2], axis: &Vec2) -> Real {
    let length = axis.norm();
    if length == 0.0 {
        return 0.0;
    }
    half_diagonals
        .iter()
        .map(|diagonal| (diagonal.dot(axis) / length).abs())
        .fold(0.0, Real::max)
}

/// Three consecutive corners of a `width` x `height` rectangle in local space
fn local_corners(width: Real, height: Real) -> [Vec2; 3] {
    let (hw, hh) = (width / 2.0, height / 2.0);
    [Vec2::new(hw, -hh), Vec2::new(hw, hh), Vec2::new(-hw, hh)]
}

fn box_outline(center: Vec2, half_diagonals: &[Vec2; 2]) -> [Vec2; 4] {
    [
        center + half_diagonals[0],
        center + half_diagonals[1],
        center - half_diagonals[0],
        center - half_diagonals[1],
    ]
}

/// A single point
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCollider {
    transform: ShapeTransform,
}

impl PointCollider {
    /// Create a point at `offset` from its parent origin
    pub fn new(offset: Vec2) -> Self {
        Self {
            transform: ShapeTransform::new(offset, 0.0),
        }
    }
}

impl CollisionShape for PointCollider {
    fn shape_transform(&self) -> &ShapeTransform {
        &self.transform
    }

    fn shape_transform_mut(&mut self) -> &mut ShapeTransform {
        &mut self.transform
    }

    fn draw(&self, out: &mut dyn DebugDraw, color: Color) {
        out.point(self.center(), color);
    }
}

/// A circle
#[derive(Debug, Clone, PartialEq)]
pub struct CircleCollider {
    transform: ShapeTransform,
    radius: Real,
    scaled_radius: Real,

    /// Take the radius from the owner's size on every update
    pub gets_dimensions_from_owner: bool,
}

impl CircleCollider {
    /// Create a circle at `offset` with a local radius
    pub fn new(offset: Vec2, radius: Real) -> Self {
        let mut circle = Self {
            transform: ShapeTransform::new(offset, 0.0),
            radius,
            scaled_radius: radius,
            gets_dimensions_from_owner: false,
        };
        circle.refresh();
        circle
    }

    /// Local radius
    pub fn radius(&self) -> Real {
        self.radius
    }

    /// Radius after both transforms
    pub fn scaled_radius(&self) -> Real {
        self.scaled_radius
    }

    /// Change the local radius
    pub fn set_radius(&mut self, radius: Real) {
        self.radius = radius;
        self.refresh();
    }
}

impl CollisionShape for CircleCollider {
    fn shape_transform(&self) -> &ShapeTransform {
        &self.transform
    }

    fn shape_transform_mut(&mut self) -> &mut ShapeTransform {
        &mut self.transform
    }

    fn refresh(&mut self) {
        self.transform.refresh();
        let rim = self
            .transform
            .composed()
            .transform_point(&Vec2::new(self.radius, 0.0));
        self.scaled_radius = (rim - self.transform.center()).norm();
    }

    fn candidate_axes(&self, other: &Collider) -> Vec<Vec2> {
        match other.half_diagonals() {
            // Against a box the separating axis runs through its nearest vertex
            Some(half_diagonals) => {
                let center = self.center();
                let nearest = box_outline(other.center(), &half_diagonals)
                    .into_iter()
                    .map(|vertex| vertex - center)
                    .fold(None, |best: Option<Vec2>, axis| match best {
                        Some(b) if b.norm_squared() <= axis.norm_squared() => Some(b),
                        _ => Some(axis),
                    });
                nearest.into_iter().collect()
            }
            None => vec![other.center() - self.center()],
        }
    }

    fn radius_on_axis(&self, _axis: &Vec2) -> Real {
        self.scaled_radius
    }

    fn min_radius(&self) -> Real {
        self.scaled_radius
    }

    fn update_from_owner(&mut self, owner: &OwnerFrame) {
        if self.gets_dimensions_from_owner {
            if let Some(size) = owner.size {
                self.radius = size.x.max(size.y) / 2.0;
            }
        }
        // Uniform scale keeps the circle circular
        self.set_parent_transform(owner.uniform_parent_transform());
    }

    fn draw(&self, out: &mut dyn DebugDraw, color: Color) {
        out.circle(self.center(), self.scaled_radius, color);
    }
}

/// A box whose edges stay parallel to the world axes.
///
/// Rotation from either transform grows the box to enclose the rotated
/// rectangle instead of turning it.
#[derive(Debug, Clone, PartialEq)]
pub struct AabbCollider {
    transform: ShapeTransform,
    width: Real,
    height: Real,
    half_diagonals: [Vec2; 2],

    /// Take width and height from the owner's size on every update
    pub gets_dimensions_from_owner: bool,
}

impl AabbCollider {
    /// Create a box at `offset` with a local size
    pub fn new(offset: Vec2, width: Real, height: Real) -> Self {
        let mut aabb = Self {
            transform: ShapeTransform::new(offset, 0.0),
            width,
            height,
            half_diagonals: [Vec2::zeros(); 2],
            gets_dimensions_from_owner: false,
        };
        aabb.refresh();
        aabb
    }

    /// Local width
    pub fn width(&self) -> Real {
        self.width
    }

    /// Local height
    pub fn height(&self) -> Real {
        self.height
    }

    /// World-space half-diagonals to the top-right and bottom-right corners
    pub fn half_diagonals(&self) -> [Vec2; 2] {
        self.half_diagonals
    }

    /// Change the local size
    pub fn set_size(&mut self, width: Real, height: Real) {
        self.width = width;
        self.height = height;
        self.refresh();
    }
}

impl CollisionShape for AabbCollider {
    fn shape_transform(&self) -> &ShapeTransform {
        &self.transform
    }

    fn shape_transform_mut(&mut self) -> &mut ShapeTransform {
        &mut self.transform
    }

    fn refresh(&mut self) {
        self.transform.refresh();
        let center = self.transform.center();
        let composed = *self.transform.composed();
        let [d0, d1, d2] = local_corners(self.width, self.height)
            .map(|corner| composed.transform_point(&corner) - center);

        let half_width = d0.x.abs().max(d1.x.abs());
        let half_height = d1.y.abs().max(d2.y.abs());
        self.half_diagonals = [
            Vec2::new(half_width, -half_height),
            Vec2::new(half_width, half_height),
        ];
    }

    fn candidate_axes(&self, _other: &Collider) -> Vec<Vec2> {
        vec![x_axis(), y_axis()]
    }

    fn radius_on_axis(&self, axis: &Vec2) -> Real {
        box_radius_on_axis(&self.half_diagonals, axis)
    }

    fn min_radius(&self) -> Real {
        self.half_diagonals[1].x.min(self.half_diagonals[1].y)
    }

    fn update_from_owner(&mut self, owner: &OwnerFrame) {
        if self.gets_dimensions_from_owner {
            if let Some(size) = owner.size {
                self.width = size.x;
                self.height = size.y;
            }
        }
        self.set_parent_transform(owner.parent_transform());
    }

    fn draw(&self, out: &mut dyn DebugDraw, color: Color) {
        out.polygon(&box_outline(self.center(), &self.half_diagonals), color);
    }
}

/// A box that rotates with its local and parent transforms
#[derive(Debug, Clone, PartialEq)]
pub struct ObbCollider {
    transform: ShapeTransform,
    width: Real,
    height: Real,
    half_diagonals: [Vec2; 2],
    axes: [Vec2; 2],

    /// Take width and height from the owner's size on every update
    pub gets_dimensions_from_owner: bool,
}

impl Default for ObbCollider {
    fn default() -> Self {
        Self::new(Vec2::zeros(), 0.0, 0.0, 0.0)
    }
}

impl ObbCollider {
    /// Create a box at `offset` with a local size and rotation (radians)
    pub fn new(offset: Vec2, width: Real, height: Real, rotation: Real) -> Self {
        let mut obb = Self {
            transform: ShapeTransform::new(offset, rotation),
            width,
            height,
            half_diagonals: [Vec2::zeros(); 2],
            axes: [x_axis(), y_axis()],
            gets_dimensions_from_owner: false,
        };
        obb.refresh();
        obb
    }

    /// Local width
    pub fn width(&self) -> Real {
        self.width
    }

    /// Local height
    pub fn height(&self) -> Real {
        self.height
    }

    /// World-space half-diagonals to the top-right and bottom-right corners
    pub fn half_diagonals(&self) -> [Vec2; 2] {
        self.half_diagonals
    }

    /// World-space edge vectors, one per face pair. Not normalized.
    pub fn axes(&self) -> [Vec2; 2] {
        self.axes
    }

    /// Change the local size
    pub fn set_size(&mut self, width: Real, height: Real) {
        self.width = width;
        self.height = height;
        self.refresh();
    }
}

impl CollisionShape for ObbCollider {
    fn shape_transform(&self) -> &ShapeTransform {
        &self.transform
    }

    fn shape_transform_mut(&mut self) -> &mut ShapeTransform {
        &mut self.transform
    }

    fn refresh(&mut self) {
        self.transform.refresh();
        let center = self.transform.center();
        let composed = *self.transform.composed();
        let [v0, v1, v2] = local_corners(self.width, self.height)
            .map(|corner| composed.transform_point(&corner));

        self.half_diagonals = [v0 - center, v1 - center];
        self.axes = [v1 - v2, v1 - v0];
    }

    fn candidate_axes(&self, _other: &Collider) -> Vec<Vec2> {
        self.axes.to_vec()
    }

    fn radius_on_axis(&self, axis: &Vec2) -> Real {
        box_radius_on_axis(&self.half_diagonals, axis)
    }

    fn min_radius(&self) -> Real {
        self.axes[0].norm().min(self.axes[1].norm()) / 2.0
    }

    fn update_from_owner(&mut self, owner: &OwnerFrame) {
        if self.gets_dimensions_from_owner {
            if let Some(size) = owner.size {
                self.width = size.x;
                self.height = size.y;
            }
        }
        self.set_parent_transform(owner.parent_transform());
    }

    fn draw(&self, out: &mut dyn DebugDraw, color: Color) {
        out.polygon(&box_outline(self.center(), &self.half_diagonals), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::draw::{DebugDrawList, DebugShape};
    use crate::foundation::math::constants::{HALF_PI, PI};
    use approx::assert_relative_eq;

    fn owner(position: Vec2, rotation: Real, scale: Vec2) -> OwnerFrame {
        OwnerFrame {
            position,
            rotation,
            scale,
            size: Some(Vec2::new(20.0, 10.0)),
        }
    }

    #[test]
    fn test_circle_radius_uses_larger_owner_scale() {
        let mut circle = CircleCollider::new(Vec2::zeros(), 5.0);
        circle.update_from_owner(&owner(Vec2::new(1.0, 2.0), 0.3, Vec2::new(2.0, 3.0)));
        assert_relative_eq!(circle.scaled_radius(), 15.0, epsilon = 1e-9);
        assert_relative_eq!(circle.min_radius(), 15.0, epsilon = 1e-9);
        assert_eq!(circle.center(), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_circle_tracks_owner_size() {
        let mut circle = CircleCollider::new(Vec2::zeros(), 1.0);
        circle.gets_dimensions_from_owner = true;
        circle.update_from_owner(&owner(Vec2::zeros(), 0.0, Vec2::new(1.0, 1.0)));
        assert_relative_eq!(circle.radius(), 10.0);
        assert_relative_eq!(circle.scaled_radius(), 10.0);
    }

    #[test]
    fn test_circle_axis_points_at_nearest_box_vertex() {
        let circle = CircleCollider::new(Vec2::new(20.0, 20.0), 1.0);
        let aabb = Collider::from(AabbCollider::new(Vec2::zeros(), 10.0, 10.0));
        let axes = circle.candidate_axes(&aabb);
        assert_eq!(axes, vec![Vec2::new(-15.0, -15.0)]);

        let other = Collider::from(CircleCollider::new(Vec2::new(23.0, 24.0), 1.0));
        assert_eq!(circle.candidate_axes(&other), vec![Vec2::new(3.0, 4.0)]);
    }

    #[test]
    fn test_aabb_encloses_rotated_rectangle() {
        let mut aabb = AabbCollider::new(Vec2::zeros(), 10.0, 10.0);
        aabb.set_rotation(PI / 4.0);
        let half = 5.0 * 2f64.sqrt();
        assert_relative_eq!(aabb.radius_on_axis(&x_axis()), half, epsilon = 1e-9);
        assert_relative_eq!(aabb.radius_on_axis(&y_axis()), half, epsilon = 1e-9);
        assert_eq!(aabb.candidate_axes(&Collider::from(aabb.clone())), vec![x_axis(), y_axis()]);
    }

    #[test]
    fn test_aabb_tracks_owner_size_and_scale() {
        let mut aabb = AabbCollider::new(Vec2::zeros(), 1.0, 1.0);
        aabb.gets_dimensions_from_owner = true;
        aabb.update_from_owner(&owner(Vec2::new(50.0, 50.0), 0.0, Vec2::new(2.0, 1.0)));
        let bounds = aabb.bounding_box();
        assert_relative_eq!(bounds.width(), 40.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.height(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(aabb.min_radius(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_obb_axes_follow_rotation() {
        let obb = ObbCollider::new(Vec2::zeros(), 20.0, 10.0, HALF_PI);
        let [width_axis, height_axis] = obb.axes();

        // A quarter turn maps the width edge onto the y axis
        assert_relative_eq!(width_axis.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(width_axis.y.abs(), 20.0, epsilon = 1e-9);
        assert_relative_eq!(height_axis.x.abs(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(height_axis.y, 0.0, epsilon = 1e-9);

        assert_relative_eq!(obb.radius_on_axis(&x_axis()), 5.0, epsilon = 1e-9);
        assert_relative_eq!(obb.radius_on_axis(&y_axis()), 10.0, epsilon = 1e-9);
        assert_relative_eq!(obb.min_radius(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_obb_radius_on_unnormalized_axis() {
        let obb = ObbCollider::new(Vec2::zeros(), 20.0, 10.0, 0.0);
        assert_relative_eq!(obb.radius_on_axis(&Vec2::new(7.0, 0.0)), 10.0, epsilon = 1e-9);
        assert_relative_eq!(obb.radius_on_axis(&Vec2::zeros()), 0.0);
    }

    #[test]
    fn test_draw_leaves_shape_untouched() {
        let obb = ObbCollider::new(Vec2::new(3.0, 3.0), 4.0, 2.0, 0.5);
        let before = obb.clone();
        let mut list = DebugDrawList::new();
        obb.draw(&mut list, DebugDrawList::default_color());
        assert_eq!(obb, before);
        assert!(matches!(list.shapes()[0], DebugShape::Polygon { ref vertices, .. } if vertices.len() == 4));
    }
}
