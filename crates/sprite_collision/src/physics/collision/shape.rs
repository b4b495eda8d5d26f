//! Collision shape abstractions
//!
//! Shapes keep their geometry in local space plus two transforms: their own
//! local transform and a parent transform supplied by the owning body. The
//! world-space quantities every test needs (center, half-diagonals, axes,
//! scaled radius) are cached and recomputed by `refresh()`, which every
//! mutator calls before returning. A shape is therefore never stale after a
//! setter, and tests never pay for the transform.

use crate::debug::draw::{Color, DebugDraw};
use crate::foundation::math::{x_axis, y_axis, Real, Vec2};
use crate::foundation::transform::Transform2D;
use crate::spatial::Rect;

use super::primitives::{AabbCollider, CircleCollider, ObbCollider, PointCollider};

/// Local/parent transform pair with cached world-space results
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeTransform {
    offset: Vec2,
    rotation: Real,
    scale: Vec2,
    local: Transform2D,
    parent: Transform2D,
    composed: Transform2D,
    center: Vec2,
}

impl ShapeTransform {
    /// Create a transform at `offset` from the parent origin
    pub fn new(offset: Vec2, rotation: Real) -> Self {
        let mut transform = Self {
            offset,
            rotation,
            scale: Vec2::new(1.0, 1.0),
            local: Transform2D::identity(),
            parent: Transform2D::identity(),
            composed: Transform2D::identity(),
            center: offset,
        };
        transform.refresh();
        transform
    }

    /// Rebuild the local and composed transforms and the world center
    pub fn refresh(&mut self) {
        self.local
            .clear()
            .scale_by(self.scale)
            .rotate(self.rotation)
            .translate_by(self.offset);
        self.composed = Transform2D::product(&self.parent, &self.local);
        self.center = self.parent.transform_point(&self.offset);
    }

    /// Offset from the parent origin, in parent space
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Local rotation in radians
    pub fn rotation(&self) -> Real {
        self.rotation
    }

    /// Local scale
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// World-space center
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Local transform (scale, then rotate, then offset)
    pub fn local(&self) -> &Transform2D {
        &self.local
    }

    /// Transform supplied by the owner
    pub fn parent(&self) -> &Transform2D {
        &self.parent
    }

    /// `parent * local`
    pub fn composed(&self) -> &Transform2D {
        &self.composed
    }

    pub(crate) fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    pub(crate) fn set_rotation(&mut self, rotation: Real) {
        self.rotation = rotation;
    }

    pub(crate) fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    pub(crate) fn set_parent(&mut self, parent: Transform2D) {
        self.parent = parent;
    }
}

impl Default for ShapeTransform {
    fn default() -> Self {
        Self::new(Vec2::zeros(), 0.0)
    }
}

/// State of the object a shape is attached to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OwnerFrame {
    /// World position
    pub position: Vec2,
    /// Rotation in radians, clockwise-positive on screen
    pub rotation: Real,
    /// Per-axis scale
    pub scale: Vec2,
    /// Unscaled size, `None` while unknown
    pub size: Option<Vec2>,
}

impl OwnerFrame {
    /// Unscaled, unrotated owner at `position`
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            size: None,
        }
    }

    /// Owner placement as `T * R * S`
    pub fn parent_transform(&self) -> Transform2D {
        let mut transform = Transform2D::identity();
        transform
            .scale_by(self.scale)
            .rotate(self.rotation)
            .translate_by(self.position);
        transform
    }

    /// Owner placement with the larger scale factor applied uniformly
    pub fn uniform_parent_transform(&self) -> Transform2D {
        let mut transform = Transform2D::identity();
        transform
            .scale_uniform(self.scale.x.max(self.scale.y))
            .rotate(self.rotation)
            .translate_by(self.position);
        transform
    }
}

/// Capability set shared by every collider kind.
///
/// Default bodies give point semantics: no axes and zero extent.
pub trait CollisionShape {
    /// Cached transform state
    fn shape_transform(&self) -> &ShapeTransform;

    /// Mutable transform state. Callers must `refresh()` afterwards.
    fn shape_transform_mut(&mut self) -> &mut ShapeTransform;

    /// Recompute every cached world-space quantity
    fn refresh(&mut self) {
        self.shape_transform_mut().refresh();
    }

    /// World-space center
    fn center(&self) -> Vec2 {
        self.shape_transform().center()
    }

    /// Axes worth testing against `other`. Need not be normalized.
    fn candidate_axes(&self, _other: &Collider) -> Vec<Vec2> {
        Vec::new()
    }

    /// Half-width of this shape's projection onto `axis`
    fn radius_on_axis(&self, _axis: &Vec2) -> Real {
        0.0
    }

    /// Smallest projected radius over all axes
    fn min_radius(&self) -> Real {
        0.0
    }

    /// World-space axis-aligned bounds
    fn bounding_box(&self) -> Rect {
        let extents = Vec2::new(
            self.radius_on_axis(&x_axis()),
            self.radius_on_axis(&y_axis()),
        );
        Rect::from_center_extents(self.center(), extents)
    }

    /// Replace the parent transform
    fn set_parent_transform(&mut self, parent: Transform2D) {
        self.shape_transform_mut().set_parent(parent);
        self.refresh();
    }

    /// Move the shape within its parent
    fn set_offset(&mut self, offset: Vec2) {
        self.shape_transform_mut().set_offset(offset);
        self.refresh();
    }

    /// Rotate the shape within its parent (radians)
    fn set_rotation(&mut self, rotation: Real) {
        self.shape_transform_mut().set_rotation(rotation);
        self.refresh();
    }

    /// Scale the shape within its parent
    fn set_scale(&mut self, scale: Vec2) {
        self.shape_transform_mut().set_scale(scale);
        self.refresh();
    }

    /// Follow the owner's placement (and size, for shapes that track it)
    fn update_from_owner(&mut self, owner: &OwnerFrame) {
        self.set_parent_transform(owner.parent_transform());
    }

    /// Emit an outline. Never mutates the shape.
    fn draw(&self, out: &mut dyn DebugDraw, color: Color);
}

/// The closed set of collider kinds
#[derive(Debug, Clone, PartialEq)]
pub enum Collider {
    /// Zero-extent point
    Point(PointCollider),
    /// Circle
    Circle(CircleCollider),
    /// Box whose axes stay aligned with the world
    Aabb(AabbCollider),
    /// Box that rotates with its transforms
    Obb(ObbCollider),
}

macro_rules! delegate {
    ($self:expr, $shape:ident => $body:expr) => {
        match $self {
            Collider::Point($shape) => $body,
            Collider::Circle($shape) => $body,
            Collider::Aabb($shape) => $body,
            Collider::Obb($shape) => $body,
        }
    };
}

impl Collider {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Collider::Point(_) => "point",
            Collider::Circle(_) => "circle",
            Collider::Aabb(_) => "aabb",
            Collider::Obb(_) => "obb",
        }
    }

    /// World-space half-diagonals for box kinds
    pub fn half_diagonals(&self) -> Option<[Vec2; 2]> {
        match self {
            Collider::Aabb(aabb) => Some(aabb.half_diagonals()),
            Collider::Obb(obb) => Some(obb.half_diagonals()),
            Collider::Point(_) | Collider::Circle(_) => None,
        }
    }

    /// Minimum translation vector moving `self` out of `other`
    pub fn collide(&self, other: &Collider) -> Vec2 {
        super::sat::collide(self, other)
    }

    /// Whether the two shapes overlap
    pub fn overlap(&self, other: &Collider) -> bool {
        super::sat::overlap(self, other)
    }
}

impl CollisionShape for Collider {
    fn shape_transform(&self) -> &ShapeTransform {
        delegate!(self, shape => shape.shape_transform())
    }

    fn shape_transform_mut(&mut self) -> &mut ShapeTransform {
        delegate!(self, shape => shape.shape_transform_mut())
    }

    fn refresh(&mut self) {
        delegate!(self, shape => shape.refresh());
    }

    fn center(&self) -> Vec2 {
        delegate!(self, shape => shape.center())
    }

    fn candidate_axes(&self, other: &Collider) -> Vec<Vec2> {
        delegate!(self, shape => shape.candidate_axes(other))
    }

    fn radius_on_axis(&self, axis: &Vec2) -> Real {
        delegate!(self, shape => shape.radius_on_axis(axis))
    }

    fn min_radius(&self) -> Real {
        delegate!(self, shape => shape.min_radius())
    }

    fn bounding_box(&self) -> Rect {
        delegate!(self, shape => shape.bounding_box())
    }

    fn update_from_owner(&mut self, owner: &OwnerFrame) {
        delegate!(self, shape => shape.update_from_owner(owner));
    }

    fn draw(&self, out: &mut dyn DebugDraw, color: Color) {
        delegate!(self, shape => shape.draw(out, color));
    }
}

impl From<PointCollider> for Collider {
    fn from(shape: PointCollider) -> Self {
        Collider::Point(shape)
    }
}

impl From<CircleCollider> for Collider {
    fn from(shape: CircleCollider) -> Self {
        Collider::Circle(shape)
    }
}

impl From<AabbCollider> for Collider {
    fn from(shape: AabbCollider) -> Self {
        Collider::Aabb(shape)
    }
}

impl From<ObbCollider> for Collider {
    fn from(shape: ObbCollider) -> Self {
        Collider::Obb(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::HALF_PI;
    use approx::assert_relative_eq;

    #[test]
    fn test_center_follows_parent() {
        let mut transform = ShapeTransform::new(Vec2::new(10.0, 0.0), 0.0);
        let owner = OwnerFrame {
            position: Vec2::new(100.0, 50.0),
            rotation: HALF_PI,
            scale: Vec2::new(2.0, 2.0),
            size: None,
        };
        transform.set_parent(owner.parent_transform());
        transform.refresh();

        // Offset (10, 0) scaled to (20, 0), rotated a quarter turn to (0, 20)
        assert_relative_eq!(transform.center().x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(transform.center().y, 70.0, epsilon = 1e-9);
    }

    #[test]
    fn test_uniform_parent_uses_larger_scale() {
        let owner = OwnerFrame {
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 3.0),
            size: None,
        };
        let factors = owner.uniform_parent_transform().scale_factors();
        assert_relative_eq!(factors.x, 3.0);
        assert_relative_eq!(factors.y, 3.0);
    }

    #[test]
    fn test_collider_setters_refresh_caches() {
        let mut collider = Collider::from(AabbCollider::new(Vec2::zeros(), 10.0, 4.0));
        collider.set_offset(Vec2::new(3.0, 4.0));
        assert_eq!(collider.center(), Vec2::new(3.0, 4.0));

        collider.set_parent_transform(OwnerFrame::at(Vec2::new(10.0, 10.0)).parent_transform());
        assert_eq!(collider.center(), Vec2::new(13.0, 14.0));

        let bounds = collider.bounding_box();
        assert_relative_eq!(bounds.left(), 8.0);
        assert_relative_eq!(bounds.top(), 12.0);
    }

    #[test]
    fn test_point_has_no_extent() {
        let point = Collider::from(PointCollider::new(Vec2::new(5.0, 5.0)));
        assert_eq!(point.radius_on_axis(&Vec2::new(0.3, 0.7)), 0.0);
        assert_eq!(point.min_radius(), 0.0);
        assert!(point.candidate_axes(&point).is_empty());
        assert_eq!(point.bounding_box().width(), 0.0);
        assert!(point.half_diagonals().is_none());
    }
}
