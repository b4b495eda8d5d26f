//! 2D affine transform
//!
//! A 2x3 matrix `[a b tx; c d ty]` whose implicit last row is `[0 0 1]`.
//! Only the six meaningful scalars are stored, which keeps composition cheap
//! and lets shapes rebuild their world-space caches on every update.
//!
//! The builder operations (`translate`, `scale`, `rotate`) pre-multiply, so
//! `clear().scale(..).rotate(..).translate(..)` produces `T * R * S`: a point
//! is scaled first, then rotated, then moved. `multiply` right-composes.

use serde::{Deserialize, Serialize};

use super::math::{utils::sign, Real, Vec2};
use crate::error::{CollisionError, Result};

/// Affine 2D transform with an implicit `[0 0 1]` last row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    m: [Real; 6],
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    /// Identity transform
    pub const fn identity() -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        }
    }

    /// Build from the six row-major scalars `[a, b, tx, c, d, ty]`
    pub const fn from_array(m: [Real; 6]) -> Self {
        Self { m }
    }

    /// Build from an arbitrary slice, which must hold exactly six scalars
    pub fn from_slice(source: &[Real]) -> Result<Self> {
        let m: [Real; 6] = source.try_into().map_err(|_| {
            CollisionError::InvalidArgument(format!(
                "Transform2D needs 6 components, got {}",
                source.len()
            ))
        })?;
        Ok(Self { m })
    }

    /// The six row-major scalars
    pub const fn as_array(&self) -> [Real; 6] {
        self.m
    }

    /// Reset to identity
    pub fn clear(&mut self) -> &mut Self {
        *self = Self::identity();
        self
    }

    /// `a * b`, computed from copies so either operand may be the destination
    pub fn product(a: &Self, b: &Self) -> Self {
        let [a0, a1, a2, a3, a4, a5] = a.m;
        let [b0, b1, b2, b3, b4, b5] = b.m;
        Self {
            m: [
                a0 * b0 + a1 * b3,
                a0 * b1 + a1 * b4,
                a0 * b2 + a1 * b5 + a2,
                a3 * b0 + a4 * b3,
                a3 * b1 + a4 * b4,
                a3 * b2 + a4 * b5 + a5,
            ],
        }
    }

    /// Right-compose: `self = self * other`
    pub fn multiply(&mut self, other: &Self) -> &mut Self {
        *self = Self::product(self, other);
        self
    }

    fn premultiply(&mut self, op: &Self) -> &mut Self {
        *self = Self::product(op, self);
        self
    }

    /// Apply a translation after the current transform
    pub fn translate(&mut self, x: Real, y: Real) -> &mut Self {
        self.premultiply(&Self::from_array([1.0, 0.0, x, 0.0, 1.0, y]))
    }

    /// [`translate`](Self::translate) by a vector
    pub fn translate_by(&mut self, offset: Vec2) -> &mut Self {
        self.translate(offset.x, offset.y)
    }

    /// Apply a non-uniform scale after the current transform
    pub fn scale(&mut self, sx: Real, sy: Real) -> &mut Self {
        self.premultiply(&Self::from_array([sx, 0.0, 0.0, 0.0, sy, 0.0]))
    }

    /// [`scale`](Self::scale) by a vector
    pub fn scale_by(&mut self, factors: Vec2) -> &mut Self {
        self.scale(factors.x, factors.y)
    }

    /// Apply a uniform scale after the current transform
    pub fn scale_uniform(&mut self, s: Real) -> &mut Self {
        self.scale(s, s)
    }

    /// Apply a rotation after the current transform.
    ///
    /// Positive angles turn clockwise on a y-down screen.
    pub fn rotate(&mut self, radians: Real) -> &mut Self {
        let (sin_r, cos_r) = radians.sin_cos();
        self.premultiply(&Self::from_array([cos_r, -sin_r, 0.0, sin_r, cos_r, 0.0]))
    }

    /// Translation component
    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.m[2], self.m[5])
    }

    /// Scale component. Assumes the transform carries no shear.
    pub fn scale_factors(&self) -> Vec2 {
        let [a, b, _, c, d, _] = self.m;
        Vec2::new(sign(a) * a.hypot(b), sign(d) * c.hypot(d))
    }

    /// Rotation component in radians
    pub fn rotation(&self) -> Real {
        (-self.m[1]).atan2(self.m[0])
    }

    /// Map a point through this transform
    pub fn transform_point(&self, p: &Vec2) -> Vec2 {
        let [a, b, tx, c, d, ty] = self.m;
        Vec2::new(a * p.x + b * p.y + tx, c * p.x + d * p.y + ty)
    }

    /// Map a direction through this transform (translation ignored)
    pub fn transform_vector(&self, v: &Vec2) -> Vec2 {
        let [a, b, _, c, d, _] = self.m;
        Vec2::new(a * v.x + b * v.y, c * v.x + d * v.y)
    }

    /// Build a transform that decomposes exactly into the given parts.
    ///
    /// The rotation is applied before the scale (`T * S * R`), which is the
    /// only order the shear-free decomposition formulas recover for
    /// non-uniform scales.
    pub fn from_components(translation: Vec2, rotation: Real, scale: Vec2) -> Self {
        let mut t = Self::identity();
        t.rotate(rotation).scale_by(scale).translate_by(translation);
        t
    }
}

impl std::ops::Mul for Transform2D {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::product(&self, &rhs)
    }
}

impl TryFrom<&[Real]> for Transform2D {
    type Error = CollisionError;

    fn try_from(source: &[Real]) -> Result<Self> {
        Self::from_slice(source)
    }
}
