//! Collider requests
//!
//! A [`ColliderSpec`] is the fully-specified description of the collider a
//! body wants. Everything is validated here, before any shape exists.
//! Omitted sizes mean "track the owner's size".

use serde::{Deserialize, Serialize};

use crate::error::{CollisionError, Result};
use crate::foundation::math::{utils, Real, Vec2};

use super::primitives::{AabbCollider, CircleCollider, ObbCollider, PointCollider};
use super::shape::{Collider, CollisionShape, OwnerFrame};

/// Description of a collider to attach to a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColliderSpec {
    /// A point at `offset` from the body's position
    Point {
        /// Offset from the owner's origin
        #[serde(default = "Vec2::zeros")]
        offset: Vec2,
    },

    /// A circle; `radius: None` uses half the owner's larger side
    Circle {
        /// Offset from the owner's origin
        #[serde(default = "Vec2::zeros")]
        offset: Vec2,
        /// Fixed radius
        #[serde(default)]
        radius: Option<Real>,
    },

    /// A world-aligned box; `size: None` tracks the owner's size
    Aabb {
        /// Offset from the owner's origin
        #[serde(default = "Vec2::zeros")]
        offset: Vec2,
        /// Fixed width and height
        #[serde(default)]
        size: Option<Vec2>,
    },

    /// An oriented box; `size: None` tracks the owner's size
    Obb {
        /// Offset from the owner's origin
        #[serde(default = "Vec2::zeros")]
        offset: Vec2,
        /// Fixed width and height
        #[serde(default)]
        size: Option<Vec2>,
        /// Rotation relative to the owner, radians
        #[serde(default)]
        rotation: Real,
    },
}

impl Default for ColliderSpec {
    /// Oriented box matching the owner's size
    fn default() -> Self {
        ColliderSpec::Obb {
            offset: Vec2::zeros(),
            size: None,
            rotation: 0.0,
        }
    }
}

fn finite(v: &Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

impl ColliderSpec {
    /// Build a request from a kind name and positional arguments.
    ///
    /// Accepted forms (rotation in degrees):
    /// `point [x y]`, `circle [x y [r]]`, `aabb [x y [w h]]`,
    /// `obb [x y [w h [deg]]]`. `rectangle` is an alias for `obb`.
    pub fn from_args(kind: &str, args: &[Real]) -> Result<Self> {
        let kind = kind.to_lowercase();
        let offset = match args {
            [x, y, ..] => Vec2::new(*x, *y),
            _ => Vec2::zeros(),
        };

        let spec = match (kind.as_str(), args.len()) {
            ("point", 0 | 2) => ColliderSpec::Point { offset },
            ("circle", 0 | 2 | 3) => ColliderSpec::Circle {
                offset,
                radius: args.get(2).copied(),
            },
            ("aabb", 0 | 2 | 4) => ColliderSpec::Aabb {
                offset,
                size: (args.len() == 4).then(|| Vec2::new(args[2], args[3])),
            },
            ("obb" | "rectangle", 0 | 2 | 4 | 5) => ColliderSpec::Obb {
                offset,
                size: (args.len() >= 4).then(|| Vec2::new(args[2], args[3])),
                rotation: args.get(4).map_or(0.0, |deg| utils::deg_to_rad(*deg)),
            },
            ("point", _) => return Err(CollisionError::invalid("usage: point [offset_x, offset_y]")),
            ("circle", _) => {
                return Err(CollisionError::invalid("usage: circle [offset_x, offset_y [, radius]]"))
            }
            ("aabb", _) => {
                return Err(CollisionError::invalid("usage: aabb [offset_x, offset_y [, width, height]]"))
            }
            ("obb" | "rectangle", _) => {
                return Err(CollisionError::invalid(format!(
                    "usage: {kind} [offset_x, offset_y [, width, height [, rotation]]]"
                )))
            }
            _ => {
                return Err(CollisionError::invalid(format!(
                    "collider kind must be one of point, circle, rectangle, aabb or obb, got {kind:?}"
                )))
            }
        };

        spec.validate()?;
        Ok(spec)
    }

    /// Offset from the owner's origin
    pub fn offset(&self) -> Vec2 {
        match self {
            ColliderSpec::Point { offset }
            | ColliderSpec::Circle { offset, .. }
            | ColliderSpec::Aabb { offset, .. }
            | ColliderSpec::Obb { offset, .. } => *offset,
        }
    }

    /// Reject non-finite values and non-positive dimensions
    pub fn validate(&self) -> Result<()> {
        if !finite(&self.offset()) {
            return Err(CollisionError::invalid("collider offset must be finite"));
        }

        match self {
            ColliderSpec::Point { .. } => Ok(()),
            ColliderSpec::Circle { radius, .. } => match radius {
                Some(r) if !(r.is_finite() && *r > 0.0) => {
                    Err(CollisionError::invalid(format!("circle radius must be positive, got {r}")))
                }
                _ => Ok(()),
            },
            ColliderSpec::Aabb { size, .. } => validate_size(size.as_ref()),
            ColliderSpec::Obb { size, rotation, .. } => {
                if !rotation.is_finite() {
                    return Err(CollisionError::invalid("collider rotation must be finite"));
                }
                validate_size(size.as_ref())
            }
        }
    }

    /// Construct the collider and place it on `owner`
    pub fn build(&self, owner: &OwnerFrame) -> Result<Collider> {
        self.validate()?;

        let mut collider: Collider = match *self {
            ColliderSpec::Point { offset } => PointCollider::new(offset).into(),
            ColliderSpec::Circle { offset, radius } => {
                let mut circle = CircleCollider::new(offset, radius.unwrap_or(1.0));
                circle.gets_dimensions_from_owner = radius.is_none();
                circle.into()
            }
            ColliderSpec::Aabb { offset, size } => {
                let fixed = size.unwrap_or_else(|| Vec2::new(1.0, 1.0));
                let mut aabb = AabbCollider::new(offset, fixed.x, fixed.y);
                aabb.gets_dimensions_from_owner = size.is_none();
                aabb.into()
            }
            ColliderSpec::Obb {
                offset,
                size,
                rotation,
            } => {
                let fixed = size.unwrap_or_else(|| Vec2::new(1.0, 1.0));
                let mut obb = ObbCollider::new(offset, fixed.x, fixed.y, rotation);
                obb.gets_dimensions_from_owner = size.is_none();
                obb.into()
            }
        };

        collider.update_from_owner(owner);
        Ok(collider)
    }
}

fn validate_size(size: Option<&Vec2>) -> Result<()> {
    match size {
        Some(s) if !(finite(s) && s.x > 0.0 && s.y > 0.0) => Err(CollisionError::invalid(format!(
            "collider size must be positive, got {}x{}",
            s.x, s.y
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_positional_forms() {
        assert_eq!(
            ColliderSpec::from_args("point", &[]).unwrap(),
            ColliderSpec::Point { offset: Vec2::zeros() }
        );
        assert_eq!(
            ColliderSpec::from_args("Circle", &[1.0, 2.0, 3.0]).unwrap(),
            ColliderSpec::Circle {
                offset: Vec2::new(1.0, 2.0),
                radius: Some(3.0)
            }
        );
        assert_eq!(
            ColliderSpec::from_args("aabb", &[0.0, 0.0, 4.0, 5.0]).unwrap(),
            ColliderSpec::Aabb {
                offset: Vec2::zeros(),
                size: Some(Vec2::new(4.0, 5.0))
            }
        );

        match ColliderSpec::from_args("rectangle", &[0.0, 0.0, 4.0, 5.0, 90.0]).unwrap() {
            ColliderSpec::Obb { rotation, size, .. } => {
                assert_relative_eq!(rotation, std::f64::consts::FRAC_PI_2);
                assert_eq!(size, Some(Vec2::new(4.0, 5.0)));
            }
            other => panic!("expected obb, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_arity_is_rejected() {
        for (kind, args) in [
            ("point", vec![1.0]),
            ("point", vec![1.0, 2.0, 3.0]),
            ("circle", vec![1.0]),
            ("circle", vec![1.0, 2.0, 3.0, 4.0]),
            ("aabb", vec![1.0, 2.0, 3.0]),
            ("obb", vec![1.0, 2.0, 3.0]),
            ("obb", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
        ] {
            let result = ColliderSpec::from_args(kind, &args);
            assert!(
                matches!(result, Err(CollisionError::InvalidArgument(_))),
                "{kind} with {} args",
                args.len()
            );
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(matches!(
            ColliderSpec::from_args("triangle", &[]),
            Err(CollisionError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_bad_dimensions_are_rejected() {
        assert!(ColliderSpec::from_args("circle", &[0.0, 0.0, -1.0]).is_err());
        assert!(ColliderSpec::from_args("aabb", &[0.0, 0.0, 0.0, 3.0]).is_err());
        assert!(ColliderSpec::from_args("obb", &[f64::NAN, 0.0]).is_err());
        assert!(ColliderSpec::Obb {
            offset: Vec2::zeros(),
            size: Some(Vec2::new(1.0, 1.0)),
            rotation: f64::INFINITY
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_build_tracks_owner_size_when_unsized() {
        let owner = OwnerFrame {
            size: Some(Vec2::new(30.0, 10.0)),
            ..OwnerFrame::at(Vec2::new(100.0, 100.0))
        };
        let collider = ColliderSpec::default().build(&owner).unwrap();
        let bounds = collider.bounding_box();
        assert_relative_eq!(bounds.width(), 30.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.height(), 10.0, epsilon = 1e-9);
        assert_eq!(collider.center(), Vec2::new(100.0, 100.0));

        let circle = ColliderSpec::Circle {
            offset: Vec2::new(5.0, 0.0),
            radius: None,
        }
        .build(&owner)
        .unwrap();
        assert_relative_eq!(circle.min_radius(), 15.0, epsilon = 1e-9);
        assert_eq!(circle.center(), Vec2::new(105.0, 100.0));
    }

    #[test]
    fn test_spec_deserializes_from_toml() {
        let spec: ColliderSpec = toml::from_str("kind = \"circle\"\nradius = 4.0\n").unwrap();
        assert_eq!(
            spec,
            ColliderSpec::Circle {
                offset: Vec2::zeros(),
                radius: Some(4.0)
            }
        );
    }
}
