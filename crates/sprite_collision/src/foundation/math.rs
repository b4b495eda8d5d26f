//! Math utilities and types
//!
//! Provides the fundamental 2D math types used by the collision core.
//! Everything is double precision: axis de-duplication compares components
//! at a `1e-14` tolerance, which single precision cannot resolve.

pub use nalgebra::Vector2;

/// Scalar type used throughout the collision core
pub type Real = f64;

/// 2D vector type
pub type Vec2 = Vector2<Real>;

/// World X axis
pub fn x_axis() -> Vec2 {
    Vec2::new(1.0, 0.0)
}

/// World Y axis
pub fn y_axis() -> Vec2 {
    Vec2::new(0.0, 1.0)
}

/// Default tolerance for treating two axes as parallel
pub const PARALLEL_TOLERANCE: Real = 1e-14;

/// Math constants
pub mod constants {
    use super::Real;

    /// Pi constant
    pub const PI: Real = std::f64::consts::PI;

    /// Pi / 2
    pub const HALF_PI: Real = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: Real = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Real, Vec2};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: Real) -> Real {
        degrees * constants::DEG_TO_RAD
    }

    /// Sign of `x`: -1, 0 or 1. Zero and NaN are returned unchanged.
    pub fn sign(x: Real) -> Real {
        if x == 0.0 || x.is_nan() {
            x
        } else if x > 0.0 {
            1.0
        } else {
            -1.0
        }
    }

    /// Projection of `v` onto the line through `onto`.
    ///
    /// Returns the zero vector when `onto` has zero length.
    pub fn project(v: &Vec2, onto: &Vec2) -> Vec2 {
        let denom = onto.dot(onto);
        if denom == 0.0 {
            return Vec2::zeros();
        }
        onto * (v.dot(onto) / denom)
    }

    /// Perpendicular of `v` (rotated a quarter turn)
    pub fn perpendicular(v: &Vec2) -> Vec2 {
        Vec2::new(v.y, -v.x)
    }

    /// Heading of `v` in radians, measured from the +X axis
    pub fn heading(v: &Vec2) -> Real {
        v.y.atan2(v.x)
    }

    /// Whether two vectors lie on the same line.
    ///
    /// Vectors with a shared (near) zero component are parallel; otherwise the
    /// component ratios are compared. The ratio test uses the cross-multiplied
    /// form scaled by the operands' magnitudes so it never divides by zero.
    pub fn is_parallel(a: &Vec2, b: &Vec2, tolerance: Real) -> bool {
        if a.x.abs() < tolerance && b.x.abs() < tolerance {
            return true;
        }
        if a.y.abs() < tolerance && b.y.abs() < tolerance {
            return true;
        }
        let scale = a.norm() * b.norm();
        if scale == 0.0 {
            return false;
        }
        (a.x * b.y - a.y * b.x).abs() < tolerance * scale
    }

    /// Whether a vector is exactly zero
    pub fn is_zero(v: &Vec2) -> bool {
        v.x == 0.0 && v.y == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::utils::*;
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sign_keeps_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-3.5), -1.0);
        assert_eq!(sign(2.0), 1.0);
    }

    #[test]
    fn test_project_onto_axis() {
        let v = Vec2::new(3.0, 4.0);
        assert_relative_eq!(project(&v, &Vec2::new(2.0, 0.0)), Vec2::new(3.0, 0.0));
        assert_eq!(project(&v, &Vec2::zeros()), Vec2::zeros());
    }

    #[test]
    fn test_parallel_detection() {
        assert!(is_parallel(&Vec2::new(1.0, 0.0), &Vec2::new(-5.0, 0.0), PARALLEL_TOLERANCE));
        assert!(is_parallel(&Vec2::new(0.0, 2.0), &Vec2::new(0.0, -1.0), PARALLEL_TOLERANCE));
        assert!(is_parallel(&Vec2::new(1.0, 2.0), &Vec2::new(-2.0, -4.0), PARALLEL_TOLERANCE));
        assert!(!is_parallel(&Vec2::new(1.0, 0.0), &Vec2::new(0.0, 1.0), PARALLEL_TOLERANCE));
        assert!(!is_parallel(&Vec2::new(1.0, 1.0), &Vec2::new(1.0, 1.0001), PARALLEL_TOLERANCE));
    }

    #[test]
    fn test_rotated_axes_stay_parallel() {
        let angle: Real = 0.3;
        let axis = Vec2::new(angle.cos(), angle.sin());
        let scaled = axis * 7.5;
        assert!(is_parallel(&axis, &scaled, 1e-12));
    }

    #[test]
    fn test_degree_conversion() {
        assert_relative_eq!(deg_to_rad(90.0), constants::HALF_PI);
        assert_relative_eq!(deg_to_rad(180.0), constants::PI);
    }
}
