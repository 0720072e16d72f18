pub mod arc_2d;
pub mod circle_2d;
pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;
pub mod resistance;

use crate::error::{GeometryError, Result};

/// 2D point type, in board length units (meters).
pub type Point = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Inverse sine that rejects arguments outside `[-1, 1]`.
///
/// `what` names the quantity being solved for in the error message.
///
/// # Errors
///
/// Returns `GeometryError::Infeasible` if `value` is not finite or outside `[-1, 1]`.
pub fn checked_asin(value: f64, what: &str) -> Result<f64> {
    check_unit_range(value, what)?;
    Ok(value.asin())
}

/// Inverse cosine that rejects arguments outside `[-1, 1]`.
///
/// # Errors
///
/// Returns `GeometryError::Infeasible` if `value` is not finite or outside `[-1, 1]`.
pub fn checked_acos(value: f64, what: &str) -> Result<f64> {
    check_unit_range(value, what)?;
    Ok(value.acos())
}

fn check_unit_range(value: f64, what: &str) -> Result<()> {
    if !value.is_finite() || value.abs() > 1.0 {
        return Err(GeometryError::Infeasible(format!(
            "{what}: inverse trig argument {value} is outside [-1, 1]"
        ))
        .into());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CoilError;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn asin_in_range() {
        let a = checked_asin(1.0, "test").unwrap();
        assert!((a - FRAC_PI_2).abs() < TOLERANCE);
    }

    #[test]
    fn acos_out_of_range_is_infeasible() {
        let err = checked_acos(1.5, "gap angle").unwrap_err();
        assert!(matches!(
            err,
            CoilError::Geometry(GeometryError::Infeasible(_))
        ));
    }

    #[test]
    fn nan_is_infeasible() {
        assert!(checked_asin(f64::NAN, "nan").is_err());
    }
}
