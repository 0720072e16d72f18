use std::f64::consts::PI;

use crate::error::{GeometryError, Result};

/// Resistivity of annealed copper at 25 °C, in Ω·m.
pub const COPPER_RESISTIVITY: f64 = 1.68e-8;

/// Permeability of copper (taken as that of free space), in H/m.
pub const COPPER_PERMEABILITY: f64 = 4e-7 * PI;

/// Copper thickness of one ounce per square foot, in meters.
const THICKNESS_PER_OUNCE: f64 = 35e-6;

/// Converts a copper weight in oz to a thickness in meters.
#[must_use]
pub fn weight_to_thickness(weight: f64) -> f64 {
    THICKNESS_PER_OUNCE * weight
}

/// Converts a copper thickness in meters to a weight in oz.
#[must_use]
pub fn thickness_to_weight(thickness: f64) -> f64 {
    thickness / THICKNESS_PER_OUNCE
}

/// Resistance of a rectangular sheet carrying current along `length`.
///
/// # Errors
///
/// Returns `GeometryError::InvalidGeometry` if `thickness` or `width` is not positive.
pub fn dcr_of_sheet(thickness: f64, width: f64, length: f64, rho: f64) -> Result<f64> {
    if thickness <= 0.0 || width <= 0.0 {
        return Err(GeometryError::InvalidGeometry(format!(
            "sheet thickness {thickness} and width {width} must be positive"
        ))
        .into());
    }
    Ok(rho * length / (width * thickness))
}

/// Resistance of one annular turn, modeled as a flat sheet.
///
/// The current path is the mean circumference `π (ri + ro)` and the cross
/// section is `thickness × (ro - ri)`. Only the trace is modeled; via and
/// termination resistance belong to no estimate in this crate.
///
/// # Errors
///
/// Returns `GeometryError::InvalidGeometry` if `outer_radius <= inner_radius`
/// or `thickness` is not positive.
pub fn dcr_of_annulus(
    thickness: f64,
    inner_radius: f64,
    outer_radius: f64,
    rho: f64,
) -> Result<f64> {
    if outer_radius <= inner_radius {
        return Err(GeometryError::InvalidGeometry(format!(
            "outer radius {outer_radius} must be greater than inner radius {inner_radius}"
        ))
        .into());
    }
    let mean_circumference = PI * (inner_radius + outer_radius);
    dcr_of_sheet(thickness, outer_radius - inner_radius, mean_circumference, rho)
}

/// Skin depth in meters at `frequency` for a conductor with resistivity
/// `rho` and permeability `mu`.
#[must_use]
pub fn frequency_to_skin_depth(frequency: f64, rho: f64, mu: f64) -> f64 {
    (2.0 * rho / (2.0 * PI * frequency * mu)).sqrt()
}

/// Frequency at which the skin depth equals `skin_depth`.
#[must_use]
pub fn skin_depth_to_frequency(skin_depth: f64, rho: f64, mu: f64) -> f64 {
    2.0 * rho / (2.0 * PI * skin_depth * skin_depth * mu)
}
