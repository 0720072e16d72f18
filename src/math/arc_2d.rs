use std::f64::consts::{PI, TAU};

use super::{Point, Vector};

/// Returns the point at `radius` and `angle` about the origin.
#[must_use]
pub fn polar_point(radius: f64, angle: f64) -> Point {
    Point::new(radius * angle.cos(), radius * angle.sin())
}

/// Returns the polar angle of a vector in `(-π, π]`.
#[must_use]
pub fn angle_of(v: &Vector) -> f64 {
    v.y.atan2(v.x)
}

/// Checks if an angle falls within the angular range swept from `start_angle`.
///
/// `sweep` is signed: positive runs counter-clockwise, negative clockwise.
#[must_use]
pub fn angle_in_sweep(angle: f64, start_angle: f64, sweep: f64) -> bool {
    let eps = 1e-10;
    let delta = angle - start_angle;

    if sweep > 0.0 {
        let delta = delta.rem_euclid(TAU);
        delta <= sweep + eps || delta >= TAU - eps
    } else {
        let delta = (-delta).rem_euclid(TAU);
        delta <= -sweep + eps || delta >= TAU - eps
    }
}

/// Computes the number of line segments needed to approximate an arc
/// within the given tolerance.
#[must_use]
pub fn arc_subdivision_count(radius: f64, abs_sweep: f64, tolerance: f64) -> u32 {
    if radius < 1e-12 || abs_sweep < 1e-12 || tolerance <= 0.0 {
        return 1;
    }
    // sagitta = r * (1 - cos(θ/2))
    let max_angle = if tolerance >= radius {
        PI
    } else {
        2.0 * (1.0 - tolerance / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_sweep / max_angle).ceil() as u32;
    n.max(1)
}
