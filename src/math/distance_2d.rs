use super::arc_2d::{angle_of, angle_in_sweep, polar_point};
use super::Point;

/// Returns the minimum distance from `p` to the line segment from `a` to `b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point, a: &Point, b: &Point) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return (p - a).norm();
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (p - (a + d * t)).norm()
}

/// Returns the distance from `p` to the infinite line through `a` and `b`.
#[must_use]
pub fn point_to_line_dist(p: &Point, a: &Point, b: &Point) -> f64 {
    let d = b - a;
    let len = d.norm();
    if len < 1e-10 {
        return (p - a).norm();
    }
    d.perp(&(p - a)).abs() / len
}

/// Returns the minimum distance from `p` to a circular arc.
///
/// If the point's angle about `center` falls within the arc range, the
/// distance is `||p - center| - radius|`. Otherwise it is the distance to the
/// nearer arc endpoint.
#[must_use]
pub fn point_to_arc_dist(
    p: &Point,
    center: &Point,
    radius: f64,
    start_angle: f64,
    sweep: f64,
) -> f64 {
    let offset = p - center;
    let dist_to_center = offset.norm();

    if angle_in_sweep(angle_of(&offset), start_angle, sweep) {
        return (dist_to_center - radius).abs();
    }

    let ep0 = center + polar_point(radius, start_angle).coords;
    let ep1 = center + polar_point(radius, start_angle + sweep).coords;
    (p - ep0).norm().min((p - ep1).norm())
}
