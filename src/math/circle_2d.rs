use super::{Point, TOLERANCE};
use crate::error::{GeometryError, Result};

/// Finds the center of the circle passing through three points.
///
/// Intersects the perpendicular bisectors of `ab` and `bc` using the
/// determinant `(a.x-b.x)(b.y-c.y) - (b.x-c.x)(a.y-b.y)`. The determinant is
/// compared against the product of the chord lengths, so the colinearity test
/// does not depend on the size of the circle.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` if the points are colinear or any two
/// of them coincide.
pub fn find_center(a: &Point, b: &Point, c: &Point) -> Result<Point> {
    let ab_len = (a - b).norm();
    let bc_len = (b - c).norm();
    let ca_len = (c - a).norm();
    if ab_len < TOLERANCE || bc_len < TOLERANCE || ca_len < TOLERANCE {
        return Err(GeometryError::Degenerate("circle points coincide".into()).into());
    }

    let det = (a.x - b.x) * (b.y - c.y) - (b.x - c.x) * (a.y - b.y);
    if det.abs() < TOLERANCE * ab_len * bc_len {
        return Err(GeometryError::Degenerate("circle points are colinear".into()).into());
    }

    let temp = b.x * b.x + b.y * b.y;
    let ab = (a.x * a.x + a.y * a.y - temp) / 2.0;
    let bc = (temp - c.x * c.x - c.y * c.y) / 2.0;

    let x = (ab * (b.y - c.y) - bc * (a.y - b.y)) / det;
    let y = ((a.x - b.x) * bc - (b.x - c.x) * ab) / det;

    Ok(Point::new(x, y))
}

/// Returns the center and radius of the circle through three points.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` under the same conditions as [`find_center`].
pub fn fit_circle(a: &Point, b: &Point, c: &Point) -> Result<(Point, f64)> {
    let center = find_center(a, b, c)?;
    Ok((center, (a - center).norm()))
}
