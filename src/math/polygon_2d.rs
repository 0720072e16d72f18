use super::{Point, TOLERANCE};

/// Computes the signed area of a closed point ring (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Bounded segment-segment intersection.
///
/// Returns `(t, u)` parameters of the crossing on `a0→a1` and `b0→b1`, both
/// in `[0, 1]`. Parallel segments report no intersection.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point,
    a1: &Point,
    b0: &Point,
    b1: &Point,
) -> Option<(f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;

    let cross = da.perp(&db);
    if cross.abs() < TOLERANCE * da.norm() * db.norm() {
        return None;
    }

    let d = b0 - a0;
    let t = d.perp(&db) / cross;
    let u = d.perp(&da) / cross;

    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        Some((t.clamp(0.0, 1.0), u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Checks whether any two non-adjacent edges of a closed ring cross.
///
/// Touching at shared vertices of adjacent edges is not a crossing.
#[must_use]
pub fn has_self_intersections(points: &[Point]) -> bool {
    let n = points.len();
    if n < 4 {
        return false;
    }
    for i in 0..n {
        let a0 = &points[i];
        let a1 = &points[(i + 1) % n];
        // Skip the adjacent edge, and the wrap-around neighbour of edge 0.
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let b0 = &points[j];
            let b1 = &points[(j + 1) % n];
            if segment_segment_intersect_2d(a0, a1, b0, b1).is_some() {
                return true;
            }
        }
    }
    false
}
