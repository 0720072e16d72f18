use super::{Point, Vector, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point,
    d1: &Vector,
    p2: &Point,
    d2: &Vector,
) -> Option<(f64, f64)> {
    let cross = d1.perp(d2);
    if cross.abs() < TOLERANCE * d1.norm() * d2.norm() {
        return None;
    }
    let d = p2 - p1;
    Some((d.perp(d2) / cross, d.perp(d1) / cross))
}

/// Intersections of the line `origin + t * dir` with a full circle.
///
/// Returns zero, one (tangent) or two points.
#[must_use]
pub fn line_circle_intersect_2d(
    origin: &Point,
    dir: &Vector,
    center: &Point,
    radius: f64,
) -> Vec<Point> {
    let a = dir.norm_squared();
    if a < TOLERANCE * TOLERANCE || radius < TOLERANCE {
        return Vec::new();
    }

    // Substitute the parametric line into |p - c|² = r².
    let f = origin - center;
    let b = 2.0 * f.dot(dir);
    let c = f.norm_squared() - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < -TOLERANCE * radius * radius {
        return Vec::new();
    }

    let root = discriminant.max(0.0).sqrt();
    if root < TOLERANCE * radius {
        return vec![origin + dir * (-b / (2.0 * a))];
    }
    vec![
        origin + dir * ((-b - root) / (2.0 * a)),
        origin + dir * ((-b + root) / (2.0 * a)),
    ]
}

/// Intersections of two full circles.
///
/// Concentric circles yield no points.
#[must_use]
pub fn circle_circle_intersect_2d(c1: &Point, r1: f64, c2: &Point, r2: f64) -> Vec<Point> {
    let d = c2 - c1;
    let dist_sq = d.norm_squared();
    let dist = dist_sq.sqrt();
    if dist < TOLERANCE || r1 < TOLERANCE || r2 < TOLERANCE {
        return Vec::new();
    }
    let scale = r1.max(r2);
    if dist > r1 + r2 + TOLERANCE * scale || dist < (r1 - r2).abs() - TOLERANCE * scale {
        return Vec::new();
    }

    // Distance from c1 along c1 -> c2 to the radical line.
    let a = (r1 * r1 - r2 * r2 + dist_sq) / (2.0 * dist);
    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let mid = c1 + d * (a / dist);
    if h < TOLERANCE * scale {
        return vec![mid];
    }
    let normal = Vector::new(-d.y, d.x) / dist;
    vec![mid + normal * h, mid - normal * h]
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn crossing_lines() {
        let (t, u) = line_line_intersect_2d(
            &Point::new(0.0, 0.0),
            &Vector::new(1.0, 0.0),
            &Point::new(2.0, -1.0),
            &Vector::new(0.0, 2.0),
        )
        .unwrap();
        assert!((t - 2.0).abs() < TOL, "t={t}");
        assert!((u - 0.5).abs() < TOL, "u={u}");
    }

    #[test]
    fn parallel_lines_do_not_meet() {
        let hit = line_line_intersect_2d(
            &Point::new(0.0, 0.0),
            &Vector::new(1.0, 1.0),
            &Point::new(0.0, 1.0),
            &Vector::new(2.0, 2.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn line_through_circle_has_two_points() {
        let hits = line_circle_intersect_2d(
            &Point::new(-5.0, 0.0),
            &Vector::new(1.0, 0.0),
            &Point::origin(),
            2.0,
        );
        assert_eq!(hits.len(), 2);
        assert!((hits[0].x + 2.0).abs() < TOL);
        assert!((hits[1].x - 2.0).abs() < TOL);
    }

    #[test]
    fn line_missing_circle_has_no_points() {
        let hits = line_circle_intersect_2d(
            &Point::new(-5.0, 3.0),
            &Vector::new(1.0, 0.0),
            &Point::origin(),
            2.0,
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn overlapping_circles_meet_twice() {
        let hits = circle_circle_intersect_2d(&Point::origin(), 2.0, &Point::new(2.0, 0.0), 2.0);
        assert_eq!(hits.len(), 2);
        for p in &hits {
            assert!((p.x - 1.0).abs() < TOL);
            assert!((p.coords.norm() - 2.0).abs() < TOL);
        }
    }

    #[test]
    fn nested_circles_do_not_meet() {
        let hits = circle_circle_intersect_2d(&Point::origin(), 5.0, &Point::new(1.0, 0.0), 1.0);
        assert!(hits.is_empty());
        let same = circle_circle_intersect_2d(&Point::origin(), 1.0, &Point::origin(), 1.0);
        assert!(same.is_empty());
    }
}
