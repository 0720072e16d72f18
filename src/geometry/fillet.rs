use std::f64::consts::{PI, TAU};

use super::{Arc, ArcGeometry, Polygon, PolygonBuilder, Segment};
use crate::error::{GeometryError, Result};
use crate::math::arc_2d::{angle_of, polar_point};
use crate::math::intersect_2d::{
    circle_circle_intersect_2d, line_circle_intersect_2d, line_line_intersect_2d,
};
use crate::math::{Point, Vector, TOLERANCE};

/// Cross product of two unit directions below which they count as tangent.
const TANGENT_TOLERANCE: f64 = 1e-9;

/// A boundary piece a fillet can touch, with its direction of travel.
#[derive(Debug, Clone, Copy)]
enum Path {
    /// Straight line through `through` running along the unit vector `dir`.
    Line { through: Point, dir: Vector },
    Circle {
        center: Point,
        radius: f64,
        ccw: bool,
    },
}

impl Path {
    fn circle_of(g: &ArcGeometry) -> Self {
        Self::Circle {
            center: g.center,
            radius: g.radius,
            ccw: g.is_ccw(),
        }
    }

    fn edge(from: &Point, to: &Point) -> Result<Self> {
        let delta = to - from;
        let len = delta.norm();
        if len < TOLERANCE {
            return Err(
                GeometryError::Degenerate("smoothing edge has zero length".into()).into(),
            );
        }
        Ok(Self::Line {
            through: *from,
            dir: delta / len,
        })
    }

    /// Unit direction of travel at `p`.
    fn tangent_at(&self, p: &Point) -> Vector {
        match *self {
            Self::Line { dir, .. } => dir,
            Self::Circle { center, ccw, .. } => {
                let r = (p - center).normalize();
                let left = Vector::new(-r.y, r.x);
                if ccw {
                    left
                } else {
                    -left
                }
            }
        }
    }

    /// The locus of points `distance` away on one side: left of travel for
    /// `side > 0`, right for `side < 0`.
    fn offset(&self, side: f64, distance: f64) -> Result<Self> {
        match *self {
            Self::Line { through, dir } => Ok(Self::Line {
                through: through + Vector::new(-dir.y, dir.x) * (side * distance),
                dir,
            }),
            Self::Circle {
                center,
                radius,
                ccw,
            } => {
                // A counter-clockwise circle has its center on the left.
                let toward_center = if ccw { side } else { -side };
                let offset_radius = radius - toward_center * distance;
                if offset_radius < TOLERANCE {
                    return Err(GeometryError::InvalidRadius {
                        radius: distance,
                        limit: radius,
                    }
                    .into());
                }
                Ok(Self::Circle {
                    center,
                    radius: offset_radius,
                    ccw,
                })
            }
        }
    }

    /// Closest point of the path to `p`.
    fn foot(&self, p: &Point) -> Point {
        match *self {
            Self::Line { through, dir } => through + dir * (p - through).dot(&dir),
            Self::Circle { center, radius, .. } => {
                center + (p - center) * (radius / (p - center).norm())
            }
        }
    }

    fn intersect(&self, other: &Self) -> Vec<Point> {
        match (*self, *other) {
            (
                Self::Line {
                    through: p1,
                    dir: d1,
                },
                Self::Line {
                    through: p2,
                    dir: d2,
                },
            ) => line_line_intersect_2d(&p1, &d1, &p2, &d2)
                .map(|(t, _)| p1 + d1 * t)
                .into_iter()
                .collect(),
            (Self::Line { through, dir }, Self::Circle { center, radius, .. })
            | (Self::Circle { center, radius, .. }, Self::Line { through, dir }) => {
                line_circle_intersect_2d(&through, &dir, &center, radius)
            }
            (
                Self::Circle {
                    center: c1,
                    radius: r1,
                    ..
                },
                Self::Circle {
                    center: c2,
                    radius: r2,
                    ..
                },
            ) => circle_circle_intersect_2d(&c1, r1, &c2, r2),
        }
    }
}

fn check_radius(radius: f64, limit: f64) -> Result<()> {
    if !radius.is_finite() || radius < TOLERANCE {
        return Err(GeometryError::InvalidRadius { radius, limit }.into());
    }
    Ok(())
}

/// Fillet of `radius` at `vertex`, where `incoming` hands over to `outgoing`.
///
/// The fillet starts tangent to `incoming` and ends tangent to `outgoing`.
/// Returns `None` if the two already meet tangentially.
fn corner_fillet(
    incoming: &Path,
    outgoing: &Path,
    vertex: &Point,
    radius: f64,
) -> Result<Option<Arc>> {
    let t_in = incoming.tangent_at(vertex);
    let t_out = outgoing.tangent_at(vertex);
    let turn = t_in.perp(&t_out);
    if turn.abs() < TANGENT_TOLERANCE {
        if t_in.dot(&t_out) > 0.0 {
            return Ok(None);
        }
        return Err(GeometryError::Infeasible(format!(
            "outline turns back on itself at ({}, {})",
            vertex.x, vertex.y
        ))
        .into());
    }

    // The fillet bends the same way as the corner, so its center lies on
    // that side of both paths.
    let side = turn.signum();
    let center = incoming
        .offset(side, radius)?
        .intersect(&outgoing.offset(side, radius)?)
        .into_iter()
        .min_by(|a, b| (a - vertex).norm().total_cmp(&(b - vertex).norm()))
        .ok_or_else(|| {
            GeometryError::Infeasible(format!(
                "no fillet of radius {radius} fits the corner at ({}, {})",
                vertex.x, vertex.y
            ))
        })?;

    let start = incoming.foot(&center);
    let end = outgoing.foot(&center);
    let start_angle = angle_of(&(start - center));
    let sweep = side * (side * (angle_of(&(end - center)) - start_angle)).rem_euclid(TAU);
    if sweep.abs() < TOLERANCE {
        return Ok(None);
    }
    if sweep.abs() > PI {
        return Err(GeometryError::Infeasible(format!(
            "fillet of radius {radius} at ({}, {}) would turn {sweep} rad",
            vertex.x, vertex.y
        ))
        .into());
    }
    let mid = center + polar_point(radius, start_angle + 0.5 * sweep).coords;
    Ok(Some(Arc::new(start, mid, end)?))
}

/// Position of `p` along `g` as a fraction of its sweep. `p` must lie on the
/// arc's circle; points just before the start come out slightly negative.
fn fraction_along(g: &ArcGeometry, p: &Point) -> f64 {
    let delta = angle_of(&(p - g.center)) - g.start_angle;
    let along = if g.is_ccw() {
        delta.rem_euclid(TAU)
    } else {
        (-delta).rem_euclid(TAU)
    };
    let along = if along > TAU - TANGENT_TOLERANCE {
        along - TAU
    } else {
        along
    };
    along / g.sweep.abs()
}

fn overrun(radius: f64, p: &Point) -> GeometryError {
    GeometryError::Infeasible(format!(
        "fillet of radius {radius} touches ({}, {}) outside the arc it rounds",
        p.x, p.y
    ))
}

/// `arc` cut short to end at `p`.
fn trim_end(arc: &Arc, p: &Point, radius: f64) -> Result<Arc> {
    let t = fraction_along(&arc.geometry()?, p);
    if t <= TOLERANCE || t > 1.0 + TOLERANCE {
        return Err(overrun(radius, p).into());
    }
    Ok(arc.reversed().with_start(p)?.reversed())
}

/// `arc` cut short to start at `p`.
fn trim_start(arc: &Arc, p: &Point, radius: f64) -> Result<Arc> {
    let t = fraction_along(&arc.geometry()?, p);
    if t < -TOLERANCE || t >= 1.0 - TOLERANCE {
        return Err(overrun(radius, p).into());
    }
    arc.with_start(p)
}

/// Finds the fillet arc between a straight edge and an arc.
///
/// The straight edge runs from `point` to the start of `arc`. The returned arc
/// has the given `radius`, starts on that edge where it is tangent to it, and
/// ends where it is tangent to the circle of `arc`. When the edge turns toward
/// the center of `arc` the fillet sits inside that circle, at a center distance
/// of `r - radius`; otherwise it sits outside at `r + radius`. Either sweep
/// direction of `arc` is accepted.
///
/// # Errors
///
/// Returns `GeometryError::InvalidRadius` if `radius` is not positive or an
/// inside fillet does not fit in the reference circle,
/// `GeometryError::Degenerate` if `arc` has no unique circle, `point`
/// coincides with its start, or the edge is already tangent to `arc`, and
/// `GeometryError::Infeasible` if no center satisfies both tangencies.
pub fn find_smoothing_arc(point: &Point, arc: &Arc, radius: f64) -> Result<Arc> {
    let g = arc.geometry()?;
    check_radius(radius, g.radius)?;
    let circle = Path::circle_of(&g);
    let edge = Path::edge(point, arc.start())?;
    corner_fillet(&edge, &circle, arc.start(), radius)?.ok_or_else(|| {
        GeometryError::Degenerate("edge is already tangent to the arc".into()).into()
    })
}

/// Rounds the corners of the straight edge that joins `arc1`'s end to
/// `arc2`'s start, or of the direct joint if the two arcs touch.
///
/// Returns the leading arcs (`arc1`, trimmed if its end was rounded, then
/// the fillets) apart from the continuation of `arc2`.
fn round_corner_split(arc1: &Arc, arc2: &Arc, radius: f64) -> Result<(Vec<Arc>, Arc)> {
    check_radius(radius, f64::INFINITY)?;
    let incoming = Path::circle_of(&arc1.geometry()?);
    let outgoing = Path::circle_of(&arc2.geometry()?);
    let (from, to) = (*arc1.end(), *arc2.start());
    let length = (to - from).norm();

    if length < TOLERANCE {
        return match corner_fillet(&incoming, &outgoing, &from, radius)? {
            None => Ok((vec![*arc1], *arc2)),
            Some(fillet) => Ok((
                vec![trim_end(arc1, fillet.start(), radius)?, fillet],
                trim_start(arc2, fillet.end(), radius)?,
            )),
        };
    }

    let edge = Path::edge(&from, &to)?;
    let leaving = corner_fillet(&incoming, &edge, &from, radius)?;
    let arriving = corner_fillet(&edge, &outgoing, &to, radius)?;

    // Both fillets must touch the edge, the first no later than the second.
    let dir = (to - from) / length;
    let free_from = leaving.map_or(0.0, |f| (f.end() - from).dot(&dir));
    let free_to = arriving.map_or(length, |f| (f.start() - from).dot(&dir));
    if free_from < -TOLERANCE || free_to > length + TOLERANCE || free_from > free_to + TOLERANCE {
        return Err(GeometryError::Infeasible(format!(
            "fillets of radius {radius} overrun the {length} long edge from ({}, {})",
            from.x, from.y
        ))
        .into());
    }

    let mut head = Vec::with_capacity(3);
    match leaving {
        Some(fillet) => {
            head.push(trim_end(arc1, fillet.start(), radius)?);
            head.push(fillet);
        }
        None => head.push(*arc1),
    }
    let tail = match arriving {
        Some(fillet) => {
            head.push(fillet);
            trim_start(arc2, fillet.end(), radius)?
        }
        None => *arc2,
    };
    Ok((head, tail))
}

/// Rounds the corner where `arc1` hands over to `arc2` with fillets of `radius`.
///
/// The two arcs are joined by the straight edge from `arc1`'s end to `arc2`'s
/// start (or meet directly). Each end of that edge that meets its arc at an
/// angle gets a fillet; an end that is already tangent is left alone. The
/// result runs from `arc1` (trimmed where a fillet takes over) through the
/// fillets to the remainder of `arc2`, re-based to start where the last
/// fillet ends. When only the edge's approach to `arc2` is sharp, this is the
/// three arcs `[arc1, fillet, rest of arc2]`.
///
/// # Errors
///
/// Returns `GeometryError::InvalidRadius` if `radius` is not positive or an
/// inside fillet does not fit its circle, and `GeometryError::Infeasible` if
/// the fillets overrun the edge or either arc. Propagates
/// `GeometryError::Degenerate` from arcs without a unique circle.
pub fn round_corner(arc1: &Arc, arc2: &Arc, radius: f64) -> Result<Vec<Arc>> {
    let (mut arcs, rest) = round_corner_split(arc1, arc2, radius)?;
    arcs.push(rest);
    Ok(arcs)
}

/// Rounds every corner of an outline made of arcs with fillets of `radius`.
///
/// The outline must start and end with an arc and join consecutive arcs by
/// at most one straight edge, which is what the spiral generator emits. Each
/// pair of neighbours, including the last and first across the closing edge,
/// goes through [`round_corner`]. Layer, width, fill and id are kept.
///
/// # Errors
///
/// Returns `GeometryError::InvalidGeometry` if the outline has fewer than two
/// arcs or straight edges in a row, and propagates the errors of
/// [`round_corner`].
pub fn smooth_polygon(polygon: &Polygon, radius: f64) -> Result<Polygon> {
    let arcs = outline_arcs(polygon)?;
    let mut smoothed = Vec::with_capacity(3 * arcs.len());
    let mut current = arcs[0];
    for arc in &arcs[1..] {
        let (done, next) = round_corner_split(&current, arc, radius)?;
        smoothed.extend(done);
        current = next;
    }

    // Close the loop onto the first arc, whose end may already be trimmed.
    let (done, first) = round_corner_split(&current, &smoothed[0], radius)?;
    smoothed[0] = first;
    smoothed.extend(done);

    let mut builder = PolygonBuilder::new();
    for arc in smoothed {
        builder.arc(arc);
    }
    Ok(builder
        .build(polygon.layer(), polygon.id())?
        .with_width(polygon.width())
        .with_fill(polygon.fill()))
}

fn outline_arcs(polygon: &Polygon) -> Result<Vec<Arc>> {
    let segments = polygon.segments();
    let arc_ended = matches!(segments.first(), Some(Segment::Arc(_)))
        && matches!(segments.last(), Some(Segment::Arc(_)));
    let lines_in_a_row = segments
        .windows(2)
        .any(|pair| matches!(pair, [Segment::Line(_), Segment::Line(_)]));
    let arcs: Vec<Arc> = polygon.arcs().copied().collect();
    if !arc_ended || lines_in_a_row || arcs.len() < 2 {
        return Err(GeometryError::InvalidGeometry(
            "only outlines of arcs joined by single straight edges can be smoothed".into(),
        )
        .into());
    }
    Ok(arcs)
}
