use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::geometry::{arc_from_polar, smooth_polygon, Arc, Layer, Polygon, PolygonBuilder};
use crate::ident::IdGenerator;
use crate::math::resistance::dcr_of_annulus;
use crate::math::{checked_acos, Point, TOLERANCE};

/// Fractional parts closer than this to a whole number are rounded to it.
const WHOLE_TURN_TOLERANCE: f64 = 1e-9;

/// Input parameters for a single-layer spiral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpiralParams {
    /// Spiral center.
    pub at: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// At least one. A fractional part adds a partial turn, so the outer end
    /// sits that fraction of a revolution past the inner end.
    pub num_turns: f64,
    /// Clearance between adjacent turns.
    pub gap: f64,
    #[serde(default = "default_layer")]
    pub layer: Layer,
    /// Fillet radius for rounding every corner of the outline. Corners are
    /// left sharp when unset.
    #[serde(default)]
    pub corner_radius: Option<f64>,
}

fn default_layer() -> Layer {
    Layer::Front
}

impl SpiralParams {
    #[must_use]
    pub fn new(at: Point, inner_radius: f64, outer_radius: f64, num_turns: f64, gap: f64) -> Self {
        Self {
            at,
            inner_radius,
            outer_radius,
            num_turns,
            gap,
            layer: default_layer(),
            corner_radius: None,
        }
    }

    #[must_use]
    pub fn on_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    #[must_use]
    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.num_turns.is_finite() || self.num_turns < 1.0 {
            return Err(GeometryError::InvalidGeometry(format!(
                "spiral needs at least one turn, got {}",
                self.num_turns
            ))
            .into());
        }
        if self.inner_radius <= 0.0 || self.outer_radius <= self.inner_radius {
            return Err(GeometryError::InvalidGeometry(format!(
                "outer radius {} must be greater than inner radius {} > 0",
                self.outer_radius, self.inner_radius
            ))
            .into());
        }
        if !self.gap.is_finite() || self.gap <= 0.0 {
            return Err(GeometryError::InvalidGeometry(format!(
                "gap {} must be positive",
                self.gap
            ))
            .into());
        }
        if self.gap >= self.inner_radius {
            return Err(GeometryError::Infeasible(format!(
                "gap {} does not fit inside inner radius {}",
                self.gap, self.inner_radius
            ))
            .into());
        }
        if (self.num_turns - 1.0) * self.gap >= self.outer_radius - self.inner_radius {
            return Err(GeometryError::Infeasible(format!(
                "{} turns with gap {} do not fit between radii {} and {}",
                self.num_turns, self.gap, self.inner_radius, self.outer_radius
            ))
            .into());
        }
        Ok(())
    }

    /// Splits `num_turns` into whole turns and the fraction of a turn left.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn split_turns(&self) -> (u32, f64) {
        let whole = self.num_turns.floor();
        let fraction = self.num_turns - whole;
        if fraction < WHOLE_TURN_TOLERANCE {
            (whole as u32, 0.0)
        } else if fraction > 1.0 - WHOLE_TURN_TOLERANCE {
            (whole as u32 + 1, 0.0)
        } else {
            (whole as u32, fraction)
        }
    }
}

/// Inner radius of each turn, interpolated geometrically between the
/// winding's inner and outer radius.
///
/// The geometric progression minimizes DC resistance for a fixed number of
/// turns in a fixed annulus.
#[must_use]
pub fn turn_radii(inner_radius: f64, outer_radius: f64, num_turns: u32) -> Vec<f64> {
    let n = f64::from(num_turns);
    (0..num_turns)
        .map(|i| {
            let t = f64::from(i) / n;
            inner_radius.powf(1.0 - t) * outer_radius.powf(t)
        })
        .collect()
}

/// Radial extent of one stretch of spiral copper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TurnBounds {
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Share of a full revolution the stretch covers at these radii.
    pub fraction: f64,
}

/// Bounds of consecutive turns starting at `radii`, each running out to the
/// next turn less `gap` and the last to `outer_radius`.
fn bounds(radii: &[f64], outer_radius: f64, gap: f64, fraction: f64) -> Result<Vec<TurnBounds>> {
    radii
        .iter()
        .enumerate()
        .map(|(k, &inner)| {
            let outer = radii.get(k + 1).map_or(outer_radius, |next| next - gap);
            if outer <= inner {
                return Err(GeometryError::Infeasible(format!(
                    "gap {gap} leaves turn {k} no copper between {inner} and {outer}"
                ))
                .into());
            }
            Ok(TurnBounds {
                inner_radius: inner,
                outer_radius: outer,
                fraction,
            })
        })
        .collect()
}

/// Counter-clockwise arc about the origin from `start` to `end`.
fn ccw_arc(radius: f64, start: f64, end: f64) -> Result<Arc> {
    if end - start <= TOLERANCE {
        return Err(GeometryError::Infeasible(format!(
            "no room for a turn at radius {radius} between {start} and {end} rad"
        ))
        .into());
    }
    arc_from_polar(radius, start, end)
}

/// Clockwise arc about the origin from `start` down to `end`.
fn cw_arc(radius: f64, start: f64, end: f64) -> Result<Arc> {
    if start - end <= TOLERANCE {
        return Err(GeometryError::Infeasible(format!(
            "no room for a turn at radius {radius} between {end} and {start} rad"
        ))
        .into());
    }
    arc_from_polar(radius, start, end)
}

/// A built spiral: one polygon on one layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpiralTrace {
    polygon: Polygon,
    turns: Vec<TurnBounds>,
}

impl SpiralTrace {
    #[must_use]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Returns the radial bounds of the copper, innermost first.
    ///
    /// A spiral of whole turns has one entry per turn, each covering a full
    /// revolution. With a fractional part, the revolution splits into a sector
    /// crossed by one more turn than the rest; each turn then has an entry
    /// per sector, weighted by the sector's share of the circle.
    #[must_use]
    pub fn turns(&self) -> &[TurnBounds] {
        &self.turns
    }

    /// Estimates the DC resistance as the series sum of each turn's annulus,
    /// scaled by the share of the revolution it covers.
    ///
    /// The short radial connectors between turns are ignored.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidGeometry` if `thickness` is not positive.
    pub fn estimate_dcr(&self, thickness: f64, rho: f64) -> Result<f64> {
        self.turns.iter().try_fold(0.0, |total, turn| {
            let annulus = dcr_of_annulus(thickness, turn.inner_radius, turn.outer_radius, rho)?;
            Ok(total + turn.fraction * annulus)
        })
    }
}

/// Builds a multi-turn spiral as one continuous outline.
///
/// The outline runs outward along the inner edge of every turn, wraps around
/// the outermost turn, and returns inward along the outer edges. Turns step
/// outward on the negative x axis, where straight connectors join the edges.
/// A fractional turn count adds a second step-out axis `fraction` of a
/// revolution further on, where the outer end of the spiral sits.
pub struct Spiral {
    params: SpiralParams,
}

impl Spiral {
    /// Creates a new `Spiral` operation.
    #[must_use]
    pub fn new(params: SpiralParams) -> Self {
        Self { params }
    }

    /// Executes the construction.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidGeometry` for fewer than one turn or
    /// inconsistent radii, `GeometryError::Infeasible` if the gap leaves a
    /// turn with no copper or a fractional turn with no room to step out, and
    /// `GeometryError::InvalidRadius` if the corner radius is not positive or
    /// reaches half the narrowest trace.
    pub fn execute(&self, ids: &mut impl IdGenerator) -> Result<SpiralTrace> {
        let p = &self.params;
        p.validate()?;
        let (whole, fraction) = p.split_turns();
        debug!(num_turns = p.num_turns, whole, fraction, gap = p.gap, "building spiral");

        let (builder, turns) = if fraction > 0.0 {
            fractional_outline(p, whole, fraction)?
        } else {
            whole_outline(p, whole)?
        };
        let mut polygon = builder.build(p.layer, ids.next_id())?;

        if let Some(radius) = p.corner_radius {
            let narrowest = turns
                .iter()
                .map(|t| t.outer_radius - t.inner_radius)
                .fold(f64::INFINITY, f64::min);
            let limit = narrowest / 2.0;
            if !radius.is_finite() || radius <= 0.0 || radius >= limit {
                return Err(GeometryError::InvalidRadius { radius, limit }.into());
            }
            polygon = smooth_polygon(&polygon, radius)?;
        }

        Ok(SpiralTrace {
            polygon: polygon.translated(&p.at.coords),
            turns,
        })
    }
}

/// Outline of a spiral with a whole number of turns, about the origin.
fn whole_outline(p: &SpiralParams, num_turns: u32) -> Result<(PolygonBuilder, Vec<TurnBounds>)> {
    let gap = p.gap;
    let radii = turn_radii(p.inner_radius, p.outer_radius, num_turns);
    let turns = bounds(&radii, p.outer_radius, gap, 1.0)?;
    debug!(?radii, "spiral turn radii");

    let mut builder = PolygonBuilder::new();

    // Inner edges, innermost first. The first opening leaves room for the
    // closing connector at x = -(r0 - gap).
    let opening = checked_acos(1.0 - gap / radii[0], "spiral inner opening")?;
    builder.arc(ccw_arc(radii[0], -PI + opening, PI)?);
    for pair in radii.windows(2) {
        let opening = checked_acos(pair[0] / pair[1], "spiral turn opening")?;
        builder.arc(ccw_arc(pair[1], -PI + opening, PI)?);
    }

    let last = radii[radii.len() - 1];
    let entry = checked_acos(last / p.outer_radius, "spiral outer entry")?;
    let exit = checked_acos((last - gap) / p.outer_radius, "spiral outer exit")?;
    builder.arc(cw_arc(p.outer_radius, PI + entry, -PI + exit)?);

    // Outer edges, back inward.
    for pair in radii.windows(2).rev() {
        let (below, above) = (pair[0] - gap, pair[1] - gap);
        let angle = checked_acos(below / above, "spiral return opening")?;
        builder.arc(cw_arc(above, PI, -PI + angle)?);
    }
    Ok((builder, turns))
}

/// Outline of a spiral of `whole + fraction` turns, about the origin.
///
/// The sector from the negative x axis counter-clockwise to `turn_end`
/// (`fraction` of a revolution) is crossed by `whole + 1` turns spaced on
/// the `narrow` radii; the rest of the circle by `whole` turns on the `wide`
/// radii. Each turn steps from its wide to its narrow radius on the negative
/// x axis and back out at `turn_end`, where the outermost turn leaves.
fn fractional_outline(
    p: &SpiralParams,
    whole: u32,
    fraction: f64,
) -> Result<(PolygonBuilder, Vec<TurnBounds>)> {
    let gap = p.gap;
    let wide = turn_radii(p.inner_radius, p.outer_radius, whole);
    let narrow = turn_radii(p.inner_radius, p.outer_radius, whole + 1);
    let narrow_bounds = bounds(&narrow, p.outer_radius, gap, fraction)?;
    let wide_bounds = bounds(&wide, p.outer_radius, gap, 1.0 - fraction)?;
    let turn_end = -PI + TAU * fraction;
    debug!(?wide, ?narrow, turn_end, "spiral sector radii");

    let mut turns = Vec::with_capacity(narrow_bounds.len() + wide_bounds.len());
    for (k, stretch) in narrow_bounds.iter().enumerate() {
        turns.push(*stretch);
        if let Some(stretch) = wide_bounds.get(k) {
            turns.push(*stretch);
        }
    }

    let mut builder = PolygonBuilder::new();

    // Inner edges, outward. The innermost edge spans both sectors.
    let opening = checked_acos(1.0 - gap / wide[0], "spiral inner opening")?;
    builder.arc(ccw_arc(wide[0], -PI + opening, PI)?);
    for (k, &step) in narrow.iter().enumerate().skip(1) {
        let opening = checked_acos(wide[k - 1] / step, "spiral turn opening")?;
        builder.arc(ccw_arc(step, -PI + opening, turn_end)?);
        if let Some(&radius) = wide.get(k) {
            let opening = checked_acos(step / radius, "spiral turn opening")?;
            builder.arc(ccw_arc(radius, turn_end + opening, PI)?);
        }
    }

    let last = narrow[narrow.len() - 1];
    let entry = checked_acos(last / p.outer_radius, "spiral outer entry")?;
    let exit = checked_acos((last - gap) / p.outer_radius, "spiral outer exit")?;
    builder.arc(cw_arc(p.outer_radius, turn_end + entry, turn_end + exit - TAU)?);

    // Outer edges, back inward.
    for (k, &step) in narrow.iter().enumerate().skip(1).rev() {
        let (below, above) = (wide[k - 1] - gap, step - gap);
        let angle = checked_acos(below / above, "spiral return opening")?;
        builder.arc(cw_arc(above, turn_end, -PI + angle)?);
        if k >= 2 {
            let (below, above) = (narrow[k - 1] - gap, wide[k - 1] - gap);
            let angle = checked_acos(below / above, "spiral return opening")?;
            builder.arc(cw_arc(above, PI, turn_end + angle)?);
        }
    }
    Ok((builder, turns))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CoilError;
    use crate::geometry::{ArcGeometry, Segment};
    use crate::ident::SequentialIds;
    use crate::math::distance_2d::point_to_segment_dist;
    use crate::math::polygon_2d::has_self_intersections;
    use crate::math::resistance::COPPER_RESISTIVITY;
    use approx::assert_relative_eq;

    const CENTER: f64 = 0.110;
    const GAP: f64 = 0.5e-3;

    fn params(num_turns: f64) -> SpiralParams {
        SpiralParams::new(Point::new(CENTER, CENTER), 0.010, 0.015, num_turns, GAP)
    }

    fn build(p: SpiralParams) -> SpiralTrace {
        Spiral::new(p).execute(&mut SequentialIds::default()).unwrap()
    }

    fn dcr(trace: &SpiralTrace) -> f64 {
        trace.estimate_dcr(35e-6, COPPER_RESISTIVITY).unwrap()
    }

    /// Straight edges of the outline as `(from, to)`, closing edge first.
    fn straight_edges(polygon: &Polygon) -> Vec<(Point, Point)> {
        let mut edges = vec![polygon.closing_edge()];
        let mut previous = *polygon.start_point();
        for segment in polygon.segments() {
            if let Segment::Line(to) = segment {
                edges.push((previous, *to));
            }
            previous = *segment.end();
        }
        edges
    }

    /// The one straight edge lying on the vertical line `x` from the center.
    fn edge_at(edges: &[(Point, Point)], x: f64) -> (Point, Point) {
        let on_line = |p: &Point| (p.x - CENTER - x).abs() < 1e-12;
        let found: Vec<_> = edges
            .iter()
            .filter(|(a, b)| on_line(a) && on_line(b))
            .collect();
        assert_eq!(found.len(), 1, "edges at x = {x}");
        *found[0]
    }

    fn edge_distance(e: (Point, Point), f: (Point, Point)) -> f64 {
        [
            point_to_segment_dist(&e.0, &f.0, &f.1),
            point_to_segment_dist(&e.1, &f.0, &f.1),
            point_to_segment_dist(&f.0, &e.0, &e.1),
            point_to_segment_dist(&f.1, &e.0, &e.1),
        ]
        .into_iter()
        .fold(f64::INFINITY, f64::min)
    }

    /// Splits the outline's arcs into those running outward along inner
    /// edges (counter-clockwise) and those running back (clockwise).
    fn edges_by_direction(trace: &SpiralTrace) -> (Vec<ArcGeometry>, Vec<ArcGeometry>) {
        trace
            .polygon()
            .arcs()
            .map(|a| a.geometry().unwrap())
            .partition(ArcGeometry::is_ccw)
    }

    #[test]
    fn radii_are_geometric() {
        let radii = turn_radii(1.0, 8.0, 3);
        assert_eq!(radii.len(), 3);
        assert_relative_eq!(radii[0], 1.0);
        assert_relative_eq!(radii[1], 2.0, max_relative = 1e-12);
        assert_relative_eq!(radii[2], 4.0, max_relative = 1e-12);
    }

    #[test]
    fn turns_are_separated_by_gap() {
        let trace = build(params(4.0));
        let turns = trace.turns();
        assert_eq!(turns.len(), 4);
        for pair in turns.windows(2) {
            let clearance = pair[1].inner_radius - pair[0].outer_radius;
            assert_relative_eq!(clearance, GAP, max_relative = 1e-9);
        }
        assert_relative_eq!(turns[3].outer_radius, 0.015);
        assert!(turns.iter().all(|t| (t.fraction - 1.0).abs() < 1e-15));
    }

    #[test]
    fn every_facing_edge_keeps_gap_clearance() {
        for num_turns in [2.0, 3.0, 4.0, 5.0, 6.0, 1.5, 2.5, 3.5] {
            let trace = build(params(num_turns));
            let (inner, outer) = edges_by_direction(&trace);
            assert_eq!(inner.len(), outer.len(), "{num_turns} turns");

            // Every return edge but the outermost faces the inner edge one
            // gap further out.
            let returns: Vec<_> = outer.iter().filter(|g| g.radius < 0.015 - 1e-9).collect();
            assert_eq!(returns.len(), inner.len() - 1, "{num_turns} turns");
            for edge in returns {
                let facing: Vec<_> = inner
                    .iter()
                    .filter(|g| (g.radius - edge.radius - GAP).abs() < 1e-9)
                    .collect();
                assert_eq!(facing.len(), 1, "{num_turns} turns, r = {}", edge.radius);
                let middle = edge.point_at(0.5);
                assert_relative_eq!(facing[0].distance_to(&middle), GAP, max_relative = 1e-6);

                // No inner edge further out comes closer anywhere along it.
                for t in [0.1, 0.3, 0.5, 0.7, 0.9] {
                    let p = edge.point_at(t);
                    for other in inner.iter().filter(|g| g.radius > edge.radius) {
                        assert!(
                            other.distance_to(&p) > GAP * (1.0 - 1e-9),
                            "{num_turns} turns, r = {} at t = {t}",
                            edge.radius
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn every_connector_pair_keeps_gap_clearance() {
        for n in 2..=6 {
            let trace = build(params(f64::from(n)));
            let edges = straight_edges(trace.polygon());
            assert_eq!(edges.len(), 2 * n as usize, "{n} turns");
            // Turn k steps out at x = -r_k and its return runs back one gap
            // to the right; for the innermost turn that is the closing edge.
            for r in turn_radii(0.010, 0.015, n) {
                let outward = edge_at(&edges, -r);
                let back = edge_at(&edges, -(r - GAP));
                assert_relative_eq!(edge_distance(outward, back), GAP, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn outline_does_not_cross_itself() {
        for n in 1..=5 {
            let trace = build(params(f64::from(n)));
            let points = trace.polygon().to_points(1e-6);
            assert!(!has_self_intersections(&points), "{n} turns");
        }
    }

    #[test]
    fn fractional_outline_does_not_cross_itself() {
        for num_turns in [1.5, 1.9, 2.25, 2.5, 3.25, 3.6, 4.5] {
            let trace = build(params(num_turns));
            let points = trace.polygon().to_points(1e-6);
            assert!(!has_self_intersections(&points), "{num_turns} turns");
        }
    }

    #[test]
    fn fractional_turn_splits_the_revolution() {
        let trace = build(params(2.5));
        let turns = trace.turns();
        // Three turns cross one half of the circle, two the other.
        assert_eq!(turns.len(), 5);
        assert!(turns.iter().all(|t| (t.fraction - 0.5).abs() < 1e-12));
        for pair in turns.windows(2) {
            assert!(pair[1].inner_radius >= pair[0].inner_radius);
        }
        assert_relative_eq!(turns[4].outer_radius, 0.015);

        let covered: f64 = build(params(3.25)).turns().iter().map(|t| t.fraction).sum();
        assert_relative_eq!(covered, 3.25, max_relative = 1e-12);
    }

    #[test]
    fn outer_end_moves_with_the_fraction() {
        // A quarter turn past the inner end moves the outer step from the
        // negative x axis to the negative y axis. The outer edge then ends
        // one gap inside the outermost turn's inner radius along that axis.
        let trace = build(params(2.25));
        let (_, outer) = edges_by_direction(&trace);
        let outermost = outer.iter().find(|g| g.radius > 0.015 - 1e-9).unwrap();
        let end = outermost.point_at(1.0);
        let last = turn_radii(0.010, 0.015, 3)[2];
        assert_relative_eq!(CENTER - end.y, last - GAP, max_relative = 1e-9);
        assert!(end.x > CENTER, "end at {end:?}");
    }

    #[test]
    fn whole_fraction_matches_integer_spiral() {
        let exact = build(params(3.0));
        let nearly = build(params(3.0 - 1e-12));
        assert_eq!(exact.turns(), nearly.turns());
        assert_eq!(exact.polygon().segments(), nearly.polygon().segments());
    }

    #[test]
    fn gap_larger_than_inner_radius_is_infeasible() {
        let mut p = params(2.0);
        p.gap = 0.011;
        let err = Spiral::new(p).execute(&mut SequentialIds::default()).unwrap_err();
        assert!(matches!(err, CoilError::Geometry(GeometryError::Infeasible(_))));
    }

    #[test]
    fn too_many_turns_is_infeasible() {
        let err = Spiral::new(params(20.0)).execute(&mut SequentialIds::default()).unwrap_err();
        assert!(matches!(err, CoilError::Geometry(GeometryError::Infeasible(_))));
    }

    #[test]
    fn sliver_of_a_turn_is_infeasible() {
        // A tenth of a revolution leaves no room to step out to the next radius.
        let err = Spiral::new(params(1.1)).execute(&mut SequentialIds::default()).unwrap_err();
        assert!(matches!(err, CoilError::Geometry(GeometryError::Infeasible(_))));
    }

    #[test]
    fn fewer_than_one_turn_is_invalid() {
        for num_turns in [0.0, 0.5, -2.0, f64::NAN, f64::INFINITY] {
            let err = Spiral::new(params(num_turns))
                .execute(&mut SequentialIds::default())
                .unwrap_err();
            assert!(
                matches!(err, CoilError::Geometry(GeometryError::InvalidGeometry(_))),
                "{num_turns} turns"
            );
        }
    }

    #[test]
    fn single_turn_resistance_is_one_annulus() {
        let r = dcr(&build(params(1.0)));
        let expected = dcr_of_annulus(35e-6, 0.010, 0.015, COPPER_RESISTIVITY).unwrap();
        assert_relative_eq!(r, expected, max_relative = 1e-12);
    }

    #[test]
    fn more_turns_raise_resistance() {
        let two = dcr(&build(params(2.0)));
        let half = dcr(&build(params(2.5)));
        let three = dcr(&build(params(3.0)));
        assert!(two < half && half < three, "{two} {half} {three}");
    }

    #[test]
    fn corners_stay_sharp_by_default() {
        let p = params(3.0);
        assert_eq!(p.corner_radius, None);
        let (inner, outer) = edges_by_direction(&build(p));
        assert_eq!(inner.len() + outer.len(), 6);
    }

    #[test]
    fn corner_radius_rounds_every_sharp_corner() {
        for (num_turns, radius) in [(1.0, 0.2e-3), (2.0, 0.2e-3), (3.0, 0.1e-3), (4.0, 0.05e-3)] {
            let sharp = build(params(num_turns));
            let smooth = build(params(num_turns).with_corner_radius(radius));
            let arcs: Vec<_> = smooth
                .polygon()
                .arcs()
                .map(|a| a.geometry().unwrap())
                .collect();
            // Each connector meets one edge at an angle; the closing edge
            // meets both.
            let fillets = arcs
                .iter()
                .filter(|g| (g.radius - radius).abs() < 1e-9)
                .count();
            let corners = sharp.polygon().arcs().count() + 1;
            assert_eq!(fillets, corners, "{num_turns} turns");
            assert_eq!(arcs.len(), sharp.polygon().arcs().count() + corners);

            let points = smooth.polygon().to_points(1e-6);
            assert!(!has_self_intersections(&points), "{num_turns} turns");
            assert_eq!(smooth.turns(), sharp.turns());
            assert_eq!(smooth.polygon().layer(), Layer::Front);
        }
    }

    #[test]
    fn fractional_spiral_can_be_smoothed() {
        let smooth = build(params(2.5).with_corner_radius(0.1e-3));
        assert_eq!(smooth.polygon().arcs().count(), 17);
        let points = smooth.polygon().to_points(1e-6);
        assert!(!has_self_intersections(&points));
    }

    #[test]
    fn oversized_corner_radius_is_rejected() {
        // The inner turn of a two-turn spiral is about 1.75 mm wide.
        for radius in [1.0e-3, 0.0, -0.1e-3, f64::NAN] {
            let err = Spiral::new(params(2.0).with_corner_radius(radius))
                .execute(&mut SequentialIds::default())
                .unwrap_err();
            let CoilError::Geometry(GeometryError::InvalidRadius { limit, .. }) = err else {
                panic!("radius {radius}: {err:?}");
            };
            assert_relative_eq!(limit, 0.87372e-3, max_relative = 1e-4);
        }
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let json = r#"{"at": [0.1, 0.1], "inner_radius": 0.01, "outer_radius": 0.015,
            "num_turns": 2, "gap": 0.0005}"#;
        let p: SpiralParams = serde_json::from_str(json).unwrap();
        assert_eq!(p.layer, Layer::Front);
        assert_eq!(p.corner_radius, None);
        assert_relative_eq!(p.num_turns, 2.0);
        assert_eq!(p.on_layer(Layer::Back).layer, Layer::Back);

        let json = r#"{"at": [0.1, 0.1], "inner_radius": 0.01, "outer_radius": 0.015,
            "num_turns": 2.5, "gap": 0.0005, "corner_radius": 0.0001}"#;
        let p: SpiralParams = serde_json::from_str(json).unwrap();
        assert_relative_eq!(p.corner_radius.unwrap(), 1e-4);
    }
}
