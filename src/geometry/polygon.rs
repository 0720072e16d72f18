use serde::{Deserialize, Serialize};

use super::{Arc, Layer};
use crate::error::{GeometryError, Result};
use crate::ident::ObjectId;
use crate::math::polygon_2d::signed_area_2d;
use crate::math::{Point, Vector, TOLERANCE};

/// One boundary segment of a [`Polygon`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    /// Straight edge from the previous end point to this point.
    Line(Point),
    /// Curved edge; its start coincides with the previous end point.
    Arc(Arc),
}

impl Segment {
    /// Returns the point where this segment ends.
    #[must_use]
    pub fn end(&self) -> &Point {
        match self {
            Self::Line(p) => p,
            Self::Arc(arc) => arc.end(),
        }
    }

    #[must_use]
    pub fn translated(&self, offset: &Vector) -> Self {
        match self {
            Self::Line(p) => Self::Line(p + offset),
            Self::Arc(arc) => Self::Arc(arc.translated(offset)),
        }
    }
}

/// Fill mode of a board polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    #[default]
    Solid,
    None,
}

/// A closed copper outline made of straight and curved segments.
///
/// The boundary is implicitly closed: a straight edge runs from the last
/// segment's end back to the first segment's start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    segments: Vec<Segment>,
    layer: Layer,
    width: f64,
    fill: Fill,
    id: ObjectId,
}

impl Polygon {
    /// Creates a new solid polygon with zero stroke width.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the segments cannot enclose an
    /// area, or `GeometryError::InvalidGeometry` if an arc does not start
    /// where the previous segment ends.
    pub fn new(segments: Vec<Segment>, layer: Layer, id: ObjectId) -> Result<Self> {
        let has_arc = segments.iter().any(|s| matches!(s, Segment::Arc(_)));
        if segments.is_empty() || (!has_arc && segments.len() < 3) {
            return Err(
                GeometryError::Degenerate("polygon needs an arc or at least three edges".into())
                    .into(),
            );
        }

        for (i, pair) in segments.windows(2).enumerate() {
            if let Segment::Arc(arc) = &pair[1] {
                let jump = (pair[0].end() - arc.start()).norm();
                if jump > TOLERANCE {
                    return Err(GeometryError::InvalidGeometry(format!(
                        "arc segment {} starts {jump} away from the previous end",
                        i + 1
                    ))
                    .into());
                }
            }
        }

        Ok(Self {
            segments,
            layer,
            width: 0.0,
            fill: Fill::Solid,
            id,
        })
    }

    /// Sets the stroke width.
    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Sets the fill mode.
    #[must_use]
    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn layer(&self) -> Layer {
        self.layer
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn fill(&self) -> Fill {
        self.fill
    }

    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Returns the arcs of the boundary in order.
    pub fn arcs(&self) -> impl Iterator<Item = &Arc> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Arc(arc) => Some(arc),
            Segment::Line(_) => None,
        })
    }

    /// Returns the first point of the boundary.
    #[must_use]
    pub fn start_point(&self) -> &Point {
        match &self.segments[0] {
            Segment::Line(p) => p,
            Segment::Arc(arc) => arc.start(),
        }
    }

    /// Returns the last point of the boundary.
    #[must_use]
    pub fn end_point(&self) -> &Point {
        self.segments[self.segments.len() - 1].end()
    }

    /// Returns the implicit straight edge that closes the boundary, from the
    /// end point back to the start point.
    #[must_use]
    pub fn closing_edge(&self) -> (Point, Point) {
        (*self.end_point(), *self.start_point())
    }

    /// Returns a copy moved by `offset`. The copy keeps this polygon's id.
    #[must_use]
    pub fn translated(&self, offset: &Vector) -> Self {
        Self {
            segments: self.segments.iter().map(|s| s.translated(offset)).collect(),
            ..self.clone()
        }
    }

    /// Converts the boundary to a point ring by tessellating arcs.
    ///
    /// `tolerance` bounds the deviation between each arc and its chords.
    /// Consecutive duplicates and a repeated closing point are dropped.
    #[must_use]
    pub fn to_points(&self, tolerance: f64) -> Vec<Point> {
        let mut points: Vec<Point> = Vec::with_capacity(self.segments.len() * 8);

        for segment in &self.segments {
            match segment {
                Segment::Line(p) => push_distinct(&mut points, *p),
                Segment::Arc(arc) => {
                    push_distinct(&mut points, *arc.start());
                    if let Ok(geometry) = arc.geometry() {
                        let tessellated = geometry.to_points(tolerance);
                        if let Some((_, interior)) = tessellated.split_last() {
                            for p in interior {
                                push_distinct(&mut points, *p);
                            }
                        }
                    } else {
                        push_distinct(&mut points, *arc.mid());
                    }
                    push_distinct(&mut points, *arc.end());
                }
            }
        }

        if points.len() > 1 && (points[0] - points[points.len() - 1]).norm() < TOLERANCE {
            points.pop();
        }
        points
    }

    /// Signed enclosed area of the tessellated boundary.
    ///
    /// Positive for counter-clockwise boundaries.
    #[must_use]
    pub fn signed_area(&self, tolerance: f64) -> f64 {
        signed_area_2d(&self.to_points(tolerance))
    }
}

fn push_distinct(points: &mut Vec<Point>, p: Point) {
    if points.last().is_none_or(|last| (last - p).norm() > TOLERANCE) {
        points.push(p);
    }
}

/// Accumulates boundary segments for a [`Polygon`].
///
/// Appending an arc that does not start at the current end point first
/// inserts the straight edge that bridges the two.
#[derive(Debug, Clone, Default)]
pub struct PolygonBuilder {
    segments: Vec<Segment>,
}

impl PolygonBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a straight edge to `point`.
    pub fn line_to(&mut self, point: Point) -> &mut Self {
        self.segments.push(Segment::Line(point));
        self
    }

    /// Appends an arc, bridging from the current end point if needed.
    pub fn arc(&mut self, arc: Arc) -> &mut Self {
        if let Some(last) = self.segments.last() {
            if (last.end() - arc.start()).norm() > TOLERANCE {
                self.segments.push(Segment::Line(*arc.start()));
            }
        }
        self.segments.push(Segment::Arc(arc));
        self
    }

    /// Finishes the outline.
    ///
    /// # Errors
    ///
    /// Propagates the validation errors of [`Polygon::new`].
    pub fn build(self, layer: Layer, id: ObjectId) -> Result<Polygon> {
        Polygon::new(self.segments, layer, id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CoilError;
    use crate::geometry::arc_from_polar;
    use crate::ident::{IdGenerator, SequentialIds};
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    // Quarter annulus: outer arc CCW, then inner arc CW.
    fn quarter_annulus(ids: &mut SequentialIds) -> Polygon {
        let mut builder = PolygonBuilder::new();
        builder
            .arc(arc_from_polar(2.0, 0.0, FRAC_PI_2).unwrap())
            .arc(arc_from_polar(1.0, FRAC_PI_2, 0.0).unwrap());
        builder.build(Layer::Front, ids.next_id()).unwrap()
    }

    #[test]
    fn builder_bridges_radial_jumps() {
        let mut ids = SequentialIds::default();
        let polygon = quarter_annulus(&mut ids);
        assert_eq!(polygon.segments().len(), 3);
        assert!(matches!(polygon.segments()[1], Segment::Line(_)));
        assert_relative_eq!(polygon.segments()[1].end().y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn area_of_quarter_annulus() {
        let mut ids = SequentialIds::default();
        let polygon = quarter_annulus(&mut ids);
        let expected = PI * (4.0 - 1.0) / 4.0;
        assert_relative_eq!(polygon.signed_area(1e-6), expected, max_relative = 1e-4);
    }

    #[test]
    fn closing_edge_joins_end_to_start() {
        let mut ids = SequentialIds::default();
        let polygon = quarter_annulus(&mut ids);
        let (from, to) = polygon.closing_edge();
        assert_relative_eq!(from, Point::new(1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(to, Point::new(2.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn translate_roundtrip() {
        let mut ids = SequentialIds::default();
        let polygon = quarter_annulus(&mut ids);
        let offset = Vector::new(0.110, -0.037);
        let back = polygon.translated(&offset).translated(&-offset);
        assert_eq!(back.id(), polygon.id());
        for (a, b) in back.to_points(1e-3).iter().zip(polygon.to_points(1e-3).iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn disconnected_arc_is_rejected() {
        let mut ids = SequentialIds::default();
        let segments = vec![
            Segment::Arc(arc_from_polar(2.0, 0.0, FRAC_PI_2).unwrap()),
            Segment::Arc(arc_from_polar(1.0, FRAC_PI_2, 0.0).unwrap()),
        ];
        let err = Polygon::new(segments, Layer::Front, ids.next_id()).unwrap_err();
        assert!(matches!(
            err,
            CoilError::Geometry(GeometryError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn two_lines_are_degenerate() {
        let mut ids = SequentialIds::default();
        let segments = vec![
            Segment::Line(Point::new(0.0, 0.0)),
            Segment::Line(Point::new(1.0, 0.0)),
        ];
        assert!(Polygon::new(segments, Layer::Back, ids.next_id()).is_err());
    }

    #[test]
    fn to_points_drops_closing_duplicate() {
        let mut ids = SequentialIds::default();
        let mut builder = PolygonBuilder::new();
        builder
            .arc(arc_from_polar(1.0, 0.0, PI).unwrap())
            .arc(arc_from_polar(1.0, PI, TAU - 1e-3).unwrap())
            .line_to(Point::new(1.0, 0.0));
        let polygon = builder.build(Layer::Inner(1), ids.next_id()).unwrap();
        let points = polygon.to_points(1e-3);
        let first = points[0];
        let last = points[points.len() - 1];
        assert!((first - last).norm() > TOLERANCE);
    }

    #[test]
    fn width_and_fill_defaults() {
        let mut ids = SequentialIds::default();
        let polygon = quarter_annulus(&mut ids).with_width(0.2e-3);
        assert_eq!(polygon.fill(), Fill::Solid);
        assert_relative_eq!(polygon.width(), 0.2e-3);
        assert_eq!(polygon.with_fill(Fill::None).fill(), Fill::None);
    }
}
