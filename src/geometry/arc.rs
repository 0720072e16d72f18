use std::f64::consts::TAU;

use serde::Serialize;

use crate::error::{GeometryError, Result};
use crate::math::arc_2d::{angle_of, arc_subdivision_count, polar_point};
use crate::math::circle_2d::fit_circle;
use crate::math::distance_2d::point_to_arc_dist;
use crate::math::{Point, Vector, TOLERANCE};

/// A circular arc in the board plane, stored as three points on its circle.
///
/// `mid` lies strictly between `start` and `end` along the sweep, which fixes
/// which of the two arcs between the endpoints is meant. This is also the form
/// board formats store arcs in. Use [`Arc::geometry`] for angular arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Arc {
    start: Point,
    mid: Point,
    end: Point,
}

impl Arc {
    /// Creates a new arc through `start`, `mid` and `end`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the points are colinear or coincide.
    pub fn new(start: Point, mid: Point, end: Point) -> Result<Self> {
        fit_circle(&start, &mid, &end)?;
        Ok(Self { start, mid, end })
    }

    /// Creates an arc about `center` sweeping a signed angle from `start_angle`.
    ///
    /// Positive `sweep` runs counter-clockwise, negative clockwise. The sweep
    /// fixes the direction, so any `start_angle` (including values past `2π`)
    /// is accepted.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the radius is not positive or
    /// `|sweep|` is not strictly between zero and a full turn.
    pub fn polar(center: Point, radius: f64, start_angle: f64, sweep: f64) -> Result<Self> {
        if !radius.is_finite() || radius < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "arc radius {radius} must be positive"
            ))
            .into());
        }
        if !sweep.is_finite() || sweep.abs() < TOLERANCE || sweep.abs() > TAU - TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "arc sweep {sweep} must lie strictly between 0 and a full turn"
            ))
            .into());
        }
        let offset = center.coords;
        Ok(Self {
            start: polar_point(radius, start_angle) + offset,
            mid: polar_point(radius, start_angle + 0.5 * sweep) + offset,
            end: polar_point(radius, start_angle + sweep) + offset,
        })
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> &Point {
        &self.start
    }

    /// Returns the intermediate point that fixes the sweep direction.
    #[must_use]
    pub fn mid(&self) -> &Point {
        &self.mid
    }

    /// Returns the end point.
    #[must_use]
    pub fn end(&self) -> &Point {
        &self.end
    }

    /// Derives the center/radius/angle view of this arc.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the stored points no longer define
    /// a unique circle.
    pub fn geometry(&self) -> Result<ArcGeometry> {
        let (center, radius) = fit_circle(&self.start, &self.mid, &self.end)?;
        let start_angle = angle_of(&(self.start - center));
        let end_angle = angle_of(&(self.end - center));
        let ccw = (self.mid - self.start).perp(&(self.end - self.mid)) > 0.0;
        let sweep = if ccw {
            (end_angle - start_angle).rem_euclid(TAU)
        } else {
            -(start_angle - end_angle).rem_euclid(TAU)
        };
        Ok(ArcGeometry {
            center,
            radius,
            start_angle,
            sweep,
        })
    }

    /// Returns a copy of this arc moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector) -> Self {
        Self {
            start: self.start + offset,
            mid: self.mid + offset,
            end: self.end + offset,
        }
    }

    /// Returns the same arc traversed from `end` to `start`.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            mid: self.mid,
            end: self.start,
        }
    }

    /// Returns the continuation of this arc from `start` to the original end,
    /// along the same circle and in the same rotational sense.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the arc has no unique circle or
    /// `start` coincides with the end point.
    pub fn with_start(&self, start: &Point) -> Result<Self> {
        let geometry = self.geometry()?;
        let new_start_angle = angle_of(&(start - geometry.center));
        let end_angle = geometry.end_angle();
        let sweep = if geometry.is_ccw() {
            (end_angle - new_start_angle).rem_euclid(TAU)
        } else {
            -(new_start_angle - end_angle).rem_euclid(TAU)
        };
        let mid_angle = new_start_angle + 0.5 * sweep;
        let mid = geometry.center + polar_point(geometry.radius, mid_angle).coords;
        Self::new(*start, mid, self.end)
    }
}

/// Creates an arc about the origin from `start_angle` to `end_angle`.
///
/// The sweep is `end_angle - start_angle`, so the order and range of the two
/// angles decide the direction: callers pass angles beyond `2π` to go the
/// long way around.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` under the same conditions as [`Arc::polar`].
pub fn arc_from_polar(radius: f64, start_angle: f64, end_angle: f64) -> Result<Arc> {
    Arc::polar(Point::origin(), radius, start_angle, end_angle - start_angle)
}

/// Center/radius/angle view of an [`Arc`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    pub center: Point,
    pub radius: f64,
    /// Polar angle of the start point about `center`, in `(-π, π]`.
    pub start_angle: f64,
    /// Signed sweep, positive counter-clockwise.
    pub sweep: f64,
}

impl ArcGeometry {
    /// Returns the end angle (`start_angle + sweep`).
    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep
    }

    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.sweep > 0.0
    }

    /// Evaluates the point at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point {
        self.center + polar_point(self.radius, self.start_angle + self.sweep * t).coords
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    /// Returns the minimum distance from `point` to this arc.
    #[must_use]
    pub fn distance_to(&self, point: &Point) -> f64 {
        point_to_arc_dist(point, &self.center, self.radius, self.start_angle, self.sweep)
    }

    /// Tessellates the arc into points after the start, ending at the end point.
    ///
    /// `tolerance` bounds the deviation between the arc and its chords.
    #[must_use]
    pub fn to_points(&self, tolerance: f64) -> Vec<Point> {
        let n = arc_subdivision_count(self.radius, self.sweep.abs(), tolerance);
        (1..=n)
            .map(|j| self.point_at(f64::from(j) / f64::from(n)))
            .collect()
    }
}
