use std::f64::consts::TAU;

use serde::Serialize;
use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::geometry::{arc_from_polar, Layer, Polygon, PolygonBuilder};
use crate::ident::IdGenerator;
use crate::math::resistance::dcr_of_annulus;
use crate::math::{checked_asin, Point};

/// Angle subtended at `radius` by a clearance of `gap`.
///
/// Every angular clearance of a CFFC turn goes through this, so the linear
/// clearance is the same at every radius.
///
/// # Errors
///
/// Returns `GeometryError::Infeasible` if `gap` exceeds `radius`.
pub fn gap_angle(gap: f64, radius: f64) -> Result<f64> {
    checked_asin(gap / radius, "gap angle")
}

/// Full angular width of the termination notch, `asin(width / outer_radius)`.
///
/// The notch spans half of this angle on each side of the tab axis.
///
/// NOTE: an older generator used `asin(width / outer_radius / 2)` as the
/// half-angle instead, which makes the tab edges exactly horizontal. The two
/// disagree by a few percent for wide tabs; which one the board outline
/// should follow has not been settled, so both turn shapes and the winding
/// budget go through this one definition.
///
/// # Errors
///
/// Returns `GeometryError::Infeasible` if `width` exceeds `outer_radius`.
pub fn termination_angle(width: f64, outer_radius: f64) -> Result<f64> {
    checked_asin(width / outer_radius, "termination angle")
}

/// Dimensions shared by every turn of a CFFC winding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnParams {
    /// Winding center.
    pub at: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Minimum copper-to-copper clearance.
    pub gap: f64,
    /// Angular width reserved for each via transition.
    pub viastrip_angle: f64,
    /// Radial step of the inner edge away from the via strips.
    pub viastrip_width: f64,
    pub layer: Layer,
}

impl TurnParams {
    fn validate(&self) -> Result<()> {
        if self.inner_radius <= 0.0 || self.outer_radius <= self.inner_radius {
            return Err(GeometryError::InvalidGeometry(format!(
                "outer radius {} must be greater than inner radius {} > 0",
                self.outer_radius, self.inner_radius
            ))
            .into());
        }
        if self.viastrip_width < 0.0
            || self.inner_radius + self.viastrip_width >= self.outer_radius
        {
            return Err(GeometryError::InvalidGeometry(format!(
                "via strip width {} leaves no copper between radii {} and {}",
                self.viastrip_width, self.inner_radius, self.outer_radius
            ))
            .into());
        }
        if self.gap < 0.0 || self.viastrip_angle <= 0.0 {
            return Err(GeometryError::InvalidGeometry(format!(
                "gap {} must be non-negative and via strip angle {} positive",
                self.gap, self.viastrip_angle
            ))
            .into());
        }
        Ok(())
    }

    /// Returns the inner and outer gap angles.
    fn gap_angles(&self) -> Result<(f64, f64)> {
        Ok((
            gap_angle(self.gap, self.inner_radius)?,
            gap_angle(self.gap, self.outer_radius)?,
        ))
    }
}

/// Position of a turn in the layer stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    Top,
    Inner,
    Bottom,
}

/// One layer's copper outline together with the radii it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    kind: TurnKind,
    polygon: Polygon,
    inner_radius: f64,
    outer_radius: f64,
    rotation: f64,
}

impl Turn {
    #[must_use]
    pub fn kind(&self) -> TurnKind {
        self.kind
    }

    #[must_use]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    #[must_use]
    pub fn layer(&self) -> Layer {
        self.polygon.layer()
    }

    #[must_use]
    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    #[must_use]
    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    /// Angular offset of the turn about the winding center. Zero for the
    /// outer layers.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Estimates the DC resistance of the turn's copper as a flat annulus.
    ///
    /// Via resistance and the termination tab are not included.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidGeometry` if `thickness` is not positive.
    pub fn estimate_dcr(&self, thickness: f64, rho: f64) -> Result<f64> {
        dcr_of_annulus(thickness, self.inner_radius, self.outer_radius, rho)
    }
}

/// Rejects a termination tab width that is not a positive length.
pub(crate) fn check_termination_width(width: f64) -> Result<()> {
    if !width.is_finite() || width <= 0.0 {
        return Err(GeometryError::InvalidGeometry(format!(
            "termination width {width} must be positive"
        ))
        .into());
    }
    Ok(())
}

/// Half of the termination notch, after checking that the tab width, the
/// gap and the via strip fit around the circle.
fn termination_half_angle(p: &TurnParams, width: f64, inner_gap: f64) -> Result<f64> {
    check_termination_width(width)?;
    let half_term = termination_angle(width, p.outer_radius)? / 2.0;
    check_budget(
        2.0 * half_term + inner_gap + p.viastrip_angle,
        "termination, gap and via strip",
    )?;
    Ok(half_term)
}

fn check_budget(used: f64, what: &str) -> Result<()> {
    if used >= TAU {
        return Err(GeometryError::Infeasible(format!(
            "{what} take {used} rad, more than a full turn"
        ))
        .into());
    }
    Ok(())
}

/// Top-layer turn of a center-fed figure-eight (CFFC) winding.
///
/// Each layer of the winding carries one annular sector. The outer layers
/// end in a termination tab past the outer radius, here at the start of the
/// sweep.
pub struct TopTurn {
    params: TurnParams,
    termination_width: f64,
}

impl TopTurn {
    /// Creates a new `TopTurn` operation.
    #[must_use]
    pub fn new(params: TurnParams, termination_width: f64) -> Self {
        Self {
            params,
            termination_width,
        }
    }

    /// Builds the turn.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidGeometry` for inconsistent radii or a
    /// termination width that is not positive, and
    /// `GeometryError::Infeasible` if the gap, termination and via strip do
    /// not fit around the circle.
    pub fn execute(&self, ids: &mut impl IdGenerator) -> Result<Turn> {
        let p = &self.params;
        p.validate()?;
        let (inner_gap, outer_gap) = p.gap_angles()?;
        let half_term = termination_half_angle(p, self.termination_width, inner_gap)?;

        let via_start = TAU - half_term - inner_gap - p.viastrip_angle;
        let via_end = TAU - half_term - inner_gap;
        debug!(
            layer = %p.layer,
            half_term,
            inner_gap,
            outer_gap,
            via_start,
            "building top turn"
        );

        let tw = self.termination_width;
        let mut builder = PolygonBuilder::new();
        builder
            .arc(arc_from_polar(p.inner_radius, -half_term, half_term)?)
            .arc(arc_from_polar(p.inner_radius + p.viastrip_width, half_term, via_start)?)
            .arc(arc_from_polar(p.inner_radius, via_start, via_end)?)
            .arc(arc_from_polar(p.outer_radius, TAU - half_term - outer_gap, half_term)?)
            .line_to(Point::new(p.outer_radius + tw, tw / 2.0))
            .line_to(Point::new(p.outer_radius + tw, -tw / 2.0))
            .line_to(Point::new(p.outer_radius * half_term.cos(), -tw / 2.0));

        let polygon = builder.build(p.layer, ids.next_id())?.translated(&p.at.coords);
        Ok(Turn {
            kind: TurnKind::Top,
            polygon,
            inner_radius: p.inner_radius,
            outer_radius: p.outer_radius,
            rotation: 0.0,
        })
    }
}

/// Bottom-layer turn, the mirror image of [`TopTurn`] so both terminations
/// land on the same side of the device.
pub struct BottomTurn {
    params: TurnParams,
    termination_width: f64,
}

impl BottomTurn {
    /// Creates a new `BottomTurn` operation.
    #[must_use]
    pub fn new(params: TurnParams, termination_width: f64) -> Self {
        Self {
            params,
            termination_width,
        }
    }

    /// Builds the turn.
    ///
    /// # Errors
    ///
    /// Same conditions as [`TopTurn::execute`].
    pub fn execute(&self, ids: &mut impl IdGenerator) -> Result<Turn> {
        let p = &self.params;
        p.validate()?;
        let (inner_gap, outer_gap) = p.gap_angles()?;
        let half_term = termination_half_angle(p, self.termination_width, inner_gap)?;

        let via_start = half_term + inner_gap + p.viastrip_angle;
        let via_end = half_term + inner_gap;
        debug!(
            layer = %p.layer,
            half_term,
            inner_gap,
            outer_gap,
            via_start,
            "building bottom turn"
        );

        let tw = self.termination_width;
        let mut builder = PolygonBuilder::new();
        builder
            .arc(arc_from_polar(p.inner_radius, half_term, -half_term)?)
            .arc(arc_from_polar(p.inner_radius + p.viastrip_width, TAU - half_term, via_start)?)
            .arc(arc_from_polar(p.inner_radius, via_start, via_end)?)
            .arc(arc_from_polar(p.outer_radius, half_term + outer_gap, TAU - half_term)?)
            .line_to(Point::new(p.outer_radius + tw, -tw / 2.0))
            .line_to(Point::new(p.outer_radius + tw, tw / 2.0))
            .line_to(Point::new(p.outer_radius * half_term.cos(), tw / 2.0));

        let polygon = builder.build(p.layer, ids.next_id())?.translated(&p.at.coords);
        Ok(Turn {
            kind: TurnKind::Bottom,
            polygon,
            inner_radius: p.inner_radius,
            outer_radius: p.outer_radius,
            rotation: 0.0,
        })
    }
}

/// Interior-layer turn with a via-strip cutout at each end of its sweep
/// instead of a termination tab.
pub struct InnerTurn {
    params: TurnParams,
    rotation: f64,
}

impl InnerTurn {
    /// Creates a new `InnerTurn` operation, rotated by `rotation` radians.
    #[must_use]
    pub fn new(params: TurnParams, rotation: f64) -> Self {
        Self { params, rotation }
    }

    /// Builds the turn.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidGeometry` if `outer_radius <= inner_radius`
    /// and `GeometryError::Infeasible` if the two via strips and the gap do
    /// not fit around the circle.
    pub fn execute(&self, ids: &mut impl IdGenerator) -> Result<Turn> {
        let p = &self.params;
        p.validate()?;
        let (inner_gap, outer_gap) = p.gap_angles()?;
        check_budget(inner_gap + 2.0 * p.viastrip_angle, "gap and via strips")?;

        let rot = self.rotation;
        let half_inner = inner_gap / 2.0;
        let half_outer = outer_gap / 2.0;
        let entry_end = half_inner + p.viastrip_angle + rot;
        let exit_start = TAU - half_inner - p.viastrip_angle + rot;
        debug!(
            layer = %p.layer,
            rotation = rot,
            inner_gap,
            outer_gap,
            "building inner turn"
        );

        let mut builder = PolygonBuilder::new();
        builder
            .arc(arc_from_polar(p.inner_radius, half_inner + rot, entry_end)?)
            .arc(arc_from_polar(p.inner_radius + p.viastrip_width, entry_end, exit_start)?)
            .arc(arc_from_polar(p.inner_radius, exit_start, TAU - half_inner + rot)?)
            .arc(arc_from_polar(p.outer_radius, TAU - half_outer + rot, half_outer + rot)?);

        let polygon = builder.build(p.layer, ids.next_id())?.translated(&p.at.coords);
        Ok(Turn {
            kind: TurnKind::Inner,
            polygon,
            inner_radius: p.inner_radius,
            outer_radius: p.outer_radius,
            rotation: rot,
        })
    }
}
