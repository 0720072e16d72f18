use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::stackup::Stackup;
use super::turn::{
    check_termination_width, gap_angle, termination_angle, BottomTurn, InnerTurn, TopTurn, Turn,
    TurnParams,
};
use super::via_strip::ViaStrip;
use crate::error::{ConfigError, GeometryError, Result};
use crate::geometry::{Layer, Polygon, Via, ViaParams};
use crate::ident::IdGenerator;
use crate::math::Point;

/// Input parameters for a CFFC winding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindingParams {
    /// Winding center.
    pub at: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Number of turns, one per copper layer.
    pub number_turns: u32,
    /// Minimum copper-to-copper clearance.
    pub gap: f64,
    /// Width of the termination tabs. Defaults to the radial winding width.
    #[serde(default)]
    pub termination_width: Option<f64>,
    /// Radial step of the inner edge outside the via strips. Defaults to the
    /// via pad size.
    #[serde(default)]
    pub viastrip_width: Option<f64>,
    #[serde(default)]
    pub via: ViaParams,
}

impl WindingParams {
    #[must_use]
    pub fn new(
        at: Point,
        inner_radius: f64,
        outer_radius: f64,
        number_turns: u32,
        gap: f64,
    ) -> Self {
        Self {
            at,
            inner_radius,
            outer_radius,
            number_turns,
            gap,
            termination_width: None,
            viastrip_width: None,
            via: ViaParams::default(),
        }
    }

    #[must_use]
    pub fn with_termination_width(mut self, width: f64) -> Self {
        self.termination_width = Some(width);
        self
    }

    #[must_use]
    pub fn with_viastrip_width(mut self, width: f64) -> Self {
        self.viastrip_width = Some(width);
        self
    }

    #[must_use]
    pub fn with_via(mut self, via: ViaParams) -> Self {
        self.via = via;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.number_turns < 2 {
            return Err(ConfigError::InvalidConfiguration(format!(
                "a CFFC winding needs at least 2 turns, got {}",
                self.number_turns
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
        if self.gap < 0.0 {
            return Err(GeometryError::InvalidGeometry(format!(
                "gap {} must not be negative",
                self.gap
            ))
            .into());
        }
        if let Some(width) = self.termination_width {
            check_termination_width(width)?;
        }
        self.via.validate()
    }
}

/// Via strip joining two adjacent layers of a winding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    from: Layer,
    to: Layer,
    start_angle: f64,
    end_angle: f64,
    vias: Vec<Via>,
}

impl Transition {
    /// Upper of the two joined layers.
    #[must_use]
    pub fn from_layer(&self) -> Layer {
        self.from
    }

    #[must_use]
    pub fn to_layer(&self) -> Layer {
        self.to
    }

    /// Start of the sector, relative to the winding's tab axis.
    #[must_use]
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    #[must_use]
    pub fn vias(&self) -> &[Via] {
        &self.vias
    }
}

/// A fully built winding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindingLayout {
    turns: Vec<Turn>,
    transitions: Vec<Transition>,
    viastrip_angle: f64,
    inner_gap_angle: f64,
    termination_angle: f64,
    rotation_per_turn: f64,
    initial_rotation: f64,
}

impl WindingLayout {
    /// Returns the turns in stack order, top layer first.
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the via strips in stack order, one per pair of adjacent layers.
    #[must_use]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Iterates over every turn's outline.
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon> {
        self.turns.iter().map(Turn::polygon)
    }

    /// Iterates over every via of every strip.
    pub fn vias(&self) -> impl Iterator<Item = &Via> {
        self.transitions.iter().flat_map(|t| t.vias.iter())
    }

    /// Angular width of each via strip.
    #[must_use]
    pub fn viastrip_angle(&self) -> f64 {
        self.viastrip_angle
    }

    /// Gap angle at the inner radius, `asin(gap / inner_radius)`.
    #[must_use]
    pub fn inner_gap_angle(&self) -> f64 {
        self.inner_gap_angle
    }

    /// Full angular width of the termination notch.
    #[must_use]
    pub fn termination_angle(&self) -> f64 {
        self.termination_angle
    }

    #[must_use]
    pub fn rotation_per_turn(&self) -> f64 {
        self.rotation_per_turn
    }

    #[must_use]
    pub fn initial_rotation(&self) -> f64 {
        self.initial_rotation
    }

    /// Estimates the series DC resistance of all turns, each using the
    /// thickness of its own layer. Via resistance is not included.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfiguration` if the stack-up does not
    /// have exactly one thickness per turn, and `GeometryError::InvalidGeometry`
    /// for a non-positive thickness.
    pub fn estimate_dcr(&self, stackup: &Stackup, rho: f64) -> Result<f64> {
        if stackup.len() != self.turns.len() {
            return Err(ConfigError::InvalidConfiguration(format!(
                "stack-up has {} layers but the winding has {} turns",
                stackup.len(),
                self.turns.len()
            ))
            .into());
        }
        self.turns
            .iter()
            .zip(stackup.thicknesses())
            .try_fold(0.0, |total, (turn, &thickness)| {
                Ok(total + turn.estimate_dcr(thickness, rho)?)
            })
    }
}

/// Builds a multi-layer center-fed figure-eight (CFFC) winding.
///
/// A winding of N turns uses N copper layers: a [`TopTurn`] on `F.Cu`, N - 2
/// [`InnerTurn`]s and a [`BottomTurn`] on `B.Cu`. The circle at the inner
/// radius is shared out between the termination notch, one gap per turn and
/// N - 1 equal via-strip sectors. Interior turns are rotated so each via
/// strip sits exactly where the cutouts of the two layers it joins overlap.
pub struct Winding {
    params: WindingParams,
}

impl Winding {
    /// Creates a new `Winding` operation.
    #[must_use]
    pub fn new(params: WindingParams) -> Self {
        Self { params }
    }

    /// Executes the construction.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfiguration` for fewer than two turns,
    /// `GeometryError::InvalidGeometry` for inconsistent dimensions or a
    /// termination width that is not positive, and
    /// `GeometryError::Infeasible` if the termination and gaps leave no
    /// room for via strips.
    pub fn execute(&self, ids: &mut impl IdGenerator) -> Result<WindingLayout> {
        let p = &self.params;
        p.validate()?;

        let n = p.number_turns;
        let layer_count = n as usize;
        let termination_width = p.termination_width.unwrap_or(p.outer_radius - p.inner_radius);
        let viastrip_width = p.viastrip_width.unwrap_or(p.via.size);

        let inner_gap_angle = gap_angle(p.gap, p.inner_radius)?;
        let termination_angle = termination_angle(termination_width, p.outer_radius)?;
        let available = TAU - termination_angle - f64::from(n) * inner_gap_angle;
        if available <= 0.0 {
            return Err(GeometryError::Infeasible(format!(
                "termination and {n} gaps leave {available} rad for via strips"
            ))
            .into());
        }
        let viastrip_angle = available / f64::from(n - 1);
        let rotation_per_turn = viastrip_angle + inner_gap_angle;
        let initial_rotation = (termination_angle + inner_gap_angle) / 2.0;
        info!(
            number_turns = n,
            viastrip_angle, inner_gap_angle, termination_angle, "solved winding angle budget"
        );

        let turn_params = |index: usize| TurnParams {
            at: p.at,
            inner_radius: p.inner_radius,
            outer_radius: p.outer_radius,
            gap: p.gap,
            viastrip_angle,
            viastrip_width,
            layer: Layer::in_stack(index, layer_count),
        };

        let mut turns = Vec::with_capacity(layer_count);
        turns.push(TopTurn::new(turn_params(0), termination_width).execute(ids)?);
        for index in 1..layer_count - 1 {
            #[allow(clippy::cast_precision_loss)]
            let rotation = -(index as f64) * rotation_per_turn - initial_rotation;
            debug!(index, rotation, "placing inner turn");
            turns.push(InnerTurn::new(turn_params(index), rotation).execute(ids)?);
        }
        turns.push(
            BottomTurn::new(turn_params(layer_count - 1), termination_width).execute(ids)?,
        );

        // Transition k joins layers k and k + 1 across the cutout they share.
        let half_termination = termination_angle / 2.0;
        let transitions = (0..layer_count - 1)
            .map(|k| {
                #[allow(clippy::cast_precision_loss)]
                let end_angle = -half_termination - inner_gap_angle - k as f64 * rotation_per_turn;
                let start_angle = end_angle - viastrip_angle;
                let (from, to) = (turns[k].layer(), turns[k + 1].layer());
                let vias = ViaStrip::new(
                    p.at,
                    vec![from, to],
                    p.inner_radius,
                    start_angle,
                    end_angle,
                    p.via,
                )
                .execute(ids)?;
                Ok(Transition {
                    from,
                    to,
                    start_angle,
                    end_angle,
                    vias,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(WindingLayout {
            turns,
            transitions,
            viastrip_angle,
            inner_gap_angle,
            termination_angle,
            rotation_per_turn,
            initial_rotation,
        })
    }
}
