use serde::{Deserialize, Serialize};

use super::Layer;
use crate::error::{GeometryError, Result};
use crate::ident::ObjectId;
use crate::math::{Point, Vector};

/// Pad and drill dimensions for vias, with the edge-to-edge spacing kept
/// between neighbouring holes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViaParams {
    /// Annular pad diameter.
    pub size: f64,
    /// Drill diameter.
    pub drill: f64,
    /// Minimum clearance between adjacent drills.
    pub min_spacing: f64,
}

impl Default for ViaParams {
    fn default() -> Self {
        Self {
            size: 0.8e-3,
            drill: 0.4e-3,
            min_spacing: 0.5e-3,
        }
    }
}

impl ViaParams {
    /// Checks that the dimensions describe a buildable via.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidGeometry` if the drill is not positive,
    /// the pad is not larger than the drill, or the spacing is negative.
    pub fn validate(&self) -> Result<()> {
        let finite = [self.drill, self.size, self.min_spacing]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.drill <= 0.0 || self.size <= self.drill || self.min_spacing < 0.0 {
            return Err(GeometryError::InvalidGeometry(format!(
                "via size {} must exceed drill {} > 0 with non-negative spacing {}",
                self.size, self.drill, self.min_spacing
            ))
            .into());
        }
        Ok(())
    }
}

/// A plated hole joining copper on several layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Via {
    at: Point,
    size: f64,
    drill: f64,
    layers: Vec<Layer>,
    remove_unused_layers: bool,
    id: ObjectId,
}

impl Via {
    /// Creates a via that drops its pads on layers it does not connect.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidGeometry` if the dimensions are not
    /// buildable or fewer than two layers are given.
    pub fn new(at: Point, params: &ViaParams, layers: Vec<Layer>, id: ObjectId) -> Result<Self> {
        params.validate()?;
        if layers.len() < 2 {
            return Err(GeometryError::InvalidGeometry(
                "a via must connect at least two layers".into(),
            )
            .into());
        }
        Ok(Self {
            at,
            size: params.size,
            drill: params.drill,
            layers,
            remove_unused_layers: true,
            id,
        })
    }

    /// Keeps pads on every layer the hole passes through.
    #[must_use]
    pub fn keep_unused_layers(mut self) -> Self {
        self.remove_unused_layers = false;
        self
    }

    #[must_use]
    pub fn at(&self) -> &Point {
        &self.at
    }

    #[must_use]
    pub fn size(&self) -> f64 {
        self.size
    }

    #[must_use]
    pub fn drill(&self) -> f64 {
        self.drill
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[must_use]
    pub fn remove_unused_layers(&self) -> bool {
        self.remove_unused_layers
    }

    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Returns a copy moved by `offset`, keeping the id.
    #[must_use]
    pub fn translated(&self, offset: &Vector) -> Self {
        Self {
            at: self.at + offset,
            ..self.clone()
        }
    }
}
