use serde::{Deserialize, Serialize};

use crate::math::resistance::weight_to_thickness;

/// Copper thickness of each layer of a board, top layer first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stackup {
    thicknesses: Vec<f64>,
}

impl Stackup {
    #[must_use]
    pub fn new(thicknesses: Vec<f64>) -> Self {
        Self { thicknesses }
    }

    /// `layers` layers of the same thickness.
    #[must_use]
    pub fn uniform(layers: usize, thickness: f64) -> Self {
        Self::new(vec![thickness; layers])
    }

    /// Builds a stack-up from copper weights in oz per square foot.
    #[must_use]
    pub fn from_weights(weights: &[f64]) -> Self {
        Self::new(weights.iter().copied().map(weight_to_thickness).collect())
    }

    #[must_use]
    pub fn thicknesses(&self) -> &[f64] {
        &self.thicknesses
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.thicknesses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.thicknesses.is_empty()
    }
}
