use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A copper layer of the board stack, named the way board files name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Layer {
    /// Top copper, `F.Cu`.
    Front,
    /// Interior copper `In{n}.Cu`, numbered from 1 below the top layer.
    Inner(u32),
    /// Bottom copper, `B.Cu`.
    Back,
}

impl Layer {
    /// Returns the layer at `index` in a stack of `count` copper layers,
    /// counting from the top.
    #[must_use]
    pub fn in_stack(index: usize, count: usize) -> Self {
        if index == 0 {
            Self::Front
        } else if index + 1 >= count {
            Self::Back
        } else {
            #[allow(clippy::cast_possible_truncation)]
            Self::Inner(index as u32)
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Front => f.write_str("F.Cu"),
            Self::Inner(n) => write!(f, "In{n}.Cu"),
            Self::Back => f.write_str("B.Cu"),
        }
    }
}

impl FromStr for Layer {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "F.Cu" => Ok(Self::Front),
            "B.Cu" => Ok(Self::Back),
            _ => s
                .strip_prefix("In")
                .and_then(|rest| rest.strip_suffix(".Cu"))
                .and_then(|n| n.parse::<u32>().ok())
                .filter(|n| *n > 0)
                .map(Self::Inner)
                .ok_or_else(|| {
                    ConfigError::InvalidConfiguration(format!("unknown copper layer {s:?}"))
                }),
        }
    }
}

impl TryFrom<String> for Layer {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Layer> for String {
    fn from(layer: Layer) -> Self {
        layer.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for layer in [Layer::Front, Layer::Inner(3), Layer::Back] {
            assert_eq!(layer.to_string().parse::<Layer>().unwrap(), layer);
        }
        assert_eq!(Layer::Inner(12).to_string(), "In12.Cu");
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!("F.SilkS".parse::<Layer>().is_err());
        assert!("In0.Cu".parse::<Layer>().is_err());
        assert!("Inx.Cu".parse::<Layer>().is_err());
    }

    #[test]
    fn stack_positions() {
        assert_eq!(Layer::in_stack(0, 6), Layer::Front);
        assert_eq!(Layer::in_stack(1, 6), Layer::Inner(1));
        assert_eq!(Layer::in_stack(4, 6), Layer::Inner(4));
        assert_eq!(Layer::in_stack(5, 6), Layer::Back);
        assert_eq!(Layer::in_stack(1, 2), Layer::Back);
    }

    #[test]
    fn serde_uses_board_names() {
        let json = serde_json::to_string(&Layer::Inner(2)).unwrap();
        assert_eq!(json, "\"In2.Cu\"");
        let back: Layer = serde_json::from_str("\"B.Cu\"").unwrap();
        assert_eq!(back, Layer::Back);
    }
}
