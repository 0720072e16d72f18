pub mod spiral;
pub mod stackup;
pub mod turn;
pub mod via_strip;
pub mod winding;

pub use spiral::{turn_radii, Spiral, SpiralParams, SpiralTrace, TurnBounds};
pub use stackup::Stackup;
pub use turn::{
    gap_angle, termination_angle, BottomTurn, InnerTurn, TopTurn, Turn, TurnKind, TurnParams,
};
pub use via_strip::ViaStrip;
pub use winding::{Transition, Winding, WindingLayout, WindingParams};
