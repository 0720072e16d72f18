pub mod error;
pub mod geometry;
pub mod ident;
pub mod math;
pub mod windings;

pub use error::{CoilError, Result};
