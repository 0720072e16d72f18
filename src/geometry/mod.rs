pub mod arc;
pub mod fillet;
pub mod layer;
pub mod polygon;
pub mod via;

pub use arc::{arc_from_polar, Arc, ArcGeometry};
pub use fillet::{find_smoothing_arc, round_corner, smooth_polygon};
pub use layer::Layer;
pub use polygon::{Fill, Polygon, PolygonBuilder, Segment};
pub use via::{Via, ViaParams};
