//! Point types shared by the `pointgen` generalization engine.
//!
//! Features handled by the engine carry two coordinates: a projected one (map units, used for
//! spatial indexing and midpoints) and a geographic one (degrees, used to build real-world
//! footprints). This crate provides both point flavours and the [`WebMercator`](geo::WebMercator)
//! projection connecting them.

pub mod cartesian;
pub mod geo;

pub use cartesian::{CartesianPoint2d, NewCartesianPoint2d, Point2d};
