//! Points in geographic coordinates (latitude and longitude) (see [`GeoPoint`]) and conversion
//! between projected and geographic coordinates (see [`Projection`]).

mod datum;
mod point;
mod projection;

pub use datum::Datum;
pub use point::{GeoPoint, GeoPoint2d, NewGeoPoint};
pub use projection::{Projection, WebMercator};
