//! Real-world area covered by a rendered symbol.

use geo::{Coord, HaversineDestination, Intersects, LineString, Point, Polygon};
use pointgen_types::geo::{GeoPoint, GeoPoint2d};
use serde::Serialize;

use crate::resolution::Resolution;

/// Radius in metres of the disk covered by a composite icon.
///
/// `scale` is the visual scale of the icon and `icon_half_size` is the half size of the icon in
/// pixels at scale `1.0`. The icon is a square, so its diagonal is used.
pub fn footprint_radius(scale: f64, icon_half_size: f64, resolution: Resolution) -> f64 {
    icon_half_size * scale * std::f64::consts::SQRT_2 * resolution.value()
}

/// Real-world area occupied by a rendered symbol: a geodesic disk around the feature position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footprint {
    center: GeoPoint2d,
    radius: f64,
    #[serde(skip)]
    polygon: Polygon<f64>,
}

impl Footprint {
    /// Creates a disk with the given radius in metres, approximated by a polygon with `segments`
    /// vertices (at least 3).
    pub fn new(center: GeoPoint2d, radius: f64, segments: usize) -> Self {
        let segments = segments.max(3);
        let origin = Point::new(center.lon(), center.lat());
        let ring: Vec<Coord<f64>> = (0..segments)
            .map(|i| {
                let bearing = 360.0 * i as f64 / segments as f64;
                origin.haversine_destination(bearing, radius).0
            })
            .collect();

        Self {
            center,
            radius,
            polygon: Polygon::new(LineString::new(ring), vec![]),
        }
    }

    /// Center of the disk.
    pub fn center(&self) -> GeoPoint2d {
        self.center
    }

    /// Radius of the disk in metres.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Polygon approximating the disk, in longitude/latitude degrees.
    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// Returns true if the two footprints overlap.
    pub fn intersects(&self, other: &Footprint) -> bool {
        self.polygon.intersects(&other.polygon)
    }
}
