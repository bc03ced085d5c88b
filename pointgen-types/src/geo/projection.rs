use std::marker::PhantomData;

use crate::cartesian::NewCartesianPoint2d;
use crate::geo::datum::Datum;
use crate::geo::point::NewGeoPoint;

/// Conversion between two coordinate spaces.
pub trait Projection {
    /// Point type in the source space.
    type InPoint;
    /// Point type in the target space.
    type OutPoint;

    /// Projects a point. Returns `None` if the point cannot be projected.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Converts a projected point back. Returns `None` if the point cannot be converted.
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}

/// Spherical Web Mercator projection (EPSG:3857).
#[derive(Debug, Copy, Clone)]
pub struct WebMercator<In, Out> {
    datum: Datum,
    phantom_in: PhantomData<In>,
    phantom_out: PhantomData<Out>,
}

impl<In, Out> WebMercator<In, Out> {
    /// Creates a projection using the given datum.
    pub fn new(datum: Datum) -> Self {
        Self {
            datum,
            phantom_in: Default::default(),
            phantom_out: Default::default(),
        }
    }
}

impl<In, Out> Default for WebMercator<In, Out> {
    fn default() -> Self {
        Self::new(Datum::WGS84)
    }
}

impl<In: NewGeoPoint<f64>, Out: NewCartesianPoint2d<f64>> Projection for WebMercator<In, Out> {
    type InPoint = In;
    type OutPoint = Out;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        let x = self.datum.semimajor() * input.lon_rad();
        let y = self.datum.semimajor()
            * (std::f64::consts::FRAC_PI_4 + input.lat_rad() / 2.0)
                .tan()
                .ln();

        if x.is_finite() && y.is_finite() {
            Some(Self::OutPoint::new(x, y))
        } else {
            None
        }
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        let lat = 2.0 * (input.y() / self.datum.semimajor()).exp().atan()
            - std::f64::consts::FRAC_PI_2;
        let lon = input.x() / self.datum.semimajor();

        if lat.is_finite() && lon.is_finite() {
            Some(Self::InPoint::latlon(lat.to_degrees(), lon.to_degrees()))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::cartesian::{CartesianPoint2d, Point2d};
    use crate::geo::point::{GeoPoint, GeoPoint2d};
    use crate::latlon;

    #[test]
    fn project_and_back() {
        let projection: WebMercator<GeoPoint2d, Point2d> = WebMercator::default();
        let brno = latlon!(49.2002211, 16.6078411);

        let projected = projection.project(&brno).unwrap();
        assert_relative_eq!(projected.x(), 1_848_776.414, epsilon = 1e-2);
        assert_relative_eq!(projected.y(), 6_308_903.265, epsilon = 1e-2);

        let unprojected = projection.unproject(&projected).unwrap();
        assert_relative_eq!(unprojected.lat(), brno.lat(), epsilon = 1e-9);
        assert_relative_eq!(unprojected.lon(), brno.lon(), epsilon = 1e-9);
    }

    #[test]
    fn origin_maps_to_zero() {
        let projection: WebMercator<GeoPoint2d, Point2d> = WebMercator::default();
        let origin = projection.unproject(&Point2d::new(0.0, 0.0)).unwrap();
        assert_relative_eq!(origin.lat(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(origin.lon(), 0.0, epsilon = 1e-12);
    }
}
