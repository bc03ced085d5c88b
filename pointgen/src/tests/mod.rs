use geo::{HaversineDestination, Point};
use pointgen_types::geo::{GeoPoint, GeoPoint2d, NewGeoPoint};
use pointgen_types::latlon;

use crate::feature::{PropertySeries, StationFeature};
use crate::property::{Property, PropertyCatalog};

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn catalog_properties() -> Vec<Property> {
    vec![
        Property::new("air_temperature", "air temperature", "°C"),
        Property::new("pm10", "PM10", "µg/m³"),
        Property::new("precipitation", "precipitation", "mm"),
        Property::new("stream_flow", "stream flow", "m³/s"),
        Property::new("soil_temperature", "soil temperature", "°C"),
    ]
}

pub(crate) fn catalog(primary: &str) -> PropertyCatalog {
    PropertyCatalog::new(&catalog_properties(), primary).expect("invalid test catalog")
}

pub(crate) fn station_at(id: &str, lat: f64, lon: f64) -> StationFeature {
    StationFeature::new(id, latlon!(lat, lon)).expect("invalid station position")
}

/// Point `meters` east of the given one along the haversine great circle.
pub(crate) fn offset_east(point: GeoPoint2d, meters: f64) -> GeoPoint2d {
    let destination = Point::new(point.lon(), point.lat()).haversine_destination(90.0, meters);
    GeoPoint2d::lonlat(destination.x(), destination.y())
}

/// Station `meters` east of the origin observing air temperature at one time step.
pub(crate) fn temperature_station(id: &str, meters: f64, value: f64, anomaly: f64) -> StationFeature {
    let position = offset_east(latlon!(0.0, 0.0), meters);
    StationFeature::new(id, position)
        .expect("invalid station position")
        .with_series("air_temperature", PropertySeries::new(vec![value], vec![anomaly]))
}
