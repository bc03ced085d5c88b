use ahash::{HashMap, HashMapExt};
use pointgen_types::geo::{GeoPoint2d, Projection, WebMercator};
use pointgen_types::Point2d;
use serde::{Deserialize, Serialize};

/// Time series of one property observed by a station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySeries {
    /// Observed values.
    pub values: Vec<f64>,
    /// Anomaly rate of each observed value.
    #[serde(default)]
    pub anomaly_rates: Vec<f64>,
    /// Offset added to the requested value index before reading this series.
    #[serde(default)]
    pub value_index_shift: i32,
    /// 80th percentile of the anomaly rates.
    #[serde(default)]
    pub anomaly_percentile_80: Option<f64>,
    /// 95th percentile of the anomaly rates.
    #[serde(default)]
    pub anomaly_percentile_95: Option<f64>,
}

impl PropertySeries {
    /// Creates a series with no index shift and no percentiles.
    pub fn new(values: Vec<f64>, anomaly_rates: Vec<f64>) -> Self {
        Self {
            values,
            anomaly_rates,
            ..Default::default()
        }
    }

    /// Sets the value index shift of the series.
    pub fn with_shift(mut self, value_index_shift: i32) -> Self {
        self.value_index_shift = value_index_shift;
        self
    }

    /// Sets the anomaly rate percentiles of the series.
    pub fn with_percentiles(mut self, percentile_80: f64, percentile_95: f64) -> Self {
        self.anomaly_percentile_80 = Some(percentile_80);
        self.anomaly_percentile_95 = Some(percentile_95);
        self
    }

    /// Index into the series arrays for the requested value index, if it is not negative.
    fn shifted(&self, value_index: usize) -> Option<usize> {
        let index = value_index as i64 + self.value_index_shift as i64;
        usize::try_from(index).ok()
    }

    /// Value at the requested value index (with the series shift applied).
    pub fn value_at(&self, value_index: usize) -> Option<f64> {
        self.values.get(self.shifted(value_index)?).copied()
    }

    /// Anomaly rate at the requested value index (with the series shift applied).
    pub fn anomaly_at(&self, value_index: usize) -> Option<f64> {
        self.anomaly_rates.get(self.shifted(value_index)?).copied()
    }
}

/// Measurement station: a point with a time series for each observed property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationFeature {
    id: String,
    projected: Point2d,
    geodesic: GeoPoint2d,
    #[serde(default)]
    series: HashMap<String, PropertySeries>,
}

impl StationFeature {
    /// Creates a station at the given geographic position. The projected coordinate is
    /// computed with the Web Mercator projection.
    ///
    /// Returns `None` if the position cannot be projected.
    pub fn new(id: impl Into<String>, geodesic: GeoPoint2d) -> Option<Self> {
        let projected = WebMercator::default().project(&geodesic)?;
        Some(Self::with_coordinates(id, projected, geodesic))
    }

    /// Creates a station at the given Web Mercator position.
    ///
    /// Returns `None` if the position cannot be converted into geographic coordinates.
    pub fn from_projected(id: impl Into<String>, projected: Point2d) -> Option<Self> {
        let geodesic = WebMercator::default().unproject(&projected)?;
        Some(Self::with_coordinates(id, projected, geodesic))
    }

    /// Creates a station with both coordinates given explicitly.
    pub fn with_coordinates(id: impl Into<String>, projected: Point2d, geodesic: GeoPoint2d) -> Self {
        Self {
            id: id.into(),
            projected,
            geodesic,
            series: HashMap::new(),
        }
    }

    /// Adds a time series of the given property.
    pub fn with_series(mut self, name_id: impl Into<String>, series: PropertySeries) -> Self {
        self.series.insert(name_id.into(), series);
        self
    }

    /// Id of the station.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Position in projected map coordinates.
    pub fn projected(&self) -> Point2d {
        self.projected
    }

    /// Position in geographic coordinates.
    pub fn geodesic(&self) -> GeoPoint2d {
        self.geodesic
    }

    /// Time series of the given property, if the station observes it.
    pub fn series(&self, name_id: &str) -> Option<&PropertySeries> {
        self.series.get(name_id)
    }

    /// Returns true if the station observes the given property.
    pub fn has_property(&self, name_id: &str) -> bool {
        self.series.contains_key(name_id)
    }
}

/// Crowd-sourced (volunteered) observation of a phenomenon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VgiFeature {
    id: String,
    projected: Point2d,
    geodesic: GeoPoint2d,
    phenomenon: String,
}

impl VgiFeature {
    /// Creates an observation at the given geographic position. The projected coordinate is
    /// computed with the Web Mercator projection.
    ///
    /// Returns `None` if the position cannot be projected.
    pub fn new(
        id: impl Into<String>,
        geodesic: GeoPoint2d,
        phenomenon: impl Into<String>,
    ) -> Option<Self> {
        let projected = WebMercator::default().project(&geodesic)?;
        Some(Self {
            id: id.into(),
            projected,
            geodesic,
            phenomenon: phenomenon.into(),
        })
    }

    /// Id of the observation.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Position in projected map coordinates.
    pub fn projected(&self) -> Point2d {
        self.projected
    }

    /// Position in geographic coordinates.
    pub fn geodesic(&self) -> GeoPoint2d {
        self.geodesic
    }

    /// Name of the observed phenomenon, e.g. "Dry vegetation (trees)".
    pub fn phenomenon(&self) -> &str {
        &self.phenomenon
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use pointgen_types::geo::GeoPoint;
    use pointgen_types::{latlon, CartesianPoint2d};

    use super::*;

    #[test]
    fn shifted_values() {
        let series = PropertySeries::new(vec![1.0, 2.0, 3.0], vec![0.1, 0.2]);
        assert_eq!(series.value_at(0), Some(1.0));
        assert_eq!(series.anomaly_at(1), Some(0.2));
        assert_eq!(series.anomaly_at(2), None);
        assert_eq!(series.value_at(3), None);

        let series = series.with_shift(-1);
        assert_eq!(series.value_at(0), None);
        assert_eq!(series.value_at(1), Some(1.0));
        assert_eq!(series.value_at(3), Some(3.0));

        let series = PropertySeries::new(vec![1.0, 2.0, 3.0], vec![]).with_shift(2);
        assert_eq!(series.value_at(0), Some(3.0));
        assert_eq!(series.value_at(1), None);
        assert_eq!(series.anomaly_at(0), None);
    }

    #[test]
    fn station_coordinates() {
        let station = StationFeature::new("s1", latlon!(49.2, 16.6)).unwrap();
        let back = StationFeature::from_projected("s1", station.projected()).unwrap();

        assert_relative_eq!(back.geodesic().lat(), 49.2, epsilon = 1e-9);
        assert_relative_eq!(back.geodesic().lon(), 16.6, epsilon = 1e-9);
        assert_relative_eq!(back.projected().x(), station.projected().x());
    }

    #[test]
    fn station_deserialization() {
        let station: StationFeature = serde_json::from_str(
            r#"{
                "id": "brno_1",
                "projected": [1848776.4, 6308903.3],
                "geodesic": {"lat": 49.2002211, "lon": 16.6078411},
                "series": {
                    "air_temperature": {
                        "values": [12.0, 13.5],
                        "anomaly_rates": [0.2, 3.1],
                        "value_index_shift": 1,
                        "anomaly_percentile_80": 1.2,
                        "anomaly_percentile_95": 2.8
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(station.id(), "brno_1");
        assert!(station.has_property("air_temperature"));
        assert!(!station.has_property("pm10"));

        let series = station.series("air_temperature").unwrap();
        assert_eq!(series.value_at(0), Some(13.5));
        assert_eq!(series.anomaly_percentile_95, Some(2.8));
    }
}
