use ahash::{HashMap, HashMapExt};
use serde::{Deserialize, Serialize};

use crate::feature::StationFeature;
use crate::property::PropertyCatalog;

/// Target range of [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl NormalizationRange {
    /// `0.0..1.0` range used for statistics.
    pub const UNIT: Self = Self { min: 0.0, max: 1.0 };
    /// `0.2..0.6` range used for icon scaling.
    pub const VISUAL: Self = Self { min: 0.2, max: 0.6 };

    /// Creates a new range.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Middle of the range.
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Linearly maps `value` from `min..max` into the target range.
///
/// If `min == max` the midpoint of the target range is returned for any value.
///
/// ```
/// use pointgen::{normalize, NormalizationRange};
///
/// assert_eq!(normalize(5.0, 0.0, 10.0, NormalizationRange::UNIT), 0.5);
/// assert_eq!(normalize(3.0, 2.0, 2.0, NormalizationRange::VISUAL), 0.4);
/// ```
pub fn normalize(value: f64, min: f64, max: f64, range: NormalizationRange) -> f64 {
    if min == max {
        return range.midpoint();
    }

    (value - min) / (max - min) * (range.max - range.min) + range.min
}

/// Minimum and maximum of a property over a station batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Smallest observed value.
    pub min: f64,
    /// Largest observed value.
    pub max: f64,
}

impl ValueRange {
    fn include(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// Per-property value ranges of a station batch.
///
/// Computed once per request from the input stations and used to scale every symbol of that
/// request, including the symbols of aggregates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MinMax {
    ranges: HashMap<String, ValueRange>,
}

impl MinMax {
    /// Scans all values of all catalog properties of the given stations.
    ///
    /// Non-finite values are skipped. Properties no station has a finite value for get no
    /// range.
    pub fn compute<'a>(
        catalog: &PropertyCatalog,
        features: impl IntoIterator<Item = &'a StationFeature>,
    ) -> Self {
        let mut ranges: HashMap<String, ValueRange> = HashMap::new();
        let mut skipped = 0usize;

        for feature in features {
            for (property, _) in catalog.iter() {
                let Some(series) = feature.series(&property.name_id) else {
                    continue;
                };

                for value in series.values.iter().copied() {
                    if !value.is_finite() {
                        skipped += 1;
                        continue;
                    }

                    ranges
                        .entry(property.name_id.clone())
                        .and_modify(|range| range.include(value))
                        .or_insert(ValueRange {
                            min: value,
                            max: value,
                        });
                }
            }
        }

        if skipped > 0 {
            log::warn!("{skipped} non-finite values were ignored when computing value ranges");
        }

        Self { ranges }
    }

    /// Value range of the property.
    pub fn get(&self, name_id: &str) -> Option<ValueRange> {
        self.ranges.get(name_id).copied()
    }

    /// Normalizes a value of the property into the target range.
    ///
    /// For a property without a known range the midpoint of the target range is returned.
    pub fn normalize(&self, name_id: &str, value: f64, range: NormalizationRange) -> f64 {
        match self.get(name_id) {
            Some(ValueRange { min, max }) => normalize(value, min, max, range),
            None => range.midpoint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::feature::PropertySeries;
    use crate::tests::{catalog, station_at};

    #[test]
    fn normalize_into_unit_range() {
        assert_eq!(
            normalize(4.35, 0.033, 17.967, NormalizationRange::UNIT),
            0.24071595851455335
        );
        assert_eq!(normalize(0.033, 0.033, 17.967, NormalizationRange::UNIT), 0.0);
        assert_eq!(normalize(17.967, 0.033, 17.967, NormalizationRange::UNIT), 1.0);
    }

    #[test]
    fn normalize_into_visual_range() {
        assert_relative_eq!(normalize(0.0, 0.0, 10.0, NormalizationRange::VISUAL), 0.2);
        assert_relative_eq!(normalize(10.0, 0.0, 10.0, NormalizationRange::VISUAL), 0.6);
        assert_relative_eq!(normalize(2.5, 0.0, 10.0, NormalizationRange::VISUAL), 0.3);
    }

    #[test]
    fn degenerate_range_gives_midpoint() {
        for value in [-100.0, 0.0, 3.0, 1e9] {
            assert_eq!(normalize(value, 3.0, 3.0, NormalizationRange::UNIT), 0.5);
            assert_eq!(normalize(value, 3.0, 3.0, NormalizationRange::VISUAL), 0.4);
            assert_eq!(normalize(value, 3.0, 3.0, NormalizationRange::new(1.0, 2.0)), 1.5);
        }
    }

    #[test]
    fn min_max_over_batch() {
        let catalog = catalog("air_temperature");
        let features = [
            station_at("a", 49.0, 16.0).with_series(
                "air_temperature",
                PropertySeries::new(vec![3.0, -2.5, 7.0], vec![0.0; 3]),
            ),
            station_at("b", 49.1, 16.0)
                .with_series(
                    "air_temperature",
                    PropertySeries::new(vec![11.0, f64::NAN], vec![0.0; 2]),
                )
                .with_series("pm10", PropertySeries::new(vec![20.0], vec![0.0])),
            station_at("c", 49.2, 16.0)
                .with_series("wind_speed", PropertySeries::new(vec![100.0], vec![0.0])),
        ];

        let min_max = MinMax::compute(&catalog, &features);
        assert_eq!(
            min_max.get("air_temperature"),
            Some(ValueRange {
                min: -2.5,
                max: 11.0
            })
        );
        assert_eq!(
            min_max.get("pm10"),
            Some(ValueRange {
                min: 20.0,
                max: 20.0
            })
        );
        assert_eq!(min_max.get("precipitation"), None);
        assert_eq!(min_max.get("wind_speed"), None);

        assert_relative_eq!(
            min_max.normalize("air_temperature", 11.0, NormalizationRange::VISUAL),
            0.6
        );
        assert_eq!(
            min_max.normalize("pm10", 20.0, NormalizationRange::VISUAL),
            0.4
        );
        assert_eq!(
            min_max.normalize("precipitation", 1.0, NormalizationRange::UNIT),
            0.5
        );
    }
}
