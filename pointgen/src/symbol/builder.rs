use pointgen_types::geo::GeoPoint2d;

use super::{CombinedSymbol, SlotValue};
use crate::config::GeneralizerConfig;
use crate::feature::StationFeature;
use crate::footprint::{footprint_radius, Footprint};
use crate::normalize::MinMax;
use crate::property::{Property, PropertyCatalog, Slot};
use crate::resolution::Resolution;

/// Builds combined symbols of stations for one request.
///
/// All symbols produced by the same builder share the slot layout of the catalog, so any two of
/// them can be merged with [`CombinedSymbol::aggregate`].
#[derive(Debug, Clone, Copy)]
pub struct CombinedSymbolBuilder<'a> {
    catalog: &'a PropertyCatalog,
    min_max: &'a MinMax,
    config: &'a GeneralizerConfig,
    resolution: Resolution,
    value_index: usize,
}

impl<'a> CombinedSymbolBuilder<'a> {
    /// Creates a new builder.
    pub fn new(
        catalog: &'a PropertyCatalog,
        min_max: &'a MinMax,
        config: &'a GeneralizerConfig,
        resolution: Resolution,
        value_index: usize,
    ) -> Self {
        Self {
            catalog,
            min_max,
            config,
            resolution,
            value_index,
        }
    }

    /// Builds the symbol of the station at the builder's value index, including its footprint.
    pub fn build(&self, feature: &StationFeature) -> CombinedSymbol {
        let mut primary = SlotValue::empty();
        let mut secondary = SlotValue::empty();
        let mut tertiary = SlotValue::empty();
        let mut other = vec![SlotValue::empty(); self.catalog.other_len()];

        for (property, slot) in self.catalog.iter() {
            let value = self.slot_value(feature, property);
            match slot {
                Slot::Primary => primary = value,
                Slot::Secondary => secondary = value,
                Slot::Tertiary => tertiary = value,
                Slot::Other(index) => {
                    if let Some(target) = other.get_mut(index) {
                        *target = value;
                    }
                }
            }
        }

        let scale = self.scale_of([&primary, &secondary, &tertiary].into_iter().chain(&other));
        let footprint = self.footprint(feature.geodesic(), scale);

        CombinedSymbol {
            primary,
            secondary,
            tertiary,
            other,
            vgi: vec![],
            footprint,
        }
    }

    /// Visual scale of the symbol: the largest value of its populated slots normalized into the
    /// visual range. If no slot is populated, the lower bound of the visual range.
    pub fn scale(&self, symbol: &CombinedSymbol) -> f64 {
        self.scale_of(symbol.slots().map(|(_, value)| value))
    }

    /// Rebuilds the footprint of the symbol around the given position.
    pub fn refresh_footprint(&self, symbol: &mut CombinedSymbol, center: GeoPoint2d) {
        let scale = self.scale(symbol);
        symbol.footprint = self.footprint(center, scale);
    }

    fn footprint(&self, center: GeoPoint2d, scale: f64) -> Footprint {
        let radius = footprint_radius(scale, self.config.icon_half_size(), self.resolution);
        Footprint::new(center, radius, self.config.footprint_segments())
    }

    fn scale_of<'s>(&self, slots: impl IntoIterator<Item = &'s SlotValue>) -> f64 {
        let visual_range = self.config.visual_range();
        slots
            .into_iter()
            .filter_map(|slot| match (&slot.property, slot.value) {
                (Some(property), Some(value)) if value.is_finite() => {
                    Some(self.min_max.normalize(property, value, visual_range))
                }
                _ => None,
            })
            .reduce(f64::max)
            .unwrap_or(visual_range.min)
    }

    fn slot_value(&self, feature: &StationFeature, property: &Property) -> SlotValue {
        let Some(series) = feature.series(&property.name_id) else {
            return SlotValue::empty();
        };

        SlotValue {
            property: Some(property.name_id.clone()),
            value: series.value_at(self.value_index),
            anomaly_value: series.anomaly_at(self.value_index),
            anomaly_pct80: series.anomaly_percentile_80,
            anomaly_pct95: series.anomaly_percentile_95,
            grouped: false,
        }
    }
}
