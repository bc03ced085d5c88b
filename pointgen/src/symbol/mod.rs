//! Combined symbols: composite icons describing all properties of a feature at one time step.
//!
//! A [`CombinedSymbol`] has one [`SlotValue`] per catalog property, laid out by the slot the
//! [`PropertyCatalog`](crate::PropertyCatalog) assigned to the property. The symbol is the only
//! thing a renderer needs to draw a feature: see [`CombinedSymbol::styles`] for the per-slot
//! drawing parameters.

mod builder;
mod style;

pub use builder::CombinedSymbolBuilder;
pub use style::{AnomalyInterval, SymbolStyle, VgiStyle};

use serde::Serialize;

use crate::footprint::Footprint;
use crate::property::Slot;
use crate::registry::CrossReference;

/// Value of one slot of a combined symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlotValue {
    /// Property shown in the slot. `None` if the feature has no data for the property owning
    /// this slot position.
    pub property: Option<String>,
    /// Property value at the requested time step.
    pub value: Option<f64>,
    /// Anomaly rate at the requested time step.
    pub anomaly_value: Option<f64>,
    /// 80th percentile of the anomaly rates of the property series.
    pub anomaly_pct80: Option<f64>,
    /// 95th percentile of the anomaly rates of the property series.
    pub anomaly_pct95: Option<f64>,
    /// Set when the slot shows a value chosen from several merged features.
    pub grouped: bool,
}

impl SlotValue {
    /// Slot without data.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if the slot has a property and a value to show.
    pub fn is_populated(&self) -> bool {
        self.property.is_some() && self.value.is_some()
    }
}

/// Picks the slot value to keep when two features are merged.
///
/// * If only one side has a property, that side is returned unchanged.
/// * If neither side has a property, `a` is returned unchanged.
/// * Otherwise the side with the larger anomaly value wins (`a` on ties, a missing anomaly value
///   loses against any present one) and is marked as [`grouped`](SlotValue::grouped).
///
/// The most anomalous reading is kept rather than the largest value, so that an aggregate
/// surfaces the most unusual observation among the merged stations.
pub fn compare_symbols(a: SlotValue, b: SlotValue) -> SlotValue {
    match (a.property.is_some(), b.property.is_some()) {
        (false, true) => b,
        (true, false) | (false, false) => a,
        (true, true) => {
            let mut winner = if a.anomaly_value < b.anomaly_value {
                b
            } else {
                a
            };
            winner.grouped = true;
            winner
        }
    }
}

/// Crowd-sourced observation attached to a station or aggregate symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VgiSymbol {
    /// Id of the VGI feature.
    pub feature_id: String,
    /// Observed phenomenon.
    pub phenomenon: String,
    /// Cross-reference flag of the VGI feature at the time of attachment.
    pub cross_reference: Option<CrossReference>,
}

/// Composite symbol of a feature.
///
/// The slot layout is fixed by the property catalog: `other` always has one entry per remaining
/// catalog property and never grows. VGI observations attached to the feature are kept in
/// [`vgi`](Self::vgi), not in `other`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedSymbol {
    /// Slot of the primary property.
    pub primary: SlotValue,
    /// Slot of the first non-primary catalog property.
    pub secondary: SlotValue,
    /// Slot of the second non-primary catalog property.
    pub tertiary: SlotValue,
    /// Slots of the remaining catalog properties, in catalog order.
    pub other: Vec<SlotValue>,
    /// Attached VGI observations, drawn in the "other" position of the icon.
    pub vgi: Vec<VgiSymbol>,
    /// Area the rendered symbol occupies.
    pub footprint: Footprint,
}

impl CombinedSymbol {
    /// Iterates over all property slots with their positions.
    pub fn slots(&self) -> impl Iterator<Item = (Slot, &SlotValue)> + '_ {
        [
            (Slot::Primary, &self.primary),
            (Slot::Secondary, &self.secondary),
            (Slot::Tertiary, &self.tertiary),
        ]
        .into_iter()
        .chain(
            self.other
                .iter()
                .enumerate()
                .map(|(index, value)| (Slot::Other(index), value)),
        )
    }

    /// Returns the value of the given slot.
    pub fn slot(&self, slot: Slot) -> Option<&SlotValue> {
        match slot {
            Slot::Primary => Some(&self.primary),
            Slot::Secondary => Some(&self.secondary),
            Slot::Tertiary => Some(&self.tertiary),
            Slot::Other(index) => self.other.get(index),
        }
    }

    /// Merges the other symbol into this one slot by slot using [`compare_symbols`].
    ///
    /// Both symbols must be built from the same property catalog. VGI attachments of both
    /// symbols are kept. The footprint is not changed: it must be rebuilt by the caller for the
    /// position of the merged feature.
    pub fn aggregate(&mut self, other: CombinedSymbol) {
        let CombinedSymbol {
            primary,
            secondary,
            tertiary,
            other: other_slots,
            vgi,
            footprint: _,
        } = other;

        self.primary = compare_symbols(std::mem::take(&mut self.primary), primary);
        self.secondary = compare_symbols(std::mem::take(&mut self.secondary), secondary);
        self.tertiary = compare_symbols(std::mem::take(&mut self.tertiary), tertiary);

        debug_assert_eq!(self.other.len(), other_slots.len());
        for (own, theirs) in self.other.iter_mut().zip(other_slots) {
            *own = compare_symbols(std::mem::take(own), theirs);
        }

        self.vgi.extend(vgi);
    }
}
