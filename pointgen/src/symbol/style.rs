use serde::Serialize;

use super::{CombinedSymbol, SlotValue};
use crate::normalize::{MinMax, NormalizationRange};
use crate::property::Slot;
use crate::registry::CrossReference;

const LOW_ANOMALY_THRESHOLD: f64 = 0.5;
const HIGH_ANOMALY_THRESHOLD: f64 = 2.5;
const VGI_SYMBOL_SCALE: f64 = 0.25;

/// How unusual an observed value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AnomalyInterval {
    /// Usual value.
    Middle,
    /// Somewhat unusual value.
    Low,
    /// Highly unusual value.
    High,
}

impl AnomalyInterval {
    /// Classifies an anomaly rate.
    ///
    /// If both percentiles of the series are known, values below the 80th percentile are
    /// [`Middle`](Self::Middle) and values below the 95th percentile are [`Low`](Self::Low).
    /// Otherwise fixed thresholds of `0.5` and `2.5` are used.
    pub fn classify(anomaly: f64, pct80: Option<f64>, pct95: Option<f64>) -> Self {
        let (low, high) = match (pct80, pct95) {
            (Some(pct80), Some(pct95)) => (pct80, pct95),
            _ => (LOW_ANOMALY_THRESHOLD, HIGH_ANOMALY_THRESHOLD),
        };

        if anomaly < low {
            Self::Middle
        } else if anomaly < high {
            Self::Low
        } else {
            Self::High
        }
    }

    fn of_slot(slot: &SlotValue) -> Option<Self> {
        slot.anomaly_value
            .map(|anomaly| Self::classify(anomaly, slot.anomaly_pct80, slot.anomaly_pct95))
    }
}

/// Drawing parameters of one slot of a composite icon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolStyle {
    /// Slot the icon part is drawn in.
    pub slot: Slot,
    /// Anchor of the icon part, see [`Slot::anchor`].
    pub anchor: [f64; 2],
    /// Property shown.
    pub property: String,
    /// Anomaly interval of the shown value. `None` if the anomaly rate is not known.
    pub interval: Option<AnomalyInterval>,
    /// Icon scale: the value normalized into the visual range.
    pub scale: f64,
    /// The value was chosen from several merged stations.
    pub grouped: bool,
}

/// Drawing parameters of a VGI observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VgiStyle {
    /// Id of the observation.
    pub feature_id: String,
    /// Observed phenomenon, used to pick the icon.
    pub phenomenon: String,
    /// Cross-reference flag of the observation.
    pub cross_reference: Option<CrossReference>,
    /// Icon scale.
    pub scale: f64,
}

impl VgiStyle {
    /// Creates a style with the default VGI icon scale.
    pub fn new(
        feature_id: impl Into<String>,
        phenomenon: impl Into<String>,
        cross_reference: Option<CrossReference>,
    ) -> Self {
        Self {
            feature_id: feature_id.into(),
            phenomenon: phenomenon.into(),
            cross_reference,
            scale: VGI_SYMBOL_SCALE,
        }
    }
}

impl CombinedSymbol {
    /// Drawing parameters of every populated slot of the symbol, primary slot first.
    pub fn styles(&self, min_max: &MinMax, visual_range: NormalizationRange) -> Vec<SymbolStyle> {
        self.slots()
            .filter_map(|(slot, value)| {
                let property = value.property.as_ref()?;
                let raw = value.value.filter(|v| v.is_finite())?;
                Some(SymbolStyle {
                    slot,
                    anchor: slot.anchor(),
                    property: property.clone(),
                    interval: AnomalyInterval::of_slot(value),
                    scale: min_max.normalize(property, raw, visual_range),
                    grouped: value.grouped,
                })
            })
            .collect()
    }

    /// Drawing parameters of the VGI observations attached to the symbol.
    pub fn vgi_styles(&self) -> Vec<VgiStyle> {
        self.vgi
            .iter()
            .map(|vgi| VgiStyle::new(&vgi.feature_id, &vgi.phenomenon, vgi.cross_reference))
            .collect()
    }
}
