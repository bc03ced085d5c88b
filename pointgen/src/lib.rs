//! Pointgen generalizes dense sets of geo-located time-series measurement points (weather
//! stations and similar) into a reduced set of non-overlapping composite symbols suitable for
//! display at a given map resolution.
//!
//! # Overview
//!
//! Every station carries a time series per observed property. For the selected time step the
//! engine builds a [`CombinedSymbol`] for each station: a composite icon with a fixed slot per
//! catalog property (primary, secondary, tertiary and the list of "other" slots). The on-screen
//! size of the icon is turned into a real-world [`Footprint`] around the station, and stations
//! whose footprints overlap are merged into aggregates, keeping the most anomalous reading of
//! each slot. Finally, crowd-sourced ("VGI") observations are flagged when they cluster and are
//! attached to the nearest station symbol.
//!
//! ```
//! use pointgen::{GeneralizeRequest, Generalizer, Property, PropertySeries, StationFeature};
//! use pointgen::pointgen_types::latlon;
//!
//! let station = StationFeature::new("brno", latlon!(49.2, 16.6))
//!     .unwrap()
//!     .with_series("air_temperature", PropertySeries::new(vec![12.5], vec![0.3]));
//!
//! let request = GeneralizeRequest::new(
//!     "air_temperature",
//!     vec![Property::new("air_temperature", "air temperature", "°C")],
//!     76.437,
//! )
//! .with_features(vec![station]);
//!
//! let generalization = Generalizer::default().generalize(&request).unwrap();
//! assert_eq!(generalization.features().len(), 1);
//! ```
//!
//! All state of a single call (spatial indices, feature registry, normalization ranges) lives
//! inside that call, so one [`Generalizer`] may be shared between threads.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

mod aggregation;
mod config;
mod context;
mod crossref;
pub mod error;
mod feature;
mod footprint;
mod generalize;
pub mod index;
mod normalize;
mod property;
mod registry;
mod resolution;
pub mod symbol;

#[cfg(test)]
mod tests;

pub use aggregation::find_intersection;
pub use config::{DistanceScaling, GeneralizerConfig};
pub use error::GeneralizeError;
pub use feature::{PropertySeries, StationFeature, VgiFeature};
pub use footprint::{footprint_radius, Footprint};
pub use generalize::{
    generalize, GeneralizeRequest, Generalization, GeneralizedFeature, GeneralizedVgiFeature,
    Generalizer,
};
pub use normalize::{normalize, MinMax, NormalizationRange, ValueRange};
pub use property::{Property, PropertyCatalog, Slot};
pub use registry::{CrossReference, EntryKind, FeatureRegistry, RegistryEntry};
pub use resolution::Resolution;
pub use symbol::{CombinedSymbol, SlotValue, VgiSymbol};

// Reexport pointgen_types
pub use pointgen_types;
