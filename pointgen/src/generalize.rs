use ahash::{HashSet, HashSetExt};
use pointgen_types::geo::{GeoPoint, GeoPoint2d};
use pointgen_types::{CartesianPoint2d, Point2d};
use serde::{Deserialize, Serialize};

use crate::aggregation::aggregate;
use crate::config::GeneralizerConfig;
use crate::context::GeneralizeContext;
use crate::crossref::{attach_vgi, flag_cross_references};
use crate::error::GeneralizeError;
use crate::feature::{StationFeature, VgiFeature};
use crate::normalize::{MinMax, NormalizationRange};
use crate::property::{Property, PropertyCatalog};
use crate::registry::{CrossReference, EntryKind, FeatureRegistry, RegistryEntry};
use crate::resolution::Resolution;
use crate::symbol::{CombinedSymbol, SymbolStyle, VgiStyle};

/// Input of a generalization call.
///
/// Field names follow the JSON documents produced by the data backend, so a request can be
/// deserialized directly:
///
/// ```
/// use pointgen::GeneralizeRequest;
///
/// let request: GeneralizeRequest = serde_json::from_str(r#"{
///     "primary_property": "air_temperature",
///     "properties": [{"name_id": "air_temperature", "name": "air temperature", "unit": "°C"}],
///     "value_index": 0,
///     "resolution": 76.437
/// }"#).unwrap();
///
/// assert!(request.features.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralizeRequest {
    /// Property shown in the primary slot of every symbol.
    #[serde(default)]
    pub primary_property: Option<String>,
    /// Property catalog. The order defines the slot layout of the symbols.
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Stations to generalize.
    #[serde(default)]
    pub features: Option<Vec<StationFeature>>,
    /// Crowd-sourced observations.
    #[serde(default)]
    pub vgi_features: Option<Vec<VgiFeature>>,
    /// Time step to show.
    #[serde(default)]
    pub value_index: i64,
    /// Map resolution in map units per pixel.
    #[serde(default)]
    pub resolution: Option<f64>,
}

impl GeneralizeRequest {
    /// Creates a request without features for the first time step.
    pub fn new(
        primary_property: impl Into<String>,
        properties: Vec<Property>,
        resolution: f64,
    ) -> Self {
        Self {
            primary_property: Some(primary_property.into()),
            properties,
            resolution: Some(resolution),
            ..Default::default()
        }
    }

    /// Sets the stations to generalize.
    pub fn with_features(mut self, features: Vec<StationFeature>) -> Self {
        self.features = Some(features);
        self
    }

    /// Sets the crowd-sourced observations.
    pub fn with_vgi_features(mut self, vgi_features: Vec<VgiFeature>) -> Self {
        self.vgi_features = Some(vgi_features);
        self
    }

    /// Sets the time step to show.
    pub fn with_value_index(mut self, value_index: i64) -> Self {
        self.value_index = value_index;
        self
    }
}

/// Station or aggregate in the generalization result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneralizedFeature {
    /// Id of the station, or `agg_<id1>:<id2>` for aggregates. If that id is already taken by
    /// another feature, a `#<n>` suffix is appended.
    pub id: String,
    /// Position in projected map coordinates.
    pub projected: Point2d,
    /// Position in geographic coordinates.
    pub geodesic: GeoPoint2d,
    /// Ids of the input stations the feature covers.
    pub members: Vec<String>,
}

impl GeneralizedFeature {
    /// Returns true if the feature was created by merging stations.
    pub fn is_aggregate(&self) -> bool {
        self.members.len() > 1
    }
}

/// VGI observation that was not attached to any station symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneralizedVgiFeature {
    /// Id of the observation.
    pub id: String,
    /// Position in projected map coordinates.
    pub projected: Point2d,
    /// Position in geographic coordinates.
    pub geodesic: GeoPoint2d,
    /// Observed phenomenon.
    pub phenomenon: String,
    /// Cross-reference flag.
    pub cross_reference: Option<CrossReference>,
}

/// Result of a generalization call.
#[derive(Debug, Clone)]
pub struct Generalization {
    resolution: Option<Resolution>,
    visual_range: NormalizationRange,
    features: Vec<GeneralizedFeature>,
    vgi_features: Vec<GeneralizedVgiFeature>,
    registry: FeatureRegistry,
    min_max: MinMax,
}

impl Generalization {
    fn empty(resolution: Option<Resolution>, visual_range: NormalizationRange) -> Self {
        Self {
            resolution,
            visual_range,
            features: vec![],
            vgi_features: vec![],
            registry: FeatureRegistry::new(),
            min_max: MinMax::default(),
        }
    }

    /// Stations and aggregates to display: standalone stations first, then aggregates.
    pub fn features(&self) -> &[GeneralizedFeature] {
        &self.features
    }

    /// Observations not attached to any symbol.
    pub fn vgi_features(&self) -> &[GeneralizedVgiFeature] {
        &self.vgi_features
    }

    /// State of all features of the call, including attached observations.
    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }

    /// Resolution the generalization was computed for.
    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    /// Per-property value ranges of the input stations.
    pub fn min_max(&self) -> &MinMax {
        &self.min_max
    }

    /// Returns true if there are no features to display.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.vgi_features.is_empty()
    }

    /// Combined symbol of a feature.
    ///
    /// Returns `None` if the feature is unknown or the resolution differs from the one the
    /// generalization was computed for: the symbols are only valid at that resolution.
    pub fn style(&self, feature_id: &str, resolution: f64) -> Option<&CombinedSymbol> {
        if self.resolution? != Resolution::new(resolution)? {
            return None;
        }

        self.registry.symbol(feature_id)
    }

    /// Drawing parameters of the populated slots of a station or aggregate symbol.
    pub fn symbol_styles(&self, feature_id: &str) -> Option<Vec<SymbolStyle>> {
        self.registry
            .symbol(feature_id)
            .map(|symbol| symbol.styles(&self.min_max, self.visual_range))
    }

    /// Drawing parameters of the observations attached to a station or aggregate symbol.
    pub fn attached_vgi_styles(&self, feature_id: &str) -> Option<Vec<VgiStyle>> {
        self.registry
            .symbol(feature_id)
            .map(|symbol| symbol.vgi_styles())
    }

    /// Drawing parameters of an observation.
    pub fn vgi_style(&self, feature_id: &str) -> Option<VgiStyle> {
        match &self.registry.get(feature_id)?.kind {
            EntryKind::Vgi {
                phenomenon,
                cross_reference,
            } => Some(VgiStyle::new(feature_id, phenomenon, *cross_reference)),
            EntryKind::Symbol { .. } => None,
        }
    }
}

/// Generalization engine.
///
/// Holds only configuration: every call builds its own indices and registry, so one instance
/// can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct Generalizer {
    config: GeneralizerConfig,
}

impl Generalizer {
    /// Creates a new generalizer.
    pub fn new(config: GeneralizerConfig) -> Self {
        Self { config }
    }

    /// Configuration of the generalizer.
    pub fn config(&self) -> &GeneralizerConfig {
        &self.config
    }

    /// Generalizes the features of the request.
    ///
    /// A request without stations gives an empty result without validating the rest of the
    /// request.
    pub fn generalize(
        &self,
        request: &GeneralizeRequest,
    ) -> Result<Generalization, GeneralizeError> {
        let features = match request.features.as_deref() {
            Some(features) if !features.is_empty() => features,
            _ => {
                log::debug!("No features to generalize");
                return Ok(Generalization::empty(
                    request.resolution.and_then(Resolution::new),
                    self.config.visual_range(),
                ));
            }
        };

        let primary = request
            .primary_property
            .as_deref()
            .ok_or(GeneralizeError::MissingPrimaryProperty)?;
        let raw_resolution = request
            .resolution
            .ok_or(GeneralizeError::MissingResolution)?;
        let resolution = Resolution::new(raw_resolution)
            .ok_or(GeneralizeError::InvalidResolution(raw_resolution))?;
        let value_index = usize::try_from(request.value_index)
            .map_err(|_| GeneralizeError::InvalidValueIndex(request.value_index))?;
        let catalog = PropertyCatalog::new(&request.properties, primary)?;

        let stations = valid_stations(features);
        let min_max = MinMax::compute(&catalog, stations.iter().copied());

        let (features, vgi_features, registry) = {
            let mut ctx =
                GeneralizeContext::new(&self.config, &catalog, &min_max, resolution, value_index);
            let station_ids = register_stations(&mut ctx, &stations);
            let vgi_ids = register_vgi(
                &mut ctx,
                request.vgi_features.as_deref().unwrap_or_default(),
            );

            log::debug!(
                "Generalizing {} stations and {} VGI features at resolution {}",
                station_ids.len(),
                vgi_ids.len(),
                resolution.value()
            );

            let aggregated = aggregate(&mut ctx, &station_ids);

            flag_cross_references(&mut ctx, &vgi_ids);
            let mut output_ids = aggregated.standalone;
            output_ids.extend(aggregated.aggregates);
            let attached = attach_vgi(&mut ctx, &output_ids);
            log::debug!("Attached {attached} VGI features to station symbols");

            let features = collect_features(&ctx.registry, &output_ids);
            let vgi_features = collect_vgi_features(&ctx, &vgi_ids);
            (features, vgi_features, ctx.registry)
        };

        Ok(Generalization {
            resolution: Some(resolution),
            visual_range: self.config.visual_range(),
            features,
            vgi_features,
            registry,
            min_max,
        })
    }
}

/// Generalizes the features of the request with the default configuration.
pub fn generalize(request: &GeneralizeRequest) -> Result<Generalization, GeneralizeError> {
    Generalizer::default().generalize(request)
}

fn collect_features(registry: &FeatureRegistry, ids: &[String]) -> Vec<GeneralizedFeature> {
    ids.iter()
        .filter_map(|id| {
            let entry = registry.get(id)?;
            let EntryKind::Symbol { members, .. } = &entry.kind else {
                return None;
            };
            Some(GeneralizedFeature {
                id: id.clone(),
                projected: entry.projected,
                geodesic: entry.geodesic,
                members: members.clone(),
            })
        })
        .collect()
}

/// Observations still in the VGI index, i.e. not attached to any symbol.
fn collect_vgi_features(ctx: &GeneralizeContext, ids: &[String]) -> Vec<GeneralizedVgiFeature> {
    ids.iter()
        .filter(|id| ctx.vgi.contains(id.as_str()))
        .filter_map(|id| {
            let entry = ctx.registry.get(id)?;
            let EntryKind::Vgi {
                phenomenon,
                cross_reference,
            } = &entry.kind
            else {
                return None;
            };
            Some(GeneralizedVgiFeature {
                id: id.clone(),
                projected: entry.projected,
                geodesic: entry.geodesic,
                phenomenon: phenomenon.clone(),
                cross_reference: *cross_reference,
            })
        })
        .collect()
}

fn has_finite_position(projected: Point2d, geodesic: GeoPoint2d) -> bool {
    projected.x().is_finite()
        && projected.y().is_finite()
        && geodesic.lat().is_finite()
        && geodesic.lon().is_finite()
}

fn valid_stations(features: &[StationFeature]) -> Vec<&StationFeature> {
    let mut seen = HashSet::with_capacity(features.len());
    features
        .iter()
        .filter(|feature| {
            if !has_finite_position(feature.projected(), feature.geodesic()) {
                log::warn!("Station {} has invalid coordinates and is ignored", feature.id());
                return false;
            }

            if !seen.insert(feature.id()) {
                log::warn!("Duplicate station id {} is ignored", feature.id());
                return false;
            }

            true
        })
        .collect()
}

fn register_stations(ctx: &mut GeneralizeContext, stations: &[&StationFeature]) -> Vec<String> {
    let builder = ctx.symbol_builder();
    let mut ids = Vec::with_capacity(stations.len());

    for station in stations {
        let symbol = builder.build(station);
        let projected = station.projected();
        ctx.stations
            .insert(station.id(), projected.x(), projected.y());
        ctx.registry.insert(
            station.id(),
            RegistryEntry {
                projected,
                geodesic: station.geodesic(),
                kind: EntryKind::Symbol {
                    symbol,
                    members: vec![station.id().to_string()],
                },
            },
        );
        ids.push(station.id().to_string());
    }

    ids
}

fn register_vgi(ctx: &mut GeneralizeContext, features: &[VgiFeature]) -> Vec<String> {
    let mut ids = Vec::with_capacity(features.len());

    for feature in features {
        if !has_finite_position(feature.projected(), feature.geodesic()) {
            log::warn!("VGI feature {} has invalid coordinates and is ignored", feature.id());
            continue;
        }

        if ctx.registry.contains(feature.id()) {
            log::warn!("Duplicate feature id {} of a VGI feature is ignored", feature.id());
            continue;
        }

        let projected = feature.projected();
        ctx.vgi.insert(feature.id(), projected.x(), projected.y());
        ctx.registry.insert(
            feature.id(),
            RegistryEntry {
                projected,
                geodesic: feature.geodesic(),
                kind: EntryKind::Vgi {
                    phenomenon: feature.phenomenon().to_string(),
                    cross_reference: None,
                },
            },
        );
        ids.push(feature.id().to_string());
    }

    ids
}
