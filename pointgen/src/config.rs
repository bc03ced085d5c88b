use serde::{Deserialize, Serialize};

use crate::normalize::NormalizationRange;
use crate::resolution::Resolution;

const DEFAULT_ICON_HALF_SIZE: f64 = 70.0;
const DEFAULT_MERGE_DISTANCE: f64 = 300.0;
const DEFAULT_CROSSREFERENCE_DISTANCE: f64 = 50.0;
const DEFAULT_ATTACH_DISTANCE: f64 = 100.0;
const DEFAULT_FOOTPRINT_SEGMENTS: usize = 64;

/// How distances given in screen pixels are converted into map units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceScaling {
    /// `pixels * resolution`.
    #[default]
    Exact,
    /// `pixels * trunc(resolution)`.
    Truncated,
}

impl DistanceScaling {
    /// Converts a distance in pixels into map units at the given resolution.
    pub fn to_map_units(&self, pixels: f64, resolution: Resolution) -> f64 {
        match self {
            DistanceScaling::Exact => pixels * resolution.value(),
            DistanceScaling::Truncated => pixels * resolution.truncated(),
        }
    }
}

/// Tuning parameters of the generalization.
///
/// All distances are given in screen pixels and converted into map units with the request
/// resolution (see [`DistanceScaling`]).
///
/// ```
/// use pointgen::{DistanceScaling, GeneralizerConfig};
///
/// let config = GeneralizerConfig::default()
///     .with_icon_half_size(105.0)
///     .with_distance_scaling(DistanceScaling::Truncated)
///     .with_max_merge_depth(Some(16));
///
/// assert_eq!(config.icon_half_size(), 105.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralizerConfig {
    icon_half_size: f64,
    visual_range: NormalizationRange,
    merge_distance: f64,
    crossreference_distance: f64,
    attach_distance: f64,
    distance_scaling: DistanceScaling,
    footprint_segments: usize,
    max_merge_depth: Option<usize>,
}

impl Default for GeneralizerConfig {
    fn default() -> Self {
        Self {
            icon_half_size: DEFAULT_ICON_HALF_SIZE,
            visual_range: NormalizationRange::VISUAL,
            merge_distance: DEFAULT_MERGE_DISTANCE,
            crossreference_distance: DEFAULT_CROSSREFERENCE_DISTANCE,
            attach_distance: DEFAULT_ATTACH_DISTANCE,
            distance_scaling: DistanceScaling::default(),
            footprint_segments: DEFAULT_FOOTPRINT_SEGMENTS,
            max_merge_depth: None,
        }
    }
}

impl GeneralizerConfig {
    /// Half size of the composite icon in pixels at the visual scale of `1.0`.
    ///
    /// Defaults to `70.0`.
    pub fn icon_half_size(&self) -> f64 {
        self.icon_half_size
    }

    /// Sets the half size of the composite icon in pixels.
    pub fn with_icon_half_size(mut self, icon_half_size: f64) -> Self {
        self.icon_half_size = icon_half_size;
        self
    }

    /// Range the property values are normalized into to get the icon scale.
    ///
    /// Defaults to `0.2..0.6`.
    pub fn visual_range(&self) -> NormalizationRange {
        self.visual_range
    }

    /// Sets the range of the icon scale.
    pub fn with_visual_range(mut self, visual_range: NormalizationRange) -> Self {
        self.visual_range = visual_range;
        self
    }

    /// Search radius for merge candidates in pixels. Defaults to `300.0`.
    pub fn merge_distance(&self) -> f64 {
        self.merge_distance
    }

    /// Sets the search radius for merge candidates.
    pub fn with_merge_distance(mut self, merge_distance: f64) -> Self {
        self.merge_distance = merge_distance;
        self
    }

    /// Distance in pixels within which VGI points are considered to reference each other.
    /// Defaults to `50.0`.
    pub fn crossreference_distance(&self) -> f64 {
        self.crossreference_distance
    }

    /// Sets the distance within which VGI points reference each other.
    pub fn with_crossreference_distance(mut self, crossreference_distance: f64) -> Self {
        self.crossreference_distance = crossreference_distance;
        self
    }

    /// Distance in pixels within which a VGI point is attached to a station symbol.
    /// Defaults to `100.0`.
    pub fn attach_distance(&self) -> f64 {
        self.attach_distance
    }

    /// Sets the distance within which a VGI point is attached to a station symbol.
    pub fn with_attach_distance(mut self, attach_distance: f64) -> Self {
        self.attach_distance = attach_distance;
        self
    }

    /// Conversion of pixel distances into map units. Defaults to [`DistanceScaling::Exact`].
    pub fn distance_scaling(&self) -> DistanceScaling {
        self.distance_scaling
    }

    /// Sets the conversion of pixel distances into map units.
    pub fn with_distance_scaling(mut self, distance_scaling: DistanceScaling) -> Self {
        self.distance_scaling = distance_scaling;
        self
    }

    /// Number of vertices of the polygon approximating a footprint disk. Defaults to `64`.
    pub fn footprint_segments(&self) -> usize {
        self.footprint_segments
    }

    /// Sets the number of vertices of footprint polygons. Values below 3 are treated as 3.
    pub fn with_footprint_segments(mut self, footprint_segments: usize) -> Self {
        self.footprint_segments = footprint_segments;
        self
    }

    /// Maximum number of merges chained from a single station. Unlimited by default.
    pub fn max_merge_depth(&self) -> Option<usize> {
        self.max_merge_depth
    }

    /// Sets the maximum number of merges chained from a single station.
    pub fn with_max_merge_depth(mut self, max_merge_depth: Option<usize>) -> Self {
        self.max_merge_depth = max_merge_depth;
        self
    }

    pub(crate) fn merge_distance_units(&self, resolution: Resolution) -> f64 {
        self.distance_scaling
            .to_map_units(self.merge_distance, resolution)
    }

    pub(crate) fn crossreference_distance_units(&self, resolution: Resolution) -> f64 {
        self.distance_scaling
            .to_map_units(self.crossreference_distance, resolution)
    }

    pub(crate) fn attach_distance_units(&self, resolution: Resolution) -> f64 {
        self.distance_scaling
            .to_map_units(self.attach_distance, resolution)
    }
}
