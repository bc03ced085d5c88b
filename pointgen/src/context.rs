use crate::config::GeneralizerConfig;
use crate::index::SpatialIndex;
use crate::normalize::MinMax;
use crate::property::PropertyCatalog;
use crate::registry::FeatureRegistry;
use crate::resolution::Resolution;
use crate::symbol::CombinedSymbolBuilder;

/// Mutable state of one generalization call.
///
/// Created by [`Generalizer::generalize`](crate::Generalizer::generalize) and dropped when it
/// returns (the registry is moved into the result).
pub(crate) struct GeneralizeContext<'a> {
    pub config: &'a GeneralizerConfig,
    pub catalog: &'a PropertyCatalog,
    pub min_max: &'a MinMax,
    pub resolution: Resolution,
    pub value_index: usize,
    pub registry: FeatureRegistry,
    pub stations: SpatialIndex,
    pub vgi: SpatialIndex,
}

impl<'a> GeneralizeContext<'a> {
    pub fn new(
        config: &'a GeneralizerConfig,
        catalog: &'a PropertyCatalog,
        min_max: &'a MinMax,
        resolution: Resolution,
        value_index: usize,
    ) -> Self {
        Self {
            config,
            catalog,
            min_max,
            resolution,
            value_index,
            registry: FeatureRegistry::new(),
            stations: SpatialIndex::new(),
            vgi: SpatialIndex::new(),
        }
    }

    pub fn symbol_builder(&self) -> CombinedSymbolBuilder<'a> {
        CombinedSymbolBuilder::new(
            self.catalog,
            self.min_max,
            self.config,
            self.resolution,
            self.value_index,
        )
    }
}
