//! Per-call table of feature state.

use ahash::{HashMap, HashMapExt};
use pointgen_types::geo::GeoPoint2d;
use pointgen_types::Point2d;
use serde::{Deserialize, Serialize};

use crate::symbol::CombinedSymbol;

/// Marks a VGI observation that has other observations close to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrossReference {
    /// One other observation is nearby.
    One,
    /// At least two other observations are nearby.
    Many,
}

/// State of a registered feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EntryKind {
    /// Station or aggregate of stations.
    Symbol {
        /// Combined symbol of the feature.
        symbol: CombinedSymbol,
        /// Ids of the input stations the feature covers.
        members: Vec<String>,
    },
    /// VGI observation.
    Vgi {
        /// Observed phenomenon.
        phenomenon: String,
        /// Cross-reference flag.
        cross_reference: Option<CrossReference>,
    },
}

/// Registered feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryEntry {
    /// Position in projected map coordinates.
    pub projected: Point2d,
    /// Position in geographic coordinates.
    pub geodesic: GeoPoint2d,
    /// State of the feature.
    pub kind: EntryKind,
}

/// Lookup table from feature id to the state derived during one generalization call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeatureRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl FeatureRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Adds an entry. Returns the entry previously registered with the same id.
    pub fn insert(&mut self, id: impl Into<String>, entry: RegistryEntry) -> Option<RegistryEntry> {
        self.entries.insert(id.into(), entry)
    }

    /// Removes an entry.
    pub fn remove(&mut self, id: &str) -> Option<RegistryEntry> {
        self.entries.remove(id)
    }

    /// Entry of the given feature.
    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.get(id)
    }

    /// Mutable entry of the given feature.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut RegistryEntry> {
        self.entries.get_mut(id)
    }

    /// Combined symbol of the given station or aggregate.
    pub fn symbol(&self, id: &str) -> Option<&CombinedSymbol> {
        match &self.get(id)?.kind {
            EntryKind::Symbol { symbol, .. } => Some(symbol),
            EntryKind::Vgi { .. } => None,
        }
    }

    /// Mutable combined symbol of the given station or aggregate.
    pub fn symbol_mut(&mut self, id: &str) -> Option<&mut CombinedSymbol> {
        match &mut self.get_mut(id)?.kind {
            EntryKind::Symbol { symbol, .. } => Some(symbol),
            EntryKind::Vgi { .. } => None,
        }
    }

    /// Ids of the input stations covered by the given station or aggregate.
    pub fn members(&self, id: &str) -> Option<&[String]> {
        match &self.get(id)?.kind {
            EntryKind::Symbol { members, .. } => Some(members.as_slice()),
            EntryKind::Vgi { .. } => None,
        }
    }

    /// Returns true if the feature is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of registered features.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no features are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegistryEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }
}

#[cfg(test)]
mod tests {
    use pointgen_types::latlon;

    use super::*;
    use crate::footprint::Footprint;
    use crate::symbol::SlotValue;

    fn symbol_entry(members: &[&str]) -> RegistryEntry {
        RegistryEntry {
            projected: Point2d::new(0.0, 0.0),
            geodesic: latlon!(0.0, 0.0),
            kind: EntryKind::Symbol {
                symbol: CombinedSymbol {
                    primary: SlotValue::empty(),
                    secondary: SlotValue::empty(),
                    tertiary: SlotValue::empty(),
                    other: vec![],
                    vgi: vec![],
                    footprint: Footprint::new(latlon!(0.0, 0.0), 1.0, 4),
                },
                members: members.iter().map(|m| m.to_string()).collect(),
            },
        }
    }

    fn vgi_entry() -> RegistryEntry {
        RegistryEntry {
            projected: Point2d::new(1.0, 1.0),
            geodesic: latlon!(0.0, 0.0),
            kind: EntryKind::Vgi {
                phenomenon: "Dry vegetation (trees)".into(),
                cross_reference: None,
            },
        }
    }

    #[test]
    fn symbol_and_vgi_entries() {
        let mut registry = FeatureRegistry::new();
        assert!(registry.insert("a", symbol_entry(&["a"])).is_none());
        registry.insert("v", vgi_entry());

        assert_eq!(registry.len(), 2);
        assert!(registry.symbol("a").is_some());
        assert!(registry.symbol("v").is_none());
        assert!(registry.symbol("x").is_none());
        assert_eq!(registry.members("a"), Some(&["a".to_string()][..]));
        assert_eq!(registry.members("v"), None);

        registry.symbol_mut("a").unwrap().primary.grouped = true;
        assert!(registry.symbol("a").unwrap().primary.grouped);
    }

    #[test]
    fn replace_and_remove() {
        let mut registry = FeatureRegistry::new();
        registry.insert("a", symbol_entry(&["a"]));
        let previous = registry.insert("a", symbol_entry(&["b", "c"]));
        assert_eq!(previous, Some(symbol_entry(&["a"])));
        assert_eq!(registry.members("a").map(|m| m.len()), Some(2));

        assert!(registry.remove("a").is_some());
        assert!(registry.remove("a").is_none());
        assert!(!registry.contains("a"));
        assert!(registry.is_empty());
    }
}
