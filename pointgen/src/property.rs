use ahash::{HashMap, HashMapExt};
use serde::{Deserialize, Serialize};

use crate::error::GeneralizeError;

/// Observed property (phenomenon) of the station features, e.g. air temperature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Identifier of the property, used as the key of the feature series.
    pub name_id: String,
    /// Human readable name.
    #[serde(rename = "name", default)]
    pub display_name: String,
    /// Unit of the property values.
    #[serde(default)]
    pub unit: String,
}

impl Property {
    /// Creates a new property.
    pub fn new(
        name_id: impl Into<String>,
        display_name: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name_id: name_id.into(),
            display_name: display_name.into(),
            unit: unit.into(),
        }
    }
}

/// Position of a property inside the composite icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    /// Property chosen by the user.
    Primary,
    /// First non-primary property of the catalog.
    Secondary,
    /// Second non-primary property of the catalog.
    Tertiary,
    /// Remaining properties; the value is the position in the `other` list.
    Other(usize),
}

impl Slot {
    /// Anchor of the icon quadrant the slot is drawn into, as a fraction of the icon size.
    pub fn anchor(&self) -> [f64; 2] {
        match self {
            Slot::Primary => [1.0, 1.0],
            Slot::Secondary => [0.0, 0.0],
            Slot::Tertiary => [1.0, 0.0],
            Slot::Other(_) => [0.0, 1.0],
        }
    }
}

/// Ordered set of properties with the slot assigned to each of them.
///
/// Slots are assigned once per request from the catalog order: the primary property gets
/// [`Slot::Primary`], the following properties get [`Slot::Secondary`], [`Slot::Tertiary`] and
/// [`Slot::Other`] in order. Since every feature's symbol is laid out by this one assignment,
/// symbols of different features can be merged slot by slot.
#[derive(Debug, Clone)]
pub struct PropertyCatalog {
    properties: Vec<(Property, Slot)>,
    by_name: HashMap<String, usize>,
    primary: usize,
}

impl PropertyCatalog {
    /// Creates a catalog and assigns slots.
    ///
    /// Properties with an id that was already seen are ignored.
    pub fn new(properties: &[Property], primary: &str) -> Result<Self, GeneralizeError> {
        if properties.is_empty() {
            return Err(GeneralizeError::EmptyCatalog);
        }

        let mut assigned = Vec::with_capacity(properties.len());
        let mut by_name = HashMap::with_capacity(properties.len());
        let mut primary_index = None;
        let mut next_position = 0;

        for property in properties {
            if by_name.contains_key(&property.name_id) {
                log::warn!("Duplicate property {} in catalog is ignored", property.name_id);
                continue;
            }

            let slot = if property.name_id == primary {
                primary_index = Some(assigned.len());
                Slot::Primary
            } else {
                let slot = match next_position {
                    0 => Slot::Secondary,
                    1 => Slot::Tertiary,
                    n => Slot::Other(n - 2),
                };
                next_position += 1;
                slot
            };

            by_name.insert(property.name_id.clone(), assigned.len());
            assigned.push((property.clone(), slot));
        }

        let primary = primary_index
            .ok_or_else(|| GeneralizeError::UnknownPrimaryProperty(primary.to_string()))?;

        Ok(Self {
            properties: assigned,
            by_name,
            primary,
        })
    }

    /// The primary property.
    pub fn primary(&self) -> &Property {
        &self.properties[self.primary].0
    }

    /// Slot assigned to the property with the given id.
    pub fn slot_of(&self, name_id: &str) -> Option<Slot> {
        self.by_name
            .get(name_id)
            .map(|index| self.properties[*index].1)
    }

    /// Returns the property with the given id.
    pub fn get(&self, name_id: &str) -> Option<&Property> {
        self.by_name
            .get(name_id)
            .map(|index| &self.properties[*index].0)
    }

    /// Iterates over properties and their slots in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&Property, Slot)> + '_ {
        self.properties
            .iter()
            .map(|(property, slot)| (property, *slot))
    }

    /// Property owning the given slot.
    pub fn property_at(&self, slot: Slot) -> Option<&Property> {
        self.iter()
            .find(|(_, assigned)| *assigned == slot)
            .map(|(property, _)| property)
    }

    /// Length of the `other` slot list of every symbol built from this catalog.
    pub fn other_len(&self) -> usize {
        self.properties.len().saturating_sub(3)
    }

    /// Number of properties in the catalog.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Always `false`: a catalog cannot be created without properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
