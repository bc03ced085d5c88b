//! Point index over projected feature coordinates.

use ahash::{HashMap, HashMapExt};
use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// Position of a feature in the index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    /// Id of the feature.
    pub id: String,
    /// Projected x coordinate.
    pub x: f64,
    /// Projected y coordinate.
    pub y: f64,
}

impl RTreeObject for IndexEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for IndexEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index of feature positions supporting bounded nearest-neighbour queries.
///
/// Entries are identified by feature id: inserting an id that is already present moves the
/// entry, and [`SpatialIndex::remove`] does not need to know the coordinates.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    tree: RTree<IndexEntry>,
    positions: HashMap<String, [f64; 2]>,
}

impl SpatialIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            positions: HashMap::new(),
        }
    }

    /// Adds a feature position to the index.
    pub fn insert(&mut self, id: impl Into<String>, x: f64, y: f64) {
        let id = id.into();
        if self.positions.contains_key(&id) {
            self.remove(&id);
        }

        self.positions.insert(id.clone(), [x, y]);
        self.tree.insert(IndexEntry { id, x, y });
    }

    /// Removes the feature with the given id. Returns the removed entry, if it was present.
    pub fn remove(&mut self, id: &str) -> Option<IndexEntry> {
        let [x, y] = self.positions.remove(id)?;
        self.tree.remove(&IndexEntry {
            id: id.to_string(),
            x,
            y,
        })
    }

    /// Returns up to `k` entries nearest to the given point within `max_distance`, nearest
    /// first. The entry with the `exclude` id (usually the feature the query is made for) is
    /// never returned.
    pub fn knn(
        &self,
        x: f64,
        y: f64,
        k: usize,
        max_distance: f64,
        exclude: Option<&str>,
    ) -> Vec<IndexEntry> {
        let max_distance_2 = max_distance * max_distance;
        self.tree
            .nearest_neighbor_iter_with_distance_2(&[x, y])
            .take_while(|(_, distance_2)| *distance_2 <= max_distance_2)
            .map(|(entry, _)| entry)
            .filter(|entry| Some(entry.id.as_str()) != exclude)
            .take(k)
            .cloned()
            .collect()
    }

    /// Returns true if the feature is in the index.
    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(entries: &[IndexEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    fn grid() -> SpatialIndex {
        let mut index = SpatialIndex::new();
        index.insert("a", 0.0, 0.0);
        index.insert("b", 10.0, 0.0);
        index.insert("c", 0.0, 25.0);
        index.insert("d", 100.0, 100.0);
        index
    }

    #[test]
    fn nearest_first() {
        let index = grid();
        assert_eq!(ids(&index.knn(1.0, 0.0, 3, 1000.0, None)), ["a", "b", "c"]);
        assert_eq!(ids(&index.knn(1.0, 0.0, 1, 1000.0, None)), ["a"]);
        assert_eq!(ids(&index.knn(99.0, 99.0, 10, 1000.0, None)), ["d", "c", "b", "a"]);
    }

    #[test]
    fn bounded_by_distance() {
        let index = grid();
        assert_eq!(ids(&index.knn(0.0, 0.0, 5, 10.0, None)), ["a", "b"]);
        assert_eq!(ids(&index.knn(0.0, 0.0, 5, 9.9, None)), ["a"]);
        assert!(index.knn(50.0, 50.0, 5, 1.0, None).is_empty());
    }

    #[test]
    fn query_point_is_excluded() {
        let index = grid();
        assert_eq!(ids(&index.knn(0.0, 0.0, 1, 100.0, Some("a"))), ["b"]);
        assert_eq!(ids(&index.knn(0.0, 0.0, 2, 100.0, Some("a"))), ["b", "c"]);
        assert!(index.knn(100.0, 100.0, 2, 50.0, Some("d")).is_empty());
    }

    #[test]
    fn remove_by_id() {
        let mut index = grid();
        let removed = index.remove("b").unwrap();
        assert_eq!(removed.x, 10.0);
        assert!(!index.contains("b"));
        assert!(index.remove("b").is_none());
        assert_eq!(index.len(), 3);
        assert_eq!(ids(&index.knn(10.0, 0.0, 1, 100.0, None)), ["a"]);
    }

    #[test]
    fn reinsert_moves_entry() {
        let mut index = grid();
        index.insert("a", 100.0, 90.0);
        assert_eq!(index.len(), 4);
        assert_eq!(ids(&index.knn(0.0, 0.0, 1, 100.0, None)), ["b"]);
        assert_eq!(ids(&index.knn(100.0, 90.0, 1, 1.0, None)), ["a"]);
    }
}
