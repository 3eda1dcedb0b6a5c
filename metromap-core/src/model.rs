//! Transit network records shared by every processing stage.
//!
//! Nodes and ways are owned by [`NodeTable`] and [`WayTable`]; lines and way
//! sequences refer to them by identifier only. Lookups return a typed
//! [`LookupError`] so a dangling reference aborts processing instead of being
//! silently skipped.

use std::collections::{BTreeMap, HashMap};

use geo::Coord;

use crate::error::LookupError;

/// Identifier of an OpenStreetMap node.
pub type NodeId = u64;

/// Identifier of an OpenStreetMap way.
pub type WayId = u64;

/// Free-form key/value tags in OpenStreetMap style.
pub type Tags = HashMap<String, String>;

/// A geographic point.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use metromap_core::Node;
///
/// let node = Node::new(7, Coord { x: 2.35, y: 48.85 }).with_name("Châtelet");
/// assert_eq!(node.name(), Some("Châtelet"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// Geographic position.
    pub location: Coord<f64>,
    /// Descriptive tags such as `name`.
    pub tags: Tags,
}

impl Node {
    /// Construct an untagged node.
    #[must_use]
    pub fn new(id: NodeId, location: Coord<f64>) -> Self {
        Self {
            id,
            location,
            tags: Tags::new(),
        }
    }

    /// Attach a `name` tag.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.tags.insert("name".to_owned(), name.into());
        self
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.location.x
    }

    /// Human-readable name, when tagged.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.tags.get("name").map(String::as_str)
    }
}

/// A run of track defined by an ordered list of node references.
///
/// Only the two ends take part in joining ways together; interior nodes are
/// geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Way {
    /// Unique identifier.
    pub id: WayId,
    /// Ordered node references, at least two.
    pub nd: Vec<NodeId>,
    /// Descriptive tags.
    pub tags: Tags,
}

impl Way {
    /// Construct an untagged way.
    #[must_use]
    pub fn new(id: WayId, nd: Vec<NodeId>) -> Self {
        Self {
            id,
            nd,
            tags: Tags::new(),
        }
    }

    /// First node reference.
    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.nd.first().copied()
    }

    /// Last node reference.
    #[must_use]
    pub fn last(&self) -> Option<NodeId> {
        self.nd.last().copied()
    }

    /// Both ends, or `None` for a way without nodes.
    #[must_use]
    pub fn ends(&self) -> Option<(NodeId, NodeId)> {
        self.first().zip(self.last())
    }
}

/// A named transit line built from one or more sub-routes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    /// Display name, e.g. `Métro 4`.
    pub name: String,
    /// Short reference code, e.g. `4`.
    pub reference: String,
    /// Stroke colour as tagged upstream.
    pub color: Option<String>,
    /// Ways of the line with the number of sub-routes referencing each.
    pub ways: BTreeMap<WayId, u32>,
    /// Stop nodes in first-seen order, without duplicates.
    pub stops: Vec<NodeId>,
}

impl Line {
    /// Construct an empty line.
    #[must_use]
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
            ..Self::default()
        }
    }

    /// Record one more reference to `way`.
    pub fn add_way(&mut self, way: WayId) {
        *self.ways.entry(way).or_insert(0) += 1;
    }

    /// Record a stop unless it is already listed.
    pub fn add_stop(&mut self, node: NodeId) {
        if !self.stops.contains(&node) {
            self.stops.push(node);
        }
    }
}

/// Node lookup keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTable(HashMap<NodeId, Node>);

impl NodeTable {
    /// Insert a node, replacing any previous node with the same id.
    pub fn insert(&mut self, node: Node) {
        self.0.insert(node.id, node);
    }

    /// Fetch a node or report the dangling reference.
    ///
    /// # Errors
    /// Returns [`LookupError::Node`] when `id` is unknown.
    pub fn get(&self, id: NodeId) -> Result<&Node, LookupError> {
        self.0.get(&id).ok_or(LookupError::Node { id })
    }

    /// Iterate over all nodes in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.0.values()
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Node> for NodeTable {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self(iter.into_iter().map(|node| (node.id, node)).collect())
    }
}

/// Way lookup keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WayTable(HashMap<WayId, Way>);

impl WayTable {
    /// Insert a way, replacing any previous way with the same id.
    pub fn insert(&mut self, way: Way) {
        self.0.insert(way.id, way);
    }

    /// Fetch a way or report the dangling reference.
    ///
    /// # Errors
    /// Returns [`LookupError::Way`] when `id` is unknown.
    pub fn get(&self, id: WayId) -> Result<&Way, LookupError> {
        self.0.get(&id).ok_or(LookupError::Way { id })
    }

    /// Iterate over all ways in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Way> {
        self.0.values()
    }

    /// Number of ways.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table holds no ways.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Way> for WayTable {
    fn from_iter<I: IntoIterator<Item = Way>>(iter: I) -> Self {
        Self(iter.into_iter().map(|way| (way.id, way)).collect())
    }
}

/// Everything needed to draw one transit network.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Network name, used to select name rewrites.
    pub network_name: String,
    /// Lines in drawing order.
    pub lines: Vec<Line>,
    /// Shared way lookup.
    pub ways: WayTable,
    /// Shared node lookup.
    pub nodes: NodeTable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn line_counts_repeated_ways() {
        let mut line = Line::new("Métro 7", "7");
        line.add_way(3);
        line.add_way(3);
        line.add_way(1);
        assert_eq!(line.ways.get(&3), Some(&2));
        assert_eq!(line.ways.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[rstest]
    fn line_keeps_first_seen_stop_order() {
        let mut line = Line::default();
        for stop in [5, 2, 5, 9, 2] {
            line.add_stop(stop);
        }
        assert_eq!(line.stops, vec![5, 2, 9]);
    }

    #[rstest]
    fn missing_lookups_name_the_identifier() {
        let ways = WayTable::default();
        let nodes = NodeTable::default();
        assert_eq!(ways.get(4), Err(LookupError::Way { id: 4 }));
        assert_eq!(nodes.get(8), Err(LookupError::Node { id: 8 }));
    }
}
