//! Index from way endpoints back to the ways touching them.

use std::collections::BTreeMap;

use crate::error::MapError;
use crate::model::{NodeId, WayId, WayTable};

/// Endpoint index over a set of still-unconsumed ways.
///
/// Keys are node ids; values list, in ascending id order, every way whose
/// first or last node is that node. A closed way whose ends coincide is
/// listed twice under its single endpoint. Ordered collections keep start
/// selection and traversal independent of hash iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointMap {
    ways_by_node: BTreeMap<NodeId, Vec<WayId>>,
}

impl EndpointMap {
    /// Index the endpoints of `remaining`.
    ///
    /// # Errors
    /// Returns [`MapError::Lookup`] for unknown ways and
    /// [`MapError::DegenerateWay`] for ways with fewer than two nodes.
    pub fn build<'a, I>(remaining: I, ways: &WayTable) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = &'a WayId>,
    {
        let mut ways_by_node: BTreeMap<NodeId, Vec<WayId>> = BTreeMap::new();
        for &way_id in remaining {
            let way = ways.get(way_id)?;
            if way.nd.len() < 2 {
                return Err(MapError::DegenerateWay { id: way_id });
            }
            let (first, last) = way.ends().ok_or(MapError::DegenerateWay { id: way_id })?;
            for end in [first, last] {
                ways_by_node.entry(end).or_default().push(way_id);
            }
        }
        for incident in ways_by_node.values_mut() {
            incident.sort_unstable();
        }
        Ok(Self { ways_by_node })
    }

    /// Ways ending at `node`, sorted by id.
    #[must_use]
    pub fn ways_at(&self, node: NodeId) -> &[WayId] {
        self.ways_by_node.get(&node).map_or(&[], Vec::as_slice)
    }

    /// Number of way ends incident to `node`.
    #[must_use]
    pub fn degree(&self, node: NodeId) -> usize {
        self.ways_at(node).len()
    }

    /// Node to begin traversal from.
    ///
    /// The lowest-id node whose degree is not two (a branch point or a dead
    /// end); when every node has degree two the remaining ways are closed
    /// loops and the lowest-id node overall is used.
    #[must_use]
    pub fn start_node(&self) -> Option<NodeId> {
        self.ways_by_node
            .iter()
            .find(|(_, incident)| incident.len() != 2)
            .map(|(node, _)| *node)
            .or_else(|| self.ways_by_node.keys().next().copied())
    }

    /// Whether every indexed node has exactly two incident way ends.
    #[must_use]
    pub fn is_pure_loop(&self) -> bool {
        self.ways_by_node
            .values()
            .all(|incident| incident.len() == 2)
    }

    /// Whether no ways are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ways_by_node.is_empty()
    }
}
