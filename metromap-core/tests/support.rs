#![expect(
    clippy::expect_used,
    clippy::must_use_candidate,
    clippy::missing_panics_doc,
    reason = "test helpers fail fast with expect on malformed fixtures"
)]

//! Shared builders for metromap-core integration tests.

use std::collections::BTreeSet;

use metromap_core::{Direction, NodeId, Way, WayId, WayTable, WaySequence};

/// Build a way table from `(id, nodes)` pairs.
pub fn way_table(ways: &[(WayId, &[NodeId])]) -> WayTable {
    ways.iter()
        .map(|(id, nodes)| Way::new(*id, nodes.to_vec()))
        .collect()
}

/// Entry and exit node of every step of `sequence`.
pub fn oriented_steps(sequence: &WaySequence, ways: &WayTable) -> Vec<(NodeId, NodeId)> {
    sequence
        .steps()
        .iter()
        .map(|(id, direction)| {
            let way = ways.get(*id).expect("sequence references a known way");
            direction.oriented_ends(way).expect("way has two ends")
        })
        .collect()
}

/// Whether consecutive steps of `sequence` share their joining node.
pub fn is_connected(sequence: &WaySequence, ways: &WayTable) -> bool {
    oriented_steps(sequence, ways)
        .windows(2)
        .all(|pair| matches!(pair, [(_, exit), (entry, _)] if exit == entry))
}

/// Way ids of every sequence, flattened and sorted.
pub fn covered_ways(sequences: &[WaySequence]) -> Vec<WayId> {
    let mut ids: Vec<WayId> = sequences.iter().flat_map(WaySequence::way_ids).collect();
    ids.sort_unstable();
    ids
}

/// Distinct way ids of `ways`, sorted.
pub fn all_ways(ways: &WayTable) -> Vec<WayId> {
    ways.iter()
        .map(|way| way.id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Render a sequence as `id+`/`id-` tokens for readable assertions.
pub fn describe(sequence: &WaySequence) -> String {
    sequence
        .steps()
        .iter()
        .map(|(id, direction)| match direction {
            Direction::Forward => format!("{id}+"),
            Direction::Reversed => format!("{id}-"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
