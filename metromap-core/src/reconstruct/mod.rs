//! Rebuild continuous runs of track from an unordered set of ways.
//!
//! A line arrives as a bag of way ids with no ordering or orientation. The
//! reconstructor splits it into maximal [`WaySequence`]s: stretches joined end
//! to end through nodes where exactly two ways meet, each way oriented along
//! the direction of travel. Branch points and dead ends terminate a sequence
//! and seed the next one.
//!
//! Traversal is an explicit state machine driven by a stack of pending start
//! nodes:
//!
//! - `SelectingStart` looks at the top of the stack and opens an empty
//!   sequence there; an empty stack ends the component.
//! - `Extending` takes the first unconsumed way at the current node in id
//!   order and walks to its far end. Reaching a node of degree other than two
//!   pushes that node and completes the sequence.
//! - `SequenceComplete` emits the non-empty sequence and leaves the stack
//!   alone, since its start may still have unexplored branches.
//! - `StartDrained` pops a start node that has no unconsumed ways left.
//!
//! Every component of the line is drained in turn, so disconnected pieces
//! each contribute their own sequences.

use std::collections::BTreeSet;

use log::debug;

use crate::error::MapError;
use crate::model::{NodeId, Way, WayId, WayTable};

mod endpoint;

pub use endpoint::EndpointMap;

/// Orientation of a way within a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Walk the way's nodes in stored order.
    Forward,
    /// Walk the way's nodes in reverse.
    Reversed,
}

impl Direction {
    /// Orientation that leaves `from` along `way`, with the node reached.
    ///
    /// # Errors
    /// Returns [`MapError::DegenerateWay`] when `way` has no nodes.
    pub fn leaving(way: &Way, from: NodeId) -> Result<(Self, NodeId), MapError> {
        let (first, last) = way.ends().ok_or(MapError::DegenerateWay { id: way.id })?;
        Ok(if first == from {
            (Self::Forward, last)
        } else {
            (Self::Reversed, first)
        })
    }

    /// Entry and exit node of `way` when walked in this direction.
    ///
    /// # Errors
    /// Returns [`MapError::DegenerateWay`] when `way` has no nodes.
    pub fn oriented_ends(self, way: &Way) -> Result<(NodeId, NodeId), MapError> {
        let (first, last) = way.ends().ok_or(MapError::DegenerateWay { id: way.id })?;
        Ok(match self {
            Self::Forward => (first, last),
            Self::Reversed => (last, first),
        })
    }
}

/// Maximal non-branching run of oriented ways.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaySequence {
    steps: Vec<(WayId, Direction)>,
}

impl WaySequence {
    /// Build a sequence from explicit steps.
    #[must_use]
    pub const fn from_steps(steps: Vec<(WayId, Direction)>) -> Self {
        Self { steps }
    }

    /// Append an oriented way.
    pub fn push(&mut self, way: WayId, direction: Direction) {
        self.steps.push((way, direction));
    }

    /// Oriented ways in traversal order.
    #[must_use]
    pub fn steps(&self) -> &[(WayId, Direction)] {
        &self.steps
    }

    /// Way ids in traversal order.
    pub fn way_ids(&self) -> impl Iterator<Item = WayId> + '_ {
        self.steps.iter().map(|(way, _)| *way)
    }

    /// Number of ways in the sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the sequence holds no ways.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Flatten into node ids.
    ///
    /// Each way after the first drops its entry node, which repeats the
    /// previous way's exit node.
    ///
    /// # Errors
    /// Returns [`MapError::Lookup`] when a way is missing from `ways`.
    pub fn node_ids(&self, ways: &WayTable) -> Result<Vec<NodeId>, MapError> {
        let mut nodes = Vec::new();
        for (index, (way_id, direction)) in self.steps.iter().enumerate() {
            let way = ways.get(*way_id)?;
            let skip = usize::from(index > 0);
            match direction {
                Direction::Forward => nodes.extend(way.nd.iter().skip(skip)),
                Direction::Reversed => nodes.extend(way.nd.iter().rev().skip(skip)),
            }
        }
        Ok(nodes)
    }
}

/// Outcome of reconstructing one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconstruction {
    /// Sequences in emission order.
    pub sequences: Vec<WaySequence>,
    /// Number of disconnected components drained.
    pub components: usize,
}

enum Traversal {
    SelectingStart,
    Extending {
        current: NodeId,
        sequence: WaySequence,
    },
    SequenceComplete(WaySequence),
    StartDrained,
}

/// Split `way_ids` into maximal oriented sequences.
///
/// The sequences partition the input: every way appears exactly once.
/// Output depends only on the set of ids, not on iteration order.
///
/// # Errors
/// Returns [`MapError::Lookup`] when a way is missing from `ways` and
/// [`MapError::DegenerateWay`] when a way cannot be joined.
///
/// # Examples
/// ```
/// use metromap_core::{Direction, Way, WayTable, reconstruct_sequences};
///
/// let ways: WayTable = [Way::new(1, vec![10, 11]), Way::new(2, vec![12, 11])]
///     .into_iter()
///     .collect();
/// let result = reconstruct_sequences([2, 1], &ways).unwrap();
/// assert_eq!(result.sequences.len(), 1);
/// assert_eq!(
///     result.sequences[0].steps(),
///     &[(1, Direction::Forward), (2, Direction::Reversed)]
/// );
/// ```
pub fn reconstruct_sequences<I>(way_ids: I, ways: &WayTable) -> Result<Reconstruction, MapError>
where
    I: IntoIterator<Item = WayId>,
{
    Reconstructor {
        ways,
        remaining: way_ids.into_iter().collect(),
        result: Reconstruction::default(),
    }
    .run()
}

struct Reconstructor<'a> {
    ways: &'a WayTable,
    remaining: BTreeSet<WayId>,
    result: Reconstruction,
}

impl Reconstructor<'_> {
    fn run(mut self) -> Result<Reconstruction, MapError> {
        while !self.remaining.is_empty() {
            let endpoints = EndpointMap::build(&self.remaining, self.ways)?;
            let Some(start) = endpoints.start_node() else {
                break;
            };
            if endpoints.is_pure_loop() {
                debug!("only closed loops remain; starting at node {start}");
            }
            let before = self.remaining.len();
            self.drain_component(&endpoints, start)?;
            self.result.components += 1;
            debug!(
                "drained {} ways from component starting at node {start}",
                before.saturating_sub(self.remaining.len())
            );
        }
        Ok(self.result)
    }

    fn drain_component(&mut self, endpoints: &EndpointMap, start: NodeId) -> Result<(), MapError> {
        let mut pending = vec![start];
        let mut state = Traversal::SelectingStart;
        loop {
            state = match state {
                Traversal::SelectingStart => match pending.last() {
                    Some(&current) => Traversal::Extending {
                        current,
                        sequence: WaySequence::default(),
                    },
                    None => return Ok(()),
                },
                Traversal::Extending { current, sequence } => {
                    self.extend(endpoints, current, sequence, &mut pending)?
                }
                Traversal::SequenceComplete(sequence) => {
                    self.result.sequences.push(sequence);
                    Traversal::SelectingStart
                }
                Traversal::StartDrained => {
                    pending.pop();
                    Traversal::SelectingStart
                }
            };
        }
    }

    fn extend(
        &mut self,
        endpoints: &EndpointMap,
        current: NodeId,
        mut sequence: WaySequence,
        pending: &mut Vec<NodeId>,
    ) -> Result<Traversal, MapError> {
        let Some(way_id) = self.take_incident_way(endpoints, current) else {
            return Ok(if sequence.is_empty() {
                Traversal::StartDrained
            } else {
                Traversal::SequenceComplete(sequence)
            });
        };
        let (direction, next) = Direction::leaving(self.ways.get(way_id)?, current)?;
        sequence.push(way_id, direction);
        if endpoints.degree(next) == 2 {
            Ok(Traversal::Extending {
                current: next,
                sequence,
            })
        } else {
            pending.push(next);
            Ok(Traversal::SequenceComplete(sequence))
        }
    }

    fn take_incident_way(&mut self, endpoints: &EndpointMap, node: NodeId) -> Option<WayId> {
        let way_id = endpoints
            .ways_at(node)
            .iter()
            .copied()
            .find(|way_id| self.remaining.contains(way_id))?;
        self.remaining.remove(&way_id);
        Some(way_id)
    }
}
