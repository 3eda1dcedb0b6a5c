//! Drawing instructions for a line's reconstructed track.

use crate::error::MapError;
use crate::model::{NodeTable, WayTable};
use crate::projection::{PlanarPoint, Projector};
use crate::reconstruct::WaySequence;

/// Pen movement of a drawing instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathCommand {
    /// Lift the pen and start a new sub-path.
    #[cfg_attr(feature = "serde", serde(rename = "M"))]
    MoveTo,
    /// Draw a straight segment from the previous point.
    #[cfg_attr(feature = "serde", serde(rename = "L"))]
    LineTo,
}

impl PathCommand {
    /// Single-letter mnemonic (`M` or `L`).
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::MoveTo => 'M',
            Self::LineTo => 'L',
        }
    }
}

/// One step of a drawn path.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathInstruction {
    /// Pen movement.
    pub command: PathCommand,
    /// Target x on the canvas.
    pub x: f64,
    /// Target y on the canvas.
    pub y: f64,
}

/// Projected point runs of one line, one run per way sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinePath {
    runs: Vec<Vec<PlanarPoint>>,
}

impl LinePath {
    /// Project every way sequence into a point run.
    ///
    /// # Errors
    /// Returns [`MapError::Lookup`] when a way or node is missing.
    pub fn from_sequences(
        sequences: &[WaySequence],
        ways: &WayTable,
        nodes: &NodeTable,
        projector: &Projector,
    ) -> Result<Self, MapError> {
        let runs: Vec<Vec<PlanarPoint>> = sequences
            .iter()
            .map(|sequence| point_sequence(sequence, ways, nodes, projector))
            .collect::<Result<_, _>>()?;
        Ok(Self { runs })
    }

    /// Point runs in drawing order.
    #[must_use]
    pub fn runs(&self) -> &[Vec<PlanarPoint>] {
        &self.runs
    }

    /// Flatten into instructions: a move to the first point of each run,
    /// then a line to each following point.
    #[must_use]
    pub fn instructions(&self) -> Vec<PathInstruction> {
        self.runs
            .iter()
            .flat_map(|run| {
                run.iter().enumerate().map(|(index, point)| PathInstruction {
                    command: if index == 0 {
                        PathCommand::MoveTo
                    } else {
                        PathCommand::LineTo
                    },
                    x: point.x,
                    y: point.y,
                })
            })
            .collect()
    }
}

/// Project the nodes of `sequence` in traversal order.
///
/// # Errors
/// Returns [`MapError::Lookup`] when a way or node is missing.
pub fn point_sequence(
    sequence: &WaySequence,
    ways: &WayTable,
    nodes: &NodeTable,
    projector: &Projector,
) -> Result<Vec<PlanarPoint>, MapError> {
    sequence
        .node_ids(ways)?
        .into_iter()
        .map(|id| -> Result<PlanarPoint, MapError> {
            Ok(projector.project(nodes.get(id)?.location))
        })
        .collect()
}
