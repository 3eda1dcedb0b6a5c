//! Error types raised while turning a dataset into a drawable map.

use thiserror::Error;

use crate::model::NodeId;
use crate::model::WayId;
use crate::projection::ProjectionError;
use crate::stations::StationError;

/// A way or node referenced by the network is absent from the lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LookupError {
    /// A line or way sequence referenced an unknown way.
    #[error("way {id} is not present in the way lookup")]
    Way {
        /// Identifier of the missing way.
        id: WayId,
    },
    /// A way or stop list referenced an unknown node.
    #[error("node {id} is not present in the node lookup")]
    Node {
        /// Identifier of the missing node.
        id: NodeId,
    },
}

/// Fatal errors raised while rendering a network.
///
/// Every variant aborts the whole run; there is no partial-result mode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// A referenced way or node does not exist.
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// A way has fewer than two nodes and cannot be joined.
    #[error("way {id} has fewer than two nodes")]
    DegenerateWay {
        /// Identifier of the offending way.
        id: WayId,
    },
    /// A stop node carries no `name` tag.
    #[error("stop node {node} on line {line:?} has no name tag")]
    UnnamedStop {
        /// Name of the line listing the stop.
        line: String,
        /// Identifier of the unnamed node.
        node: NodeId,
    },
    /// Two different stop names normalise to the same station id.
    #[error(transparent)]
    Station(#[from] StationError),
    /// The projector could not be fitted to the dataset.
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}
