//! Errors raised while loading datasets from disk.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Kind of record whose map key disagreed with its embedded id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// An entry of the `nodes` map.
    Node,
    /// An entry of the `ways` map.
    Way,
    /// An entry of the `relations` map.
    Relation,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        })
    }
}

/// Errors returned by the dataset loaders.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file could not be opened.
    #[error("failed to open dataset at {path}")]
    Open {
        /// Path that was opened.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file is not valid JSON of the expected shape.
    #[error("failed to parse dataset at {path}")]
    Parse {
        /// Path that was parsed.
        path: Utf8PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// A map key does not match the id stored inside the record.
    #[error("{kind} stored under key {key} carries id {id}")]
    IdMismatch {
        /// Kind of record.
        kind: RecordKind,
        /// Map key.
        key: u64,
        /// Embedded id.
        id: u64,
    },
    /// A way lists fewer than two nodes.
    #[error("way {id} lists {len} node(s); at least two are required")]
    ShortWay {
        /// Way identifier.
        id: u64,
        /// Number of listed nodes.
        len: usize,
    },
    /// A node lies outside the WGS84 range or is not finite.
    #[error("node {id} has invalid coordinates (lat {lat}, lon {lon})")]
    InvalidCoordinate {
        /// Node identifier.
        id: u64,
        /// Latitude as stored.
        lat: f64,
        /// Longitude as stored.
        lon: f64,
    },
    /// A route master lists a relation absent from the dump.
    #[error("route master {master} references missing relation {relation}")]
    MissingRelation {
        /// Route master identifier.
        master: u64,
        /// Missing relation identifier.
        relation: u64,
    },
}
