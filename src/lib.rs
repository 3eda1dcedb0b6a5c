//! Facade crate for the metromap network renderer.
//!
//! This crate re-exports the core rendering types and, behind the `data`
//! feature, the JSON dataset loaders.

#![forbid(unsafe_code)]

pub use metromap_core::{
    Canvas, CanvasConfig, Dataset, Line, LineMap, MapError, NameRewrites, NetworkMap, Node,
    NodeTable, PathCommand, PathInstruction, PlanarPoint, ProjectionError, Projector,
    RenderOptions, RewriteRule, StationError, StationMarker, StationRegistry, ViewBox, Way,
    WaySequence, WayTable, reconstruct_sequences, render_network, station_id,
};

#[cfg(feature = "data")]
pub use metromap_data::{DatasetError, InputFormat, load_dataset, load_relation_dump};
