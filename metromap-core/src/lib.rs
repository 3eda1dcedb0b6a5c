//! Core domain types and algorithms for metromap.
//!
//! A transit network arrives as lines that reference unordered bags of ways,
//! which in turn reference nodes. This crate rebuilds each line into
//! continuous drawable runs, projects every node onto a bounded canvas and
//! merges stops into named stations.
//!
//! The entry point for whole networks is [`render_network`]; the individual
//! stages ([`reconstruct_sequences`], [`Projector`], [`StationRegistry`]) are
//! exposed for callers that need them separately.

#![forbid(unsafe_code)]

mod error;
mod model;
mod network;
mod path;
mod projection;
mod reconstruct;
mod relation;
mod stations;

pub use error::{LookupError, MapError};
pub use model::{Dataset, Line, Node, NodeId, NodeTable, Tags, Way, WayId, WayTable};
pub use network::{LineMap, NetworkMap, RenderOptions, render_network};
pub use path::{LinePath, PathCommand, PathInstruction, point_sequence};
pub use projection::{
    Canvas, CanvasConfig, DEFAULT_BOTTOM_PADDING, DEFAULT_PADDING, DEFAULT_TARGET_HEIGHT,
    DEFAULT_TARGET_WIDTH, PlanarPoint, ProjectionError, Projector, ViewBox,
};
pub use reconstruct::{
    Direction, EndpointMap, Reconstruction, WaySequence, reconstruct_sequences,
};
pub use relation::{LineAssembler, MemberKind, MemberUse, RelationMember, RouteRelation};
pub use stations::{
    BERLIN_S_BAHN, NameRewrites, PARIS_METRO, RewriteRule, StationError, StationMarker,
    StationRegistry, centroid, station_id,
};
