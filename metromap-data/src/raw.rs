//! On-disk JSON shapes and their conversion into core records.
//!
//! Both input formats share the `nodes` and `ways` maps, keyed by the
//! decimal id of each record. Upstream bookkeeping fields such as `version`
//! are accepted and ignored.

use std::collections::{BTreeMap, HashMap};

use geo::Coord;
use log::warn;
use serde::Deserialize;

use metromap_core::{
    Dataset, Line, LineAssembler, Node, NodeTable, RouteRelation, Tags, Way, WayTable,
};

use crate::error::{DatasetError, RecordKind};

#[derive(Debug, Deserialize)]
pub(crate) struct RawNode {
    id: u64,
    lat: f64,
    lon: f64,
    #[serde(default)]
    tag: Tags,
    #[serde(default)]
    visible: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawWay {
    id: u64,
    nd: Vec<u64>,
    #[serde(default)]
    tag: Tags,
    #[serde(default)]
    visible: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLine {
    name: String,
    #[serde(default, rename = "ref")]
    reference: String,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    ways: BTreeMap<u64, u32>,
    #[serde(default)]
    stops: Vec<u64>,
}

/// A prepared dataset: lines already resolved to ways and stops.
#[derive(Debug, Deserialize)]
pub(crate) struct RawDataset {
    #[serde(default)]
    network_name: String,
    lines: Vec<RawLine>,
    ways: HashMap<u64, RawWay>,
    nodes: HashMap<u64, RawNode>,
}

/// A relation dump: route masters plus every relation they reference.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRelationDump {
    #[serde(default)]
    network_name: String,
    route_masters: Vec<RouteRelation>,
    relations: HashMap<u64, RouteRelation>,
    ways: HashMap<u64, RawWay>,
    nodes: HashMap<u64, RawNode>,
}

impl RawDataset {
    pub(crate) fn into_dataset(self) -> Result<Dataset, DatasetError> {
        let lines = self
            .lines
            .into_iter()
            .map(|raw| Line {
                name: raw.name,
                reference: raw.reference,
                color: raw.color,
                ways: raw.ways,
                stops: raw.stops,
            })
            .collect();
        Ok(Dataset {
            network_name: self.network_name,
            lines,
            ways: convert_ways(self.ways)?,
            nodes: convert_nodes(self.nodes)?,
        })
    }
}

impl RawRelationDump {
    pub(crate) fn into_dataset(self) -> Result<Dataset, DatasetError> {
        for (&key, relation) in &self.relations {
            check_key(RecordKind::Relation, key, relation.id)?;
        }
        let lines = self
            .route_masters
            .iter()
            .map(|master| assemble_line(master, &self.relations))
            .collect::<Result<_, _>>()?;
        Ok(Dataset {
            network_name: self.network_name,
            lines,
            ways: convert_ways(self.ways)?,
            nodes: convert_nodes(self.nodes)?,
        })
    }
}

fn assemble_line(
    master: &RouteRelation,
    relations: &HashMap<u64, RouteRelation>,
) -> Result<Line, DatasetError> {
    let mut assembler = LineAssembler::new(master);
    for relation_id in master.member_relations() {
        let route = relations
            .get(&relation_id)
            .ok_or(DatasetError::MissingRelation {
                master: master.id,
                relation: relation_id,
            })?;
        assembler.add_route(route);
    }
    Ok(assembler.finish())
}

fn check_key(kind: RecordKind, key: u64, id: u64) -> Result<(), DatasetError> {
    if key == id {
        Ok(())
    } else {
        Err(DatasetError::IdMismatch { kind, key, id })
    }
}

fn convert_ways(raw: HashMap<u64, RawWay>) -> Result<WayTable, DatasetError> {
    raw.into_iter()
        .map(|(key, way)| {
            check_key(RecordKind::Way, key, way.id)?;
            if way.nd.len() < 2 {
                return Err(DatasetError::ShortWay {
                    id: way.id,
                    len: way.nd.len(),
                });
            }
            if way.visible == Some(false) {
                warn!("way {} is not visible", way.id);
            }
            Ok(Way {
                id: way.id,
                nd: way.nd,
                tags: way.tag,
            })
        })
        .collect()
}

fn convert_nodes(raw: HashMap<u64, RawNode>) -> Result<NodeTable, DatasetError> {
    raw.into_iter()
        .map(|(key, node)| {
            check_key(RecordKind::Node, key, node.id)?;
            if !valid_coordinate(node.lat, node.lon) {
                return Err(DatasetError::InvalidCoordinate {
                    id: node.id,
                    lat: node.lat,
                    lon: node.lon,
                });
            }
            if node.visible == Some(false) {
                warn!("node {} is not visible", node.id);
            }
            Ok(Node {
                id: node.id,
                location: Coord {
                    x: node.lon,
                    y: node.lat,
                },
                tags: node.tag,
            })
        })
        .collect()
}

fn valid_coordinate(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}
