//! Turn a whole dataset into a drawable network map.

use std::collections::BTreeMap;

use log::{info, warn};

use crate::error::MapError;
use crate::model::{Dataset, Line, NodeTable};
use crate::path::{LinePath, PathInstruction};
use crate::projection::{Canvas, CanvasConfig, Projector};
use crate::reconstruct::reconstruct_sequences;
use crate::stations::{NameRewrites, StationMarker, StationRegistry};

/// Settings for [`render_network`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Canvas fitting parameters.
    pub canvas: CanvasConfig,
    /// Stop-name clean-ups keyed by network name.
    pub rewrites: NameRewrites,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            rewrites: NameRewrites::builtin(),
        }
    }
}

/// One line ready to draw.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineMap {
    /// Display name.
    pub name: String,
    /// Short reference code.
    #[cfg_attr(feature = "serde", serde(rename = "ref"))]
    pub reference: String,
    /// Stroke colour, when tagged.
    pub color: Option<String>,
    /// Path instructions covering every way of the line.
    pub path: Vec<PathInstruction>,
    /// Cleaned stop names in first-seen order, without duplicates.
    pub stop_names: Vec<String>,
}

/// Drawable rendition of a dataset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkMap {
    /// Network name carried over from the dataset.
    pub network_name: String,
    /// Canvas dimensions and attribution anchor.
    pub canvas: Canvas,
    /// Lines in dataset order.
    pub lines: Vec<LineMap>,
    /// Merged station markers keyed by station id.
    pub stations: BTreeMap<String, StationMarker>,
}

/// Render every line of `dataset` onto one canvas.
///
/// The projector is fitted once over all nodes. Lines are processed
/// independently, each filling its own station registry, and the registries
/// are merged into the network's under the station collision rule.
///
/// # Errors
/// Any [`MapError`] aborts the run: dangling way or node references,
/// unjoinable ways, unnamed stops, station collisions and an empty node set.
pub fn render_network(dataset: &Dataset, options: &RenderOptions) -> Result<NetworkMap, MapError> {
    let projector = Projector::from_nodes(&dataset.nodes, options.canvas)?;
    let mut stations = StationRegistry::default();
    let mut lines = Vec::with_capacity(dataset.lines.len());
    for line in &dataset.lines {
        info!("Processing line {}", line.name);
        let (line_map, line_stations) = render_line(dataset, line, &projector, options)?;
        stations.merge(line_stations)?;
        lines.push(line_map);
    }
    Ok(NetworkMap {
        network_name: dataset.network_name.clone(),
        canvas: projector.canvas(),
        lines,
        stations: stations.markers(),
    })
}

fn render_line(
    dataset: &Dataset,
    line: &Line,
    projector: &Projector,
    options: &RenderOptions,
) -> Result<(LineMap, StationRegistry), MapError> {
    let reconstruction = reconstruct_sequences(line.ways.keys().copied(), &dataset.ways)?;
    if reconstruction.components > 1 {
        warn!(
            "line {} splits into {} disconnected components",
            line.name, reconstruction.components
        );
    }
    let path = LinePath::from_sequences(
        &reconstruction.sequences,
        &dataset.ways,
        &dataset.nodes,
        projector,
    )?;
    let (stop_names, registry) = collect_stops(
        line,
        &dataset.nodes,
        projector,
        |name| options.rewrites.apply(&dataset.network_name, name),
    )?;
    Ok((
        LineMap {
            name: line.name.clone(),
            reference: line.reference.clone(),
            color: line.color.clone(),
            path: path.instructions(),
            stop_names,
        },
        registry,
    ))
}

fn collect_stops(
    line: &Line,
    nodes: &NodeTable,
    projector: &Projector,
    rewrite: impl Fn(&str) -> String,
) -> Result<(Vec<String>, StationRegistry), MapError> {
    let mut names: Vec<String> = Vec::new();
    let mut registry = StationRegistry::default();
    for &stop in &line.stops {
        let node = nodes.get(stop)?;
        let raw = node.name().ok_or_else(|| MapError::UnnamedStop {
            line: line.name.clone(),
            node: stop,
        })?;
        let name = rewrite(raw);
        registry.record(&name, projector.project(node.location))?;
        if !names.contains(&name) {
            names.push(name);
        }
    }
    Ok((names, registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use crate::model::{Node, Way};
    use crate::path::PathCommand;
    use crate::stations::{PARIS_METRO, StationError};
    use geo::Coord;
    use rstest::{fixture, rstest};

    /// Two lines crossing at a shared interchange.
    #[fixture]
    fn crossing() -> Dataset {
        let nodes = [
            Node::new(1, Coord { x: 2.30, y: 48.85 }).with_name("Ouest"),
            Node::new(2, Coord { x: 2.35, y: 48.85 }).with_name("Réaumur Sébastopol"),
            Node::new(3, Coord { x: 2.40, y: 48.85 }).with_name("Est"),
            Node::new(4, Coord { x: 2.35, y: 48.90 }).with_name("Nord"),
            Node::new(5, Coord { x: 2.35, y: 48.80 }).with_name("Sud"),
            Node::new(6, Coord { x: 2.351, y: 48.851 }).with_name("Réaumur - Sébastopol"),
        ]
        .into_iter()
        .collect();
        let ways = [
            Way::new(10, vec![1, 2]),
            Way::new(11, vec![2, 3]),
            Way::new(20, vec![4, 6]),
            Way::new(21, vec![6, 5]),
        ]
        .into_iter()
        .collect();
        let mut east_west = Line::new("Métro 1", "1");
        east_west.color = Some("#FFCD00".to_owned());
        for way in [11, 10] {
            east_west.add_way(way);
        }
        for stop in [1, 2, 3, 2] {
            east_west.add_stop(stop);
        }
        let mut north_south = Line::new("Métro 4", "4");
        for way in [20, 21] {
            north_south.add_way(way);
        }
        for stop in [4, 6, 5] {
            north_south.add_stop(stop);
        }
        Dataset {
            network_name: PARIS_METRO.to_owned(),
            lines: vec![east_west, north_south],
            ways,
            nodes,
        }
    }

    #[rstest]
    fn lines_keep_dataset_order_and_metadata(crossing: Dataset) {
        let map = render_network(&crossing, &RenderOptions::default()).expect("render");
        let refs: Vec<&str> = map.lines.iter().map(|line| line.reference.as_str()).collect();
        assert_eq!(refs, vec!["1", "4"]);
        assert_eq!(map.lines[0].color.as_deref(), Some("#FFCD00"));
        assert_eq!(map.lines[1].color, None);
        assert_eq!(map.network_name, PARIS_METRO);
    }

    #[rstest]
    fn each_line_draws_one_continuous_run(crossing: Dataset) {
        let map = render_network(&crossing, &RenderOptions::default()).expect("render");
        for line in &map.lines {
            let commands: Vec<PathCommand> = line.path.iter().map(|step| step.command).collect();
            assert_eq!(
                commands,
                vec![PathCommand::MoveTo, PathCommand::LineTo, PathCommand::LineTo]
            );
        }
    }

    #[rstest]
    fn rewritten_names_merge_across_lines(crossing: Dataset) {
        let map = render_network(&crossing, &RenderOptions::default()).expect("render");
        assert_eq!(
            map.lines[0].stop_names,
            vec!["Ouest", "Réaumur - Sébastopol", "Est"]
        );
        let interchange = map.stations.get("reaumursebastopol").expect("interchange");
        assert_eq!(interchange.name, "Réaumur - Sébastopol");
        assert_eq!(map.stations.len(), 5);
    }

    #[rstest]
    fn without_rewrites_the_spellings_collide(crossing: Dataset) {
        let options = RenderOptions {
            rewrites: NameRewrites::default(),
            ..RenderOptions::default()
        };
        let err = render_network(&crossing, &options).expect_err("collision");
        assert_eq!(
            err,
            MapError::Station(StationError::Collision {
                id: "reaumursebastopol".to_owned(),
                existing: "Réaumur Sébastopol".to_owned(),
                incoming: "Réaumur - Sébastopol".to_owned(),
            })
        );
    }

    #[rstest]
    fn unnamed_stop_is_fatal(mut crossing: Dataset) {
        crossing.nodes.insert(Node::new(3, Coord { x: 2.40, y: 48.85 }));
        let err = render_network(&crossing, &RenderOptions::default()).expect_err("unnamed");
        assert_eq!(
            err,
            MapError::UnnamedStop {
                line: "Métro 1".to_owned(),
                node: 3,
            }
        );
    }

    #[rstest]
    fn dangling_way_is_fatal(mut crossing: Dataset) {
        crossing.lines[1].add_way(99);
        let err = render_network(&crossing, &RenderOptions::default()).expect_err("dangling");
        assert_eq!(err, MapError::Lookup(LookupError::Way { id: 99 }));
    }

    #[rstest]
    fn canvas_matches_the_fitted_projector(crossing: Dataset) {
        let map = render_network(&crossing, &RenderOptions::default()).expect("render");
        let projector =
            Projector::from_nodes(&crossing.nodes, CanvasConfig::default()).expect("fit");
        assert_eq!(map.canvas, projector.canvas());
    }
}
