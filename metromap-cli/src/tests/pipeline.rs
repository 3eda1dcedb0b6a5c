//! Pipeline tests covering the render command flow.

use super::helpers::{CROSSING_DATASET, Workspace};
use super::*;
use camino::Utf8PathBuf;
use crate::render::{DatasetFormat, RenderConfig, run_render_with};
use metromap_core::{CanvasConfig, MapError, StationError};
use rstest::{fixture, rstest};
use serde_json::Value;
use std::fs;

const RELATION_DUMP: &str = r##"{
  "network_name": "S-Bahnlinien in Berlin",
  "route_masters": [
    {"id": 1, "tag": {"name": "S1", "ref": "S1", "colour": "#DE4DA4"},
     "member": [{"type": "relation", "ref": 2, "role": ""}]}
  ],
  "relations": {
    "2": {"id": 2, "tag": {}, "member": [
      {"type": "node", "ref": 10, "role": "stop"},
      {"type": "way", "ref": 100, "role": ""},
      {"type": "node", "ref": 11, "role": "stop"}
    ]}
  },
  "ways": {"100": {"id": 100, "nd": [10, 11]}},
  "nodes": {
    "10": {"id": 10, "lat": 52.52, "lon": 13.37, "tag": {"name": "S Potsdamer Platz"}},
    "11": {"id": 11, "lat": 52.53, "lon": 13.38, "tag": {"name": "S Oranienburger Straße (Berlin)"}}
  }
}"##;

fn config_for(dataset: Utf8PathBuf) -> RenderConfig {
    RenderConfig {
        dataset,
        format: DatasetFormat::Dataset,
        output: None,
        canvas: CanvasConfig::default(),
        rewrites: None,
    }
}

fn render_to_json(config: &RenderConfig) -> Value {
    let mut buffer = Vec::new();
    run_render_with(config, &mut buffer).expect("render should succeed");
    serde_json::from_slice(&buffer).expect("output should be JSON")
}

#[fixture]
fn workspace() -> Workspace {
    Workspace::new()
}

#[rstest]
#[case(CROSSING_DATASET, "/lines/0/color", "#FFCD00")]
#[case(RELATION_DUMP, "/route_masters/0/tag/colour", "#DE4DA4")]
fn fixtures_keep_hex_colours_intact(
    #[case] fixture: &str,
    #[case] pointer: &str,
    #[case] expected: &str,
) {
    let value: Value = serde_json::from_str(fixture).expect("fixture should be JSON");
    assert_eq!(value.pointer(pointer).and_then(Value::as_str), Some(expected));
}

#[rstest]
fn render_writes_lines_stations_and_canvas(workspace: Workspace) {
    let dataset = workspace.write("paris.json", CROSSING_DATASET);
    let output = render_to_json(&config_for(dataset));

    assert_eq!(output["network_name"], "Métro de Paris");
    assert_eq!(output["lines"][0]["ref"], "1");
    assert_eq!(output["lines"][0]["color"], "#FFCD00");
    assert_eq!(output["lines"][0]["path"][0]["command"], "M");
    assert_eq!(output["lines"][0]["path"][1]["command"], "L");
    assert_eq!(
        output["lines"][0]["stop_names"],
        serde_json::json!(["Ouest", "Réaumur - Sébastopol", "Est"])
    );
    assert_eq!(
        output["stations"]["reaumursebastopol"]["name"],
        "Réaumur - Sébastopol"
    );
    assert!(output["stations"]["reaumursebastopol"]["x"].is_number());
    assert_eq!(output["canvas"]["view_box"]["min_x"], -5.0);
}

#[rstest]
fn extra_rewrites_apply_after_builtin_rules(workspace: Workspace) {
    let dataset = workspace.write("paris.json", CROSSING_DATASET);
    let rules = workspace.write(
        "rules.json",
        r#"{"Métro de Paris": [{"rule": "rename", "from": "Est", "to": "Gare de l'Est"}]}"#,
    );
    let config = RenderConfig {
        rewrites: Some(rules),
        ..config_for(dataset)
    };
    let output = render_to_json(&config);
    assert_eq!(output["lines"][0]["stop_names"][2], "Gare de l'Est");
    assert!(output["stations"]["garedelest"].is_object());
}

#[rstest]
fn relation_dumps_render_with_network_rewrites(workspace: Workspace) {
    let dataset = workspace.write("berlin.json", RELATION_DUMP);
    let config = RenderConfig {
        format: DatasetFormat::Relations,
        ..config_for(dataset)
    };
    let output = render_to_json(&config);
    assert_eq!(output["lines"][0]["name"], "S1");
    assert_eq!(output["lines"][0]["color"], "#DE4DA4");
    assert_eq!(
        output["lines"][0]["stop_names"],
        serde_json::json!(["Potsdamer Platz", "Oranienburger Straße"])
    );
}

#[rstest]
fn station_collisions_abort_the_render(workspace: Workspace) {
    let dataset = workspace.write(
        "other.json",
        &CROSSING_DATASET.replace("Métro de Paris", "Some Other Network"),
    );
    let mut buffer = Vec::new();
    let err = run_render_with(&config_for(dataset), &mut buffer).expect_err("collision");
    match err {
        CliError::Render(MapError::Station(StationError::Collision { id, .. })) => {
            assert_eq!(id, "reaumursebastopol");
        }
        other => panic!("expected a station collision, found {other:?}"),
    }
    assert!(buffer.is_empty(), "nothing is written on failure");
}

#[rstest]
fn run_render_writes_the_output_file(workspace: Workspace) {
    let dataset = workspace.write("paris.json", CROSSING_DATASET);
    let output = workspace.root().join("out/maps/paris-map.json");
    let args = RenderArgs {
        dataset: Some(dataset),
        output: Some(output.clone()),
        ..RenderArgs::default()
    };
    run_render(args).expect("render should succeed");
    let written = fs::read_to_string(output.as_std_path()).expect("output file");
    let value: Value = serde_json::from_str(&written).expect("output should be JSON");
    assert_eq!(value["lines"].as_array().map(Vec::len), Some(2));
    assert!(written.ends_with('\n'));
}
