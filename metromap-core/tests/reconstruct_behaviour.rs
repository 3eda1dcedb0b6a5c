#![expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]

//! Behavioural tests for way-sequence reconstruction.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::{cell::RefCell, fs, path::PathBuf};

use metromap_core::{
    LookupError, MapError, NodeId, Reconstruction, WayId, WayTable, reconstruct_sequences,
};

mod support;

use support::{all_ways, covered_ways, describe, is_connected, oriented_steps, way_table};

const JUNCTION: NodeId = 2;
const DANGLING_WAY: WayId = 404;

/// World state for reconstruction scenarios.
#[derive(Debug, Default)]
struct ReconstructWorld {
    ways: RefCell<WayTable>,
    line: RefCell<Vec<WayId>>,
    outcome: RefCell<Option<Result<Reconstruction, MapError>>>,
}

impl ReconstructWorld {
    fn load(&self, ways: WayTable, line: Vec<WayId>) {
        self.ways.replace(ways);
        self.line.replace(line);
        self.outcome.replace(None);
    }

    fn reconstruction(&self) -> Reconstruction {
        self.outcome
            .borrow()
            .as_ref()
            .expect("reconstruction was attempted")
            .as_ref()
            .expect("expected a successful reconstruction")
            .clone()
    }
}

#[fixture]
fn world() -> ReconstructWorld {
    ReconstructWorld::default()
}

#[given("a line whose three ways meet at one junction")]
fn branching_line(world: &ReconstructWorld) {
    world.load(
        way_table(&[(10, &[1, 5, JUNCTION]), (11, &[JUNCTION, 3]), (12, &[4, JUNCTION])]),
        vec![12, 10, 11],
    );
}

#[given("a line forming a closed ring of four ways")]
fn ring_line(world: &ReconstructWorld) {
    world.load(
        way_table(&[(1, &[1, 2]), (2, &[3, 2]), (3, &[3, 4]), (4, &[4, 1])]),
        vec![3, 1, 4, 2],
    );
}

#[given("a line made of two separate stretches")]
fn disconnected_line(world: &ReconstructWorld) {
    world.load(
        way_table(&[(1, &[1, 2]), (2, &[2, 3]), (3, &[10, 11])]),
        vec![1, 2, 3],
    );
}

#[given("a line referencing a way that is not in the lookup")]
fn dangling_line(world: &ReconstructWorld) {
    world.load(way_table(&[(1, &[1, 2])]), vec![1, DANGLING_WAY]);
}

#[when("the line is reconstructed")]
fn reconstruct(world: &ReconstructWorld) {
    let outcome = {
        let ways = world.ways.borrow();
        let line = world.line.borrow();
        reconstruct_sequences(line.iter().copied(), &ways)
    };
    world.outcome.replace(Some(outcome));
}

#[then("{count:usize} sequences are produced")]
fn sequence_count(world: &ReconstructWorld, count: usize) {
    let reconstruction = world.reconstruction();
    let described: Vec<String> = reconstruction.sequences.iter().map(describe).collect();
    assert_eq!(
        reconstruction.sequences.len(),
        count,
        "unexpected sequences: {described:?}"
    );
}

#[then("{count:usize} components are reported")]
fn component_count(world: &ReconstructWorld, count: usize) {
    assert_eq!(world.reconstruction().components, count);
}

#[then("every sequence touches the junction")]
fn sequences_touch_junction(world: &ReconstructWorld) {
    let ways = world.ways.borrow();
    for sequence in &world.reconstruction().sequences {
        let steps = oriented_steps(sequence, &ways);
        let starts = steps.first().map(|(entry, _)| *entry);
        let ends = steps.last().map(|(_, exit)| *exit);
        assert!(
            starts == Some(JUNCTION) || ends == Some(JUNCTION),
            "sequence {} does not touch the junction",
            describe(sequence)
        );
    }
}

#[then("the sequence returns to its starting node")]
fn sequence_is_closed(world: &ReconstructWorld) {
    let ways = world.ways.borrow();
    let reconstruction = world.reconstruction();
    let sequence = reconstruction.sequences.first().expect("one sequence");
    assert!(is_connected(sequence, &ways), "ring must be continuous");
    let steps = oriented_steps(sequence, &ways);
    assert_eq!(
        steps.first().map(|(entry, _)| *entry),
        steps.last().map(|(_, exit)| *exit)
    );
}

#[then("every way is used exactly once")]
fn ways_partitioned(world: &ReconstructWorld) {
    let ways = world.ways.borrow();
    let reconstruction = world.reconstruction();
    assert_eq!(covered_ways(&reconstruction.sequences), all_ways(&ways));
    for sequence in &reconstruction.sequences {
        assert!(is_connected(sequence, &ways), "{}", describe(sequence));
    }
}

#[then("a missing way error names the way")]
fn missing_way_error(world: &ReconstructWorld) {
    let borrowed = world.outcome.borrow();
    match borrowed.as_ref().expect("reconstruction was attempted") {
        Err(MapError::Lookup(LookupError::Way { id })) => assert_eq!(*id, DANGLING_WAY),
        other => panic!("expected a missing way error, got {other:?}"),
    }
}

#[scenario(path = "tests/features/reconstruct.feature", index = 0)]
fn splitting_branching_line(world: ReconstructWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/reconstruct.feature", index = 1)]
fn closing_loop(world: ReconstructWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/reconstruct.feature", index = 2)]
fn keeping_disconnected_pieces(world: ReconstructWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/reconstruct.feature", index = 3)]
fn rejecting_dangling_way(world: ReconstructWorld) {
    let _ = world;
}

#[test]
fn scenario_indices_follow_feature_order() {
    let feature =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/features/reconstruct.feature");
    let contents = fs::read_to_string(&feature).unwrap_or_else(|err| {
        panic!("failed to read feature file {feature:?}: {err}");
    });
    let titles: Vec<&str> = contents
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Scenario: "))
        .collect();
    assert_eq!(
        titles,
        vec![
            "splitting a branching line",
            "closing a loop",
            "keeping disconnected pieces",
            "rejecting a dangling way reference",
        ]
    );
}
