//! Snapshot tests for headless replays.
//!
//! Uses insta for YAML snapshot testing of which components each replayed
//! native event reached. These tests detect regressions in delivery order.

use serde::Serialize;
use tuicast::replay::{ReplayStep, ReplayTrace, WindowState, replay};

/// Per-step delivery, without the native payload.
#[derive(Debug, Serialize)]
struct DeliverySnapshot {
    step: usize,
    event: String,
    fired: bool,
    delivered: Vec<String>,
}

fn deliveries(trace: &ReplayTrace) -> Vec<DeliverySnapshot> {
    trace
        .entries
        .iter()
        .map(|entry| DeliverySnapshot {
            step: entry.step,
            event: entry.event.to_string(),
            fired: entry.fired,
            delivered: entry.delivered.clone(),
        })
        .collect()
}

fn steps(specs: &[&str]) -> Vec<ReplayStep> {
    specs.iter().map(|s| s.parse().unwrap()).collect()
}

fn default_window() -> WindowState {
    WindowState {
        width: 80,
        height: 24,
        content_height: 200,
        scroll_y: 0,
    }
}

#[test]
fn snapshot_mixed_replay() {
    let trace = replay(
        default_window(),
        &steps(&["scroll:100", "scroll:100", "resize:120x40", "dismiss", "scroll:0"]),
    )
    .unwrap();

    let snapshot = deliveries(&trace);
    insta::assert_yaml_snapshot!("mixed_replay", snapshot);
}

#[test]
fn snapshot_shrinking_content_clamps_scroll() {
    let trace = replay(default_window(), &steps(&["scroll:190", "resize:80x100"])).unwrap();

    insta::assert_yaml_snapshot!("shrinking_content_clamps_scroll", trace);
}
