//! Location topics for pub/sub routing.
//!
//! Coordinates are bucketed into a 0.1 degree grid; each cell is addressed by
//! a `"{lat}_{lon}"` topic. Subscribers listen on their cell and the eight
//! surrounding cells so broadcasts near a cell edge still reach them.

use hashbrown::HashSet;
use serde::Serialize;
use tracing::debug;

use crate::models::Coordinate;

/// Grid spacing in degrees
pub const GRID_STEP_DEGREES: f64 = 0.1;

/// Neighbour offsets in subscription order, own cell in the middle
const NEIGHBOR_OFFSETS: [(f64, f64); 9] = [
    (GRID_STEP_DEGREES, GRID_STEP_DEGREES),
    (GRID_STEP_DEGREES, 0.0),
    (GRID_STEP_DEGREES, -GRID_STEP_DEGREES),
    (0.0, GRID_STEP_DEGREES),
    (0.0, 0.0),
    (0.0, -GRID_STEP_DEGREES),
    (-GRID_STEP_DEGREES, GRID_STEP_DEGREES),
    (-GRID_STEP_DEGREES, 0.0),
    (-GRID_STEP_DEGREES, -GRID_STEP_DEGREES),
];

/// Round to the nearest grid line, ties away from zero.
pub fn quantize(value: f64) -> f64 {
    let factor = 1.0 / GRID_STEP_DEGREES;
    // + 0.0 turns -0.0 into 0.0
    (value * factor).round() / factor + 0.0
}

/// Render with at least one fractional digit: `48.1`, `0.0`, `-12.0`
fn format_grid_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// One cell of the topic grid, identified by its quantized corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridCell {
    pub lat: f64,
    pub lon: f64,
}

impl GridCell {
    pub fn containing(coordinate: &Coordinate) -> Self {
        Self {
            lat: quantize(coordinate.lat),
            lon: quantize(coordinate.lon),
        }
    }

    pub fn topic(&self) -> String {
        format!(
            "{}_{}",
            format_grid_value(self.lat),
            format_grid_value(self.lon)
        )
    }
}

/// Topic of the grid cell holding `coordinate`
pub fn topic_for(coordinate: &Coordinate) -> String {
    GridCell::containing(coordinate).topic()
}

/// Topics of the cell holding `coordinate` and its eight neighbours.
pub fn neighboring_topics(coordinate: &Coordinate) -> Vec<String> {
    NEIGHBOR_OFFSETS
        .iter()
        .map(|(dlat, dlon)| {
            topic_for(&Coordinate::from_raw(
                coordinate.lat + dlat,
                coordinate.lon + dlon,
            ))
        })
        .collect()
}

/// Subscription update after a device moved to another grid cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopicChange {
    pub unsubscribe: Vec<String>,
    pub subscribe: Vec<String>,
}

/// Work out which topics to drop and join when moving from `previous` to
/// `current`.
///
/// Returns `None` while both positions fall in the same cell. Without a
/// previous position the comparison is against the `0.0_0.0` cell, so a
/// first fix right there also yields `None`. Topics in both neighbourhoods
/// are left out of both lists.
pub fn topic_change(previous: Option<&Coordinate>, current: &Coordinate) -> Option<TopicChange> {
    let previous_cell = previous
        .map(GridCell::containing)
        .unwrap_or(GridCell { lat: 0.0, lon: 0.0 });
    let current_cell = GridCell::containing(current);

    if previous_cell == current_cell {
        return None;
    }

    let old_topics = previous.map(neighboring_topics).unwrap_or_default();
    let new_topics =
        neighboring_topics(&Coordinate::from_raw(current_cell.lat, current_cell.lon));

    let old_set: HashSet<&str> = old_topics.iter().map(String::as_str).collect();
    let new_set: HashSet<&str> = new_topics.iter().map(String::as_str).collect();

    let unsubscribe: Vec<String> = old_topics
        .iter()
        .filter(|t| !new_set.contains(t.as_str()))
        .cloned()
        .collect();
    let subscribe: Vec<String> = new_topics
        .iter()
        .filter(|t| !old_set.contains(t.as_str()))
        .cloned()
        .collect();

    debug!(
        "Topic cell changed to {}: -{} +{}",
        current_cell.topic(),
        unsubscribe.len(),
        subscribe.len()
    );

    Some(TopicChange {
        unsubscribe,
        subscribe,
    })
}
