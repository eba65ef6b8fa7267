//! Typed configuration for the dual-axis snapshot bar chart.
//!
//! The rendering collaborator (a charting widget on the consumer side) is
//! handed this structure instead of an ad-hoc object literal, so the
//! contract between the analysis and the renderer is statically checked:
//! labels, per-series data, axis bindings, and display formatting are all
//! enumerated fields.

use serde::Serialize;

use crate::snapshot::SnapshotRow;

const AUTHORITY_AXIS: &str = "y-authority";
const BACKLINKS_AXIS: &str = "y-backlinks";

/// Which edge of the plot an axis is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSide {
    Left,
    Right,
}

/// A value axis. `min`/`max` of `None` leave the range to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub id: String,
    pub title: String,
    pub side: AxisSide,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// How a series' values are rendered for display (tooltips, data labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// One decimal place, e.g. `71.0`.
    OneDecimal,
    /// Integer with thousands grouping, e.g. `1,523,400`.
    Thousands,
}

impl ValueFormat {
    /// Renders a value for display under this format.
    #[must_use]
    pub fn render(self, value: f64) -> String {
        match self {
            ValueFormat::OneDecimal => format!("{value:.1}"),
            ValueFormat::Thousands => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let rounded = value.round().max(0.0) as u64;
                group_thousands(rounded)
            }
        }
    }
}

/// One bar series, bound to an axis by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub axis: String,
    pub data: Vec<f64>,
    pub format: ValueFormat,
}

/// The full chart configuration handed to the rendering collaborator.
///
/// `labels` and every dataset's `data` have equal length, one entry per
/// snapshot row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub axes: Vec<Axis>,
}

/// Reshapes snapshot rows into the dual-axis bar chart configuration:
/// `"Rank {n}"` labels, an authority series on a fixed 0–100 left axis, and
/// a backlink series on an unbounded right axis.
#[must_use]
pub fn snapshot_chart(rows: &[SnapshotRow]) -> ChartConfig {
    #[allow(clippy::cast_precision_loss)]
    let backlinks: Vec<f64> = rows.iter().map(|r| r.backlinks as f64).collect();
    ChartConfig {
        labels: rows.iter().map(|r| format!("Rank {}", r.rank)).collect(),
        datasets: vec![
            Dataset {
                label: "Authority Score".to_owned(),
                axis: AUTHORITY_AXIS.to_owned(),
                data: rows.iter().map(|r| r.authority).collect(),
                format: ValueFormat::OneDecimal,
            },
            Dataset {
                label: "Backlinks".to_owned(),
                axis: BACKLINKS_AXIS.to_owned(),
                data: backlinks,
                format: ValueFormat::Thousands,
            },
        ],
        axes: vec![
            Axis {
                id: AUTHORITY_AXIS.to_owned(),
                title: "Authority Score".to_owned(),
                side: AxisSide::Left,
                min: Some(0.0),
                max: Some(100.0),
            },
            Axis {
                id: BACKLINKS_AXIS.to_owned(),
                title: "Number of Backlinks".to_owned(),
                side: AxisSide::Right,
                min: None,
                max: None,
            },
        ],
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut groups = Vec::new();
    let mut idx = digits.len();
    while idx > 3 {
        groups.push(&digits[idx - 3..idx]);
        idx -= 3;
    }
    groups.push(&digits[..idx]);
    groups.reverse();
    groups.join(",")
}
