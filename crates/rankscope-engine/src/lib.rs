pub mod chart;
pub mod error;
pub mod market;
pub mod rankings;
pub mod snapshot;

pub use chart::{snapshot_chart, Axis, AxisSide, ChartConfig, Dataset, ValueFormat};
pub use error::EngineError;
pub use market::MarketEngine;
pub use rankings::{analyze_performance, analyze_rankings, DomainPerformance};
pub use snapshot::{build_snapshot_rows, SnapshotRow, SNAPSHOT_QUERY};
