//! Post-processing of result tables: plain-English summaries and score statistics.

pub mod stats;
pub mod summary;

pub use stats::{column_stats_file, ColumnStats};
pub use summary::{summarize_file, RiskLevel};
