//! File-based inputs and outputs around the estimation core: scripted
//! scenarios in, cost breakdowns out.

pub mod export;
pub mod scenario;

pub use export::{BreakdownRow, CsvBreakdownExporter, breakdown_rows, write_breakdown};
pub use scenario::{ReplaySummary, Scenario, ScenarioError, ScenarioLoader, ScenarioRecord};
