//! A Rust library for computing chronic-disease management indicators from
//! monthly clinical extracts, with header alias resolution, locale-tolerant
//! value normalization and population-denominator merging.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod kpi;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod population;
pub mod schema;

// Re-export the most common types for easier use
// Core types
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use model::{CellValue, DataMatrix, DataQualityIssue, GroupKey, RawRecord};

// Aggregation results
pub use aggregate::{GroupSummary, KpiAccumulator, ProcessingResult};

// Indicator evaluation
pub use kpi::{Indicator, ReportingWindows, RowFields, evaluate_row};

// Population reference
pub use population::{PopulationCache, PopulationIndex, PopulationRecord};

// Orchestration
pub use pipeline::{ConsoleProgress, NoopProgress, Pipeline, ProgressSink, RunParameters};
pub use schema::SchemaMap;
