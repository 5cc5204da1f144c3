//! Pipeline orchestration
//!
//! Sequences one aggregation run: population load, schema resolution, the
//! grouping fatal-check, window derivation, the row pass, and result
//! assembly. Fatal problems abort with a single descriptive error; no
//! partial result escapes this module.

pub mod progress;

use std::path::Path;

use log::{info, warn};

use crate::aggregate::{ProcessingResult, aggregate};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::kpi::ReportingWindows;
use crate::model::{DataMatrix, IssueLog};
use crate::population::{PopulationCache, PopulationIndex};
use crate::schema::SchemaMap;

pub use progress::{ConsoleProgress, NoopProgress, ProgressSink};

/// Caller-supplied reporting period
#[derive(Debug, Clone, Copy)]
pub struct RunParameters {
    /// Target year of the cutoff
    pub year: i32,
    /// Target cutoff month, 1-12
    pub cutoff_month: u32,
}

/// Orchestrator for indicator aggregation runs
///
/// Owns the population cache, so repeated runs against an unchanged
/// reference file skip the reparse.
#[derive(Debug, Default)]
pub struct Pipeline {
    config: EngineConfig,
    population_cache: PopulationCache,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            population_cache: PopulationCache::new(),
        }
    }

    /// Run one aggregation against a population reference file
    ///
    /// # Errors
    /// Fails on an unreadable reference file, unresolved required
    /// population columns, unresolved grouping columns with non-empty
    /// population data, or a cutoff month outside 1-12.
    pub fn run(
        &mut self,
        matrix: DataMatrix,
        population_path: &Path,
        params: &RunParameters,
        sink: &mut dyn ProgressSink,
    ) -> Result<ProcessingResult> {
        let population = self.population_cache.load(population_path)?;
        run_with_index(&self.config, matrix, population, params, sink)
    }

    /// Run one aggregation against an already-built population index
    pub fn run_with_index(
        &self,
        matrix: DataMatrix,
        population: &PopulationIndex,
        params: &RunParameters,
        sink: &mut dyn ProgressSink,
    ) -> Result<ProcessingResult> {
        run_with_index(&self.config, matrix, population, params, sink)
    }
}

fn run_with_index(
    config: &EngineConfig,
    matrix: DataMatrix,
    population: &PopulationIndex,
    params: &RunParameters,
    sink: &mut dyn ProgressSink,
) -> Result<ProcessingResult> {
    info!(
        "Starting aggregation run for cutoff {}-{:02}",
        params.year, params.cutoff_month
    );

    let windows = ReportingWindows::for_cutoff(params.year, params.cutoff_month)?;

    let schema = SchemaMap::resolve(&matrix.headers);
    if !schema.missing_fields().is_empty() {
        warn!(
            "{} canonical fields missing from input headers: {}",
            schema.missing_fields().len(),
            schema.missing_fields().join(", ")
        );
    }

    // With population data present, untrusted grouping poisons the join
    if !population.is_empty() && !schema.has_grouping() {
        return Err(EngineError::configuration(format!(
            "grouping columns could not be resolved: {}",
            schema.missing_grouping().join(", ")
        )));
    }

    let mut issues = IssueLog::new(config.collect_issues);
    let (totals, groups, row_count) =
        aggregate(&matrix, &schema, &windows, population, &mut issues, sink);

    if !issues.is_empty() {
        info!("Run completed with {} data quality issues", issues.len());
    }

    Ok(ProcessingResult {
        totals,
        row_count,
        missing_fields: schema.missing_fields().to_vec(),
        groups,
        rows: matrix.rows,
        schema,
        issues: issues.into_issues(),
    })
}
