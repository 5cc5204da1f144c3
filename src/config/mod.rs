//! Configuration for the indicator engine.

/// Configuration for an aggregation run
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Collect per-cell data quality issues into the result
    pub collect_issues: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            collect_issues: true,
        }
    }
}
