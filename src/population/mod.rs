//! Population reference index
//!
//! The population reference arrives as a semicolon-delimited UTF-8 file,
//! one row per (department, municipality, provider) with the assigned
//! hypertension and diabetes populations. This module parses it once per
//! run into a composite-key lookup used to fill indicator denominators.

pub mod cache;

use std::path::Path;

use log::info;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::model::{CellValue, GroupKey};
use crate::normalize::parse_decimal;
use crate::schema::{POPULATION_FIELDS, SchemaMap};

pub use cache::PopulationCache;

/// Assigned populations for one group key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PopulationRecord {
    /// Patients assigned to the hypertension program
    pub hypertension: u64,
    /// Patients assigned to the diabetes program
    pub diabetes: u64,
}

impl PopulationRecord {
    fn absorb(&mut self, other: PopulationRecord) {
        self.hypertension += other.hypertension;
        self.diabetes += other.diabetes;
    }
}

/// Composite-key population lookup plus grand totals
///
/// Read-only after construction. Duplicate keys in the source accumulate
/// into one record rather than overwriting each other.
#[derive(Debug, Clone, Default)]
pub struct PopulationIndex {
    entries: FxHashMap<GroupKey, PopulationRecord>,
    totals: PopulationRecord,
}

impl PopulationIndex {
    /// Parse the semicolon-delimited reference text
    ///
    /// An optional leading BOM is stripped. The required columns are
    /// resolved through the population alias table; any missing required
    /// column aborts with a configuration error. Count cells that fail to
    /// parse contribute 0 for that cell.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());

        let header_line = lines.next().unwrap_or("");
        let headers: Vec<CellValue> = header_line
            .split(';')
            .map(|h| CellValue::Text(h.to_string()))
            .collect();

        let map = SchemaMap::resolve_with(&POPULATION_FIELDS, &headers);
        let missing = map.missing_fields();
        if !missing.is_empty() {
            return Err(EngineError::configuration(format!(
                "population reference is missing required columns: {}",
                missing.join(", ")
            )));
        }

        let dept_col = map.column("departamento").unwrap_or_default();
        let muni_col = map.column("municipio").unwrap_or_default();
        let prov_col = map.column("prestador").unwrap_or_default();
        let hta_col = map.column("poblacion_hta").unwrap_or_default();
        let dm_col = map.column("poblacion_dm").unwrap_or_default();

        let mut entries: FxHashMap<GroupKey, PopulationRecord> = FxHashMap::default();
        let mut totals = PopulationRecord::default();

        for line in lines {
            let cells: Vec<&str> = line.split(';').collect();
            let field = |idx: usize| cells.get(idx).copied().unwrap_or("");
            let count = |idx: usize| {
                parse_decimal(field(idx))
                    .filter(|v| *v >= 0.0)
                    .map_or(0, |v| v as u64)
            };

            let key = GroupKey::new(field(dept_col), field(muni_col), field(prov_col));
            let record = PopulationRecord {
                hypertension: count(hta_col),
                diabetes: count(dm_col),
            };

            totals.absorb(record);
            entries.entry(key).or_default().absorb(record);
        }

        info!(
            "Population index built: {} groups, {} HTA / {} DM total",
            entries.len(),
            totals.hypertension,
            totals.diabetes
        );

        Ok(Self { entries, totals })
    }

    /// Load and parse the reference file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Population record for one group, if the key exists in the reference
    #[must_use]
    pub fn get(&self, key: &GroupKey) -> Option<&PopulationRecord> {
        self.entries.get(key)
    }

    /// Grand totals across all keys
    #[must_use]
    pub fn totals(&self) -> PopulationRecord {
        self.totals
    }

    /// Number of distinct group keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the reference contained no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
