//! Schema resolution for free-text extract headers
//!
//! The monthly extracts arrive with header names that vary by provider and
//! reporting period. This module maps each canonical field to a column index
//! by trying its alias list against the folded header text, and reports the
//! fields that could not be resolved.

pub mod fields;

use rustc_hash::FxHashMap;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::model::{CellValue, RawRecord};
use crate::normalize::{cell_text, fold_text};

pub use fields::{CANONICAL_FIELDS, FieldDef, GROUPING_KEYS, POPULATION_FIELDS};

/// Resolved mapping from canonical field keys to column indexes
///
/// Built once per run. Unresolved fields have no entry and appear in the
/// missing-field list instead; readers degrade to absent values for them.
#[derive(Debug, Clone)]
pub struct SchemaMap {
    columns: FxHashMap<&'static str, usize>,
    missing: Vec<&'static str>,
}

impl SchemaMap {
    /// Resolve the canonical extract fields against a header row
    ///
    /// For each field the aliases are tried in order; the first alias whose
    /// folded form equals a folded header cell fixes the column for the run.
    /// Total: unresolvable fields are collected, never an error.
    #[must_use]
    pub fn resolve(headers: &[CellValue]) -> Self {
        Self::resolve_with(&CANONICAL_FIELDS, headers)
    }

    /// Resolve an arbitrary field table against a header row
    #[must_use]
    pub fn resolve_with(defs: &[FieldDef], headers: &[CellValue]) -> Self {
        let folded: Vec<String> = headers.iter().map(cell_text).collect();
        let mut columns = FxHashMap::default();
        let mut missing = Vec::new();

        for def in defs {
            let found = def.aliases.iter().find_map(|alias| {
                let alias = fold_text(alias);
                folded.iter().position(|h| *h == alias)
            });
            match found {
                Some(idx) => {
                    columns.insert(def.key, idx);
                }
                None => {
                    if !missing.contains(&def.key) {
                        missing.push(def.key);
                    }
                }
            }
        }

        Self { columns, missing }
    }

    /// Column index of a canonical field, `None` when unresolved
    #[must_use]
    pub fn column(&self, key: &str) -> Option<usize> {
        self.columns.get(key).copied()
    }

    /// Fields that could not be resolved, in canonical table order
    #[must_use]
    pub fn missing_fields(&self) -> &[&'static str] {
        &self.missing
    }

    /// Whether every grouping field resolved to a column
    #[must_use]
    pub fn has_grouping(&self) -> bool {
        GROUPING_KEYS.iter().all(|k| self.columns.contains_key(k))
    }

    /// Grouping fields that failed to resolve
    #[must_use]
    pub fn missing_grouping(&self) -> Vec<&'static str> {
        GROUPING_KEYS
            .iter()
            .filter(|k| !self.columns.contains_key(*k))
            .copied()
            .collect()
    }

    /// The cell of a canonical field within a row, if the field resolved
    /// and the row is long enough
    #[must_use]
    pub fn cell<'a>(&self, row: &'a RawRecord, key: &str) -> Option<&'a CellValue> {
        self.column(key).and_then(|idx| row.get(idx))
    }
}

impl Serialize for SchemaMap {
    /// Serialize columns in canonical table order so identical runs produce
    /// identical bytes
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SchemaMap", 2)?;
        let columns: Vec<(&'static str, Option<usize>)> = CANONICAL_FIELDS
            .iter()
            .map(|def| (def.key, self.column(def.key)))
            .collect();
        state.serialize_field("columns", &columns)?;
        state.serialize_field("missing", &self.missing)?;
        state.end()
    }
}
