//! Indicator aggregation
//!
//! Folds per-row indicator contributions into one accumulator per group
//! key plus a global accumulator, fills the population denominators from
//! the reference index after the row pass, and assembles the immutable
//! `ProcessingResult` handed to the reporting collaborators.

use itertools::Itertools;
use log::info;
use rustc_hash::FxHashMap;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::kpi::{Indicator, ReportingWindows, RowFields, evaluate_row};
use crate::model::{DataMatrix, DataQualityIssue, GroupKey, IssueLog, RawRecord};
use crate::normalize::cell_text;
use crate::pipeline::progress::ProgressSink;
use crate::population::PopulationIndex;
use crate::schema::SchemaMap;

/// Counts for the full indicator set
///
/// Mutated only by addition, so merging partial accumulators is plain
/// element-wise sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiAccumulator {
    counts: [u64; Indicator::COUNT],
}

impl Default for KpiAccumulator {
    fn default() -> Self {
        Self {
            counts: [0; Indicator::COUNT],
        }
    }
}

impl KpiAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count of one indicator
    #[must_use]
    pub fn get(&self, indicator: Indicator) -> u64 {
        self.counts[indicator.index()]
    }

    /// Add to one indicator
    pub fn add(&mut self, indicator: Indicator, amount: u64) {
        self.counts[indicator.index()] += amount;
    }

    /// Fold one row's fired indicators in
    pub fn absorb(&mut self, fired: &[Indicator]) {
        for indicator in fired {
            self.add(*indicator, 1);
        }
    }

    /// Element-wise merge of another accumulator
    pub fn merge(&mut self, other: &KpiAccumulator) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *mine += theirs;
        }
    }
}

impl Serialize for KpiAccumulator {
    /// Serialize as a map in the fixed indicator key order
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Indicator::COUNT))?;
        for indicator in Indicator::ALL {
            map.serialize_entry(indicator.key(), &self.get(indicator))?;
        }
        map.end()
    }
}

/// Accumulated indicators and row count for one group key
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub key: GroupKey,
    pub row_count: u64,
    pub indicators: KpiAccumulator,
}

/// The outcome of one aggregation run
///
/// Assembled once, immutable afterwards. Groups are sorted by
/// (department, municipality, provider) so identical inputs serialize to
/// identical bytes.
#[derive(Debug)]
pub struct ProcessingResult {
    /// Global accumulator across all rows
    pub totals: KpiAccumulator,
    /// Number of data rows processed
    pub row_count: u64,
    /// Canonical fields absent from the input headers
    pub missing_fields: Vec<&'static str>,
    /// Per-group summaries in lexicographic key order
    pub groups: Vec<GroupSummary>,
    /// The raw rows, kept for the export collaborators
    pub rows: Vec<RawRecord>,
    /// The resolved schema map
    pub schema: SchemaMap,
    /// Non-fatal data quality observations, when collection is enabled
    pub issues: Vec<DataQualityIssue>,
}

impl Serialize for ProcessingResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ProcessingResult", 7)?;
        state.serialize_field("totals", &self.totals)?;
        state.serialize_field("row_count", &self.row_count)?;
        state.serialize_field("missing_fields", &self.missing_fields)?;
        state.serialize_field("groups", &self.groups)?;
        state.serialize_field("rows", &self.rows)?;
        state.serialize_field("schema", &self.schema)?;
        state.serialize_field("issues", &self.issues)?;
        state.end()
    }
}

/// Run the aggregation loop over a decoded matrix
///
/// One evaluation per row, folded into both the group and the global
/// accumulator. Rows with unresolved grouping cells land in the `N/A`
/// bucket, never on the floor. Population denominators are filled in once
/// after the loop: per group by index lookup, globally from the reference
/// grand totals.
#[must_use]
pub fn aggregate(
    matrix: &DataMatrix,
    schema: &SchemaMap,
    windows: &ReportingWindows,
    population: &PopulationIndex,
    issues: &mut IssueLog,
    progress: &mut dyn ProgressSink,
) -> (KpiAccumulator, Vec<GroupSummary>, u64) {
    let total_rows = matrix.rows.len();
    let step = (total_rows / 100).max(1);

    progress.emit(0, &format!("Aggregating {total_rows} rows"));

    let mut global = KpiAccumulator::new();
    let mut groups: FxHashMap<GroupKey, GroupSummary> = FxHashMap::default();

    for (row_index, row) in matrix.rows.iter().enumerate() {
        let key = group_key(row, schema);
        let fields = RowFields::extract(row, schema, row_index, issues);
        let fired = evaluate_row(&fields, windows);

        global.absorb(&fired);
        let group = groups.entry(key.clone()).or_insert_with(|| GroupSummary {
            key,
            row_count: 0,
            indicators: KpiAccumulator::new(),
        });
        group.indicators.absorb(&fired);
        group.row_count += 1;

        if (row_index + 1) % step == 0 {
            let percentage = ((row_index + 1) * 100 / total_rows) as u8;
            progress.emit(percentage, &format!("Row {} of {total_rows}", row_index + 1));
        }
    }

    // Population denominators come from the reference, not from the rows
    for group in groups.values_mut() {
        if let Some(record) = population.get(&group.key) {
            group.indicators.add(Indicator::PoblacionHta, record.hypertension);
            group.indicators.add(Indicator::PoblacionDm, record.diabetes);
        }
    }
    let totals = population.totals();
    global.add(Indicator::PoblacionHta, totals.hypertension);
    global.add(Indicator::PoblacionDm, totals.diabetes);

    let sorted: Vec<GroupSummary> = groups
        .into_values()
        .sorted_by(|a, b| a.key.cmp(&b.key))
        .collect();

    info!(
        "Aggregated {} rows into {} groups",
        total_rows,
        sorted.len()
    );
    progress.emit(100, "Aggregation complete");

    (global, sorted, total_rows as u64)
}

/// Resolve the group key of one row
///
/// An unresolved grouping column or a blank cell yields the `N/A`
/// component; `GroupKey::new` handles the folding.
fn group_key(row: &RawRecord, schema: &SchemaMap) -> GroupKey {
    let component = |key: &str| schema.cell(row, key).map(cell_text).unwrap_or_default();
    GroupKey::new(
        &component("departamento"),
        &component("municipio"),
        &component("prestador"),
    )
}
