//! Normalized per-row field view
//!
//! Reads each canonical column through the schema map and the value
//! normalizers into the small typed struct the evaluator works on. A
//! missing column yields the absent value for its field; a present but
//! unparseable cell additionally leaves a data quality record.

use chrono::NaiveDate;

use crate::model::{CellValue, IssueKind, IssueLog, RawRecord};
use crate::normalize::{cell_text, parse_date, parse_number};
use crate::schema::SchemaMap;

/// One row of the extract, normalized for evaluation
#[derive(Debug, Clone, Default)]
pub struct RowFields {
    /// Age in years
    pub age: Option<f64>,
    /// Hypertension diagnosis flag, folded ("SI", "NO", or other)
    pub hta: String,
    /// Diabetes diagnosis flag, folded
    pub dm: String,
    /// Last systolic reading
    pub systolic: Option<f64>,
    /// Last diastolic reading
    pub diastolic: Option<f64>,
    /// Date of the last blood pressure reading
    pub last_reading: Option<NaiveDate>,
    /// Glycated hemoglobin result
    pub hba1c: Option<f64>,
    /// Date of the glycated hemoglobin test
    pub hba1c_date: Option<NaiveDate>,
    /// Whether the creatinine date cell held anything at all
    pub creatinine_requested: bool,
    /// Parsed creatinine test date
    pub creatinine_date: Option<NaiveDate>,
    /// Parsed microalbuminuria test date
    pub microalbuminuria_date: Option<NaiveDate>,
    /// Kidney disease stage, folded categorical text
    pub kidney_stage: String,
}

impl RowFields {
    /// Extract the evaluator's view of one row
    ///
    /// `row_index` only labels data quality records.
    #[must_use]
    pub fn extract(
        row: &RawRecord,
        schema: &SchemaMap,
        row_index: usize,
        issues: &mut IssueLog,
    ) -> Self {
        let text = |key: &str| schema.cell(row, key).map(cell_text).unwrap_or_default();

        Self {
            age: number_field(row, schema, "edad", row_index, issues),
            hta: text("hta"),
            dm: text("dm"),
            systolic: number_field(row, schema, "tension_sistolica", row_index, issues),
            diastolic: number_field(row, schema, "tension_diastolica", row_index, issues),
            last_reading: date_field(row, schema, "fecha_ultima_toma", row_index, issues),
            hba1c: number_field(row, schema, "hba1c", row_index, issues),
            hba1c_date: date_field(row, schema, "fecha_hba1c", row_index, issues),
            creatinine_requested: schema
                .cell(row, "fecha_creatinina")
                .is_some_and(|c| !c.is_blank()),
            creatinine_date: date_field(row, schema, "fecha_creatinina", row_index, issues),
            microalbuminuria_date: date_field(
                row,
                schema,
                "fecha_microalbuminuria",
                row_index,
                issues,
            ),
            kidney_stage: text("estadio_erc"),
        }
    }
}

fn number_field(
    row: &RawRecord,
    schema: &SchemaMap,
    key: &'static str,
    row_index: usize,
    issues: &mut IssueLog,
) -> Option<f64> {
    let cell = schema.cell(row, key)?;
    let value = parse_number(cell);
    if value.is_none() && !cell.is_blank() {
        issues.record(key, row_index, raw_text(cell), IssueKind::OutOfRangeNumber);
    }
    value
}

fn date_field(
    row: &RawRecord,
    schema: &SchemaMap,
    key: &'static str,
    row_index: usize,
    issues: &mut IssueLog,
) -> Option<NaiveDate> {
    let cell = schema.cell(row, key)?;
    let value = parse_date(cell);
    if value.is_none() && !cell.is_blank() {
        issues.record(key, row_index, raw_text(cell), IssueKind::UnparseableDate);
    }
    value
}

fn raw_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(s) => s.clone(),
        other => cell_text(other),
    }
}
