//! The per-row indicator rules
//!
//! `evaluate_row` is a pure function from the normalized row view and the
//! reporting windows to the set of fired indicators. The caller folds the
//! result into its accumulators, so the gate logic lives in exactly one
//! place. Absent or unparseable inputs fail their gate; nothing here
//! raises.

use crate::kpi::{Indicator, ReportingWindows, RowFields, RowIndicators};

/// Affirmative flag value after folding
const YES: &str = "SI";
/// Negative flag value after folding
const NO: &str = "NO";

/// Kidney stage labels in bucket order
const STAGES: [(&str, Indicator); 5] = [
    ("ESTADIO 1", Indicator::Estadio1),
    ("ESTADIO 2", Indicator::Estadio2),
    ("ESTADIO 3", Indicator::Estadio3),
    ("ESTADIO 4", Indicator::Estadio4),
    ("ESTADIO 5", Indicator::Estadio5),
];

/// Evaluate one row against the indicator rules
///
/// Each fired indicator contributes exactly 1; population-derived
/// indicators are never fired here.
#[must_use]
pub fn evaluate_row(fields: &RowFields, windows: &ReportingWindows) -> RowIndicators {
    let mut fired = RowIndicators::new();
    let mut fire = |indicator: Indicator| fired.push(indicator);

    let hta = fields.hta == YES;
    let dm = fields.dm == YES;
    let age = fields.age;

    let reading_in_window = fields
        .last_reading
        .is_some_and(|d| windows.six_month.contains(d));

    // Hypertension capture and control
    if hta && age.is_some_and(|a| (18.0..=69.0).contains(&a)) {
        fire(Indicator::CaptacionHta);
    }

    if hta && age.is_some_and(|a| (18.0..60.0).contains(&a)) {
        fire(Indicator::Hta1859Den);
        let controlled = fields.systolic.is_some_and(|s| s < 140.0)
            && fields.diastolic.is_some_and(|d| d < 90.0);
        if controlled && reading_in_window {
            fire(Indicator::Hta1859Num);
        }
    }

    // Patients 60 and over; diabetics are excluded from both sides
    if hta && fields.dm == NO && age.is_some_and(|a| a >= 60.0) {
        fire(Indicator::Hta60MasDen);
        let controlled = fields.systolic.is_some_and(|s| s > 0.0 && s <= 149.0)
            && fields.diastolic.is_some_and(|d| d > 0.0 && d < 90.0);
        if controlled && reading_in_window {
            fire(Indicator::Hta60MasNum);
        }
    }

    // Diabetes capture and control
    if dm && age.is_some_and(|a| (18.0..=69.0).contains(&a)) {
        fire(Indicator::CaptacionDm);
    }

    let hba1c_in_window = fields
        .hba1c_date
        .is_some_and(|d| windows.six_month.contains(d));

    if dm {
        fire(Indicator::DmControlDen);
        if hba1c_in_window && fields.hba1c.is_some_and(|v| (3.0..7.0).contains(&v)) {
            fire(Indicator::DmControlNum);
        }
        if hba1c_in_window {
            fire(Indicator::Hba1cTamizajeNum);
        }
        if fields
            .microalbuminuria_date
            .is_some_and(|d| windows.twelve_month.contains(d))
        {
            fire(Indicator::MicroalbuminuriaNum);
        }
    }

    // Creatinine screening counts any request, parsed or not
    if fields.creatinine_requested {
        fire(Indicator::CreatininaDen);
        if fields
            .creatinine_date
            .is_some_and(|d| windows.twelve_month.contains(d))
        {
            fire(Indicator::CreatininaNum);
        }
    }

    // Follow-up non-adherence: a valid reading date outside the window
    if fields.last_reading.is_some() && !reading_in_window {
        fire(Indicator::Inasistentes);
    }

    // Kidney staging, mutually exclusive buckets
    if let Some((_, stage)) = STAGES.iter().find(|(label, _)| fields.kidney_stage == *label) {
        fire(*stage);
        fire(Indicator::EstadioTotal);
    }

    fired
}
