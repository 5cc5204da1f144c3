//! Row-level indicator evaluation
//!
//! This module owns the fixed indicator key set, the reporting windows
//! derived from the cutoff period, the normalized per-row field view and
//! the pure evaluator that turns one row into indicator contributions.

pub mod evaluate;
pub mod fields;
pub mod windows;

use smallvec::SmallVec;

pub use evaluate::evaluate_row;
pub use fields::RowFields;
pub use windows::{DateWindow, ReportingWindows};

/// The fixed indicator set
///
/// Key spelling and casing are a contract surface consumed by the
/// reporting collaborators; the enum order is the presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Hypertension capture, ages 18-69
    CaptacionHta,
    /// Hypertension control 18-59, eligible
    Hta1859Den,
    /// Hypertension control 18-59, controlled
    Hta1859Num,
    /// Hypertension control 60+, eligible (diabetics excluded)
    Hta60MasDen,
    /// Hypertension control 60+, controlled
    Hta60MasNum,
    /// Diabetes capture, ages 18-69
    CaptacionDm,
    /// Diabetes control, eligible
    DmControlDen,
    /// Diabetes control, HbA1c controlled in window
    DmControlNum,
    /// Creatinine screening, requested
    CreatininaDen,
    /// Creatinine screening, taken within a year
    CreatininaNum,
    /// HbA1c screening in the half-year window
    Hba1cTamizajeNum,
    /// Microalbuminuria screening in the year window
    MicroalbuminuriaNum,
    /// Patients whose last reading fell outside the follow-up window
    Inasistentes,
    /// Chronic kidney disease stage 1
    Estadio1,
    /// Chronic kidney disease stage 2
    Estadio2,
    /// Chronic kidney disease stage 3
    Estadio3,
    /// Chronic kidney disease stage 4
    Estadio4,
    /// Chronic kidney disease stage 5
    Estadio5,
    /// Any kidney stage assigned
    EstadioTotal,
    /// Assigned hypertension population (reference lookup)
    PoblacionHta,
    /// Assigned diabetes population (reference lookup)
    PoblacionDm,
}

impl Indicator {
    /// Every indicator, in presentation order
    pub const ALL: [Indicator; 21] = [
        Indicator::CaptacionHta,
        Indicator::Hta1859Den,
        Indicator::Hta1859Num,
        Indicator::Hta60MasDen,
        Indicator::Hta60MasNum,
        Indicator::CaptacionDm,
        Indicator::DmControlDen,
        Indicator::DmControlNum,
        Indicator::CreatininaDen,
        Indicator::CreatininaNum,
        Indicator::Hba1cTamizajeNum,
        Indicator::MicroalbuminuriaNum,
        Indicator::Inasistentes,
        Indicator::Estadio1,
        Indicator::Estadio2,
        Indicator::Estadio3,
        Indicator::Estadio4,
        Indicator::Estadio5,
        Indicator::EstadioTotal,
        Indicator::PoblacionHta,
        Indicator::PoblacionDm,
    ];

    /// Number of indicators
    pub const COUNT: usize = Self::ALL.len();

    /// The stable output key of this indicator
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Indicator::CaptacionHta => "captacion_hta",
            Indicator::Hta1859Den => "hta_18_59_den",
            Indicator::Hta1859Num => "hta_18_59_num",
            Indicator::Hta60MasDen => "hta_60_mas_den",
            Indicator::Hta60MasNum => "hta_60_mas_num",
            Indicator::CaptacionDm => "captacion_dm",
            Indicator::DmControlDen => "dm_control_den",
            Indicator::DmControlNum => "dm_control_num",
            Indicator::CreatininaDen => "creatinina_den",
            Indicator::CreatininaNum => "creatinina_num",
            Indicator::Hba1cTamizajeNum => "hba1c_tamizaje_num",
            Indicator::MicroalbuminuriaNum => "microalbuminuria_num",
            Indicator::Inasistentes => "inasistentes",
            Indicator::Estadio1 => "estadio_1",
            Indicator::Estadio2 => "estadio_2",
            Indicator::Estadio3 => "estadio_3",
            Indicator::Estadio4 => "estadio_4",
            Indicator::Estadio5 => "estadio_5",
            Indicator::EstadioTotal => "estadio_total",
            Indicator::PoblacionHta => "poblacion_hta",
            Indicator::PoblacionDm => "poblacion_dm",
        }
    }

    /// Whether this indicator is filled from the population reference
    /// after the row pass instead of being summed per row
    #[must_use]
    pub const fn population_derived(self) -> bool {
        matches!(self, Indicator::PoblacionHta | Indicator::PoblacionDm)
    }

    /// Position within [`Indicator::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Indicators fired by one row, each contributing exactly 1
///
/// Rows fire at most a dozen indicators, so the list lives inline.
pub type RowIndicators = SmallVec<[Indicator; 12]>;
