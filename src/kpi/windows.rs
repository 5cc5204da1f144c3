//! Reporting windows derived from the cutoff period
//!
//! Every date gate in the indicator rules tests membership in one of two
//! trailing windows anchored at the caller-supplied (year, cutoff month).
//! Month arithmetic here crosses year boundaries, so a January cutoff
//! reaches back into the prior year without special cases.

use chrono::NaiveDate;

use crate::error::{EngineError, Result};

/// An inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Whether `date` falls inside the window, boundaries included
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The two trailing windows used by the indicator rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingWindows {
    /// The six full months ending with the month before the cutoff
    pub six_month: DateWindow,
    /// First day of the cutoff month one year prior through the day before
    /// the cutoff month of the current cycle
    pub twelve_month: DateWindow,
}

impl ReportingWindows {
    /// Derive both windows from the cutoff period
    ///
    /// # Errors
    /// Returns a configuration error when the cutoff month is outside 1-12.
    pub fn for_cutoff(year: i32, cutoff_month: u32) -> Result<Self> {
        if !(1..=12).contains(&cutoff_month) {
            return Err(EngineError::configuration(format!(
                "cutoff month must be between 1 and 12, got {cutoff_month}"
            )));
        }

        let cutoff_start = first_of_month(year, cutoff_month);

        let six_month = DateWindow {
            start: first_of_month_offset(year, cutoff_month, -6),
            end: last_of_month_offset(year, cutoff_month, -1),
        };
        let twelve_month = DateWindow {
            start: first_of_month(year - 1, cutoff_month),
            end: cutoff_start.pred_opt().unwrap_or(cutoff_start),
        };

        Ok(Self {
            six_month,
            twelve_month,
        })
    }
}

/// Shift (year, month) by a number of months, carrying across years
const fn shift_month(year: i32, month: u32, offset: i32) -> (i32, u32) {
    let zero_based = year * 12 + month as i32 - 1 + offset;
    (zero_based.div_euclid(12), (zero_based.rem_euclid(12) + 1) as u32)
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // month is validated by the callers, 1-12 always yields a date
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or(NaiveDate::MIN)
}

fn first_of_month_offset(year: i32, month: u32, offset: i32) -> NaiveDate {
    let (y, m) = shift_month(year, month, offset);
    first_of_month(y, m)
}

fn last_of_month_offset(year: i32, month: u32, offset: i32) -> NaiveDate {
    let (y, m) = shift_month(year, month, offset + 1);
    let next_start = first_of_month(y, m);
    next_start.pred_opt().unwrap_or(next_start)
}
