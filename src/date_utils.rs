use chrono::{Datelike, Local, NaiveDate};

use crate::error::{AppError, AppResult};

/// A single calendar month, the window every budget and report is scoped to.
///
/// All month math uses server-local dates so that "this month" means the
/// same thing at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
}

impl MonthWindow {
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn new(year: i32, month: u32) -> AppResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(AppError::Validation(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    /// Resolve optional query parameters, falling back to the current month.
    pub fn resolve(month: Option<u32>, year: Option<i32>) -> AppResult<Self> {
        let current = Self::current();
        Self::new(year.unwrap_or(current.year), month.unwrap_or(current.month))
    }

    pub fn first_day(&self) -> NaiveDate {
        // month is validated on construction, so this cannot fail
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("valid month")
    }

    /// First day of the following month; upper bound of the half-open window.
    pub fn next_first_day(&self) -> NaiveDate {
        if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1).expect("valid month")
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1).expect("valid month")
        }
    }

    /// Last calendar day of the month, computed from the next month's first day.
    pub fn last_day(&self) -> NaiveDate {
        self.next_first_day().pred_opt().expect("date in range")
    }
}

/// Parse a `YYYY-MM-DD` date string, rejecting anything else.
pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date: {}", s)))
}
