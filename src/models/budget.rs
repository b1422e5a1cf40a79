use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Budget {
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub category: String,
    #[serde(rename = "amount", serialize_with = "crate::models::cents_as_decimal")]
    pub amount_cents: i64,
    pub month: u32,
    pub year: i32,
}

/// Where spending stands relative to a budget. Thresholds are checked from
/// the top down so a month that is both over 80% and over 100% reports the
/// higher one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetHealth {
    Within,
    Warn80,
    Warn90,
    Over,
}

impl BudgetHealth {
    /// Classify in integer cents; a zero budget with any spending is over
    /// budget, before any division can happen.
    pub fn classify(spent_cents: i64, budget_cents: i64) -> Self {
        if budget_cents == 0 {
            return if spent_cents > 0 {
                Self::Over
            } else {
                Self::Within
            };
        }
        if spent_cents >= budget_cents {
            Self::Over
        } else if spent_cents * 10 >= budget_cents * 9 {
            Self::Warn90
        } else if spent_cents * 5 >= budget_cents * 4 {
            Self::Warn80
        } else {
            Self::Within
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Within => "Within budget",
            Self::Warn80 => "80% used",
            Self::Warn90 => "90% used",
            Self::Over => "Over budget",
        }
    }
}

/// One row of the budget status report.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetStatusRow {
    pub category: String,
    pub budget: f64,
    pub spent: f64,
    pub remaining: f64,
    pub percentage: f64,
    pub status: &'static str,
}
