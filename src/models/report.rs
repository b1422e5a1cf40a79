use serde::Serialize;

/// An archived month-end summary. At most one per (user, month, year);
/// once written it is never overwritten.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub month: u32,
    pub year: i32,
    #[serde(
        rename = "total_spent",
        serialize_with = "crate::models::cents_as_decimal"
    )]
    pub total_spent_cents: i64,
    pub top_category: Option<String>,
    pub overbudget_categories: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewReport {
    pub month: u32,
    pub year: i32,
    pub total_spent_cents: i64,
    pub top_category: Option<String>,
    pub overbudget_categories: Option<String>,
}
