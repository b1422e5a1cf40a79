use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Expense {
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    #[serde(rename = "amount", serialize_with = "crate::models::cents_as_decimal")]
    pub amount_cents: i64,
    pub category: String,
    pub date: String,
    pub payment_method: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A validated expense ready for insertion. Category is already normalized
/// and the date verified as `YYYY-MM-DD`.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub amount_cents: i64,
    pub category: String,
    pub date: String,
    pub payment_method: String,
    pub notes: Option<String>,
}

/// A partial update; only present fields are written. Category is already
/// normalized when present.
#[derive(Debug, Clone, Default)]
pub struct ExpenseChanges {
    pub amount_cents: Option<i64>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}
