pub mod budget;
pub mod expense;
pub mod report;
pub mod user;

pub use budget::{Budget, BudgetHealth, BudgetStatusRow};
pub use expense::{Expense, ExpenseChanges, NewExpense};
pub use report::{MonthlyReport, NewReport};
pub use user::{User, UserIdentity};

use serde::Serializer;

/// Convert a decimal amount to integer cents, the internal representation
/// for all money values.
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub fn cents_to_decimal(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Serialize an internal cents value as a decimal number, the unit the
/// JSON API speaks.
pub(crate) fn cents_as_decimal<S>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(cents_to_decimal(*cents))
}
