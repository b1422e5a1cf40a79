use crate::error::{AppError, AppResult};
use crate::models::{cents_to_decimal, Expense};

/// Render expenses as a CSV document with a header row.
pub fn expenses_to_csv(expenses: &[Expense]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["date", "category", "payment_method", "amount", "notes"])?;

    for expense in expenses {
        let amount = format!("{:.2}", cents_to_decimal(expense.amount_cents));
        writer.write_record([
            expense.date.as_str(),
            expense.category.as_str(),
            expense.payment_method.as_str(),
            amount.as_str(),
            expense.notes.as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV buffer error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV encoding error: {}", e)))
}
