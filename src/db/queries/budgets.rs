use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use tracing::debug;

use crate::date_utils::MonthWindow;
use crate::models::Budget;

fn map_budget(row: &Row) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: row.get(2)?,
        amount_cents: row.get(3)?,
        month: row.get(4)?,
        year: row.get(5)?,
    })
}

const BUDGET_COLUMNS: &str = "id, user_id, category, amount_cents, month, year";

pub fn get_budget(
    conn: &Connection,
    user_id: i64,
    category: &str,
    window: &MonthWindow,
) -> rusqlite::Result<Option<Budget>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM budgets
             WHERE user_id = ? AND category = ? AND month = ? AND year = ?",
            BUDGET_COLUMNS
        ),
        params![user_id, category, window.month, window.year],
        map_budget,
    )
    .optional()
}

/// All budgets a user ever set, most recent month first.
pub fn list_budgets(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<Budget>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM budgets WHERE user_id = ?
         ORDER BY year DESC, month DESC, category",
        BUDGET_COLUMNS
    ))?;

    let budgets = stmt
        .query_map([user_id], map_budget)?
        .collect::<rusqlite::Result<_>>()?;
    Ok(budgets)
}

pub fn list_budgets_for_month(
    conn: &Connection,
    user_id: i64,
    window: &MonthWindow,
) -> rusqlite::Result<Vec<Budget>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM budgets
         WHERE user_id = ? AND month = ? AND year = ?
         ORDER BY category",
        BUDGET_COLUMNS
    ))?;

    let budgets = stmt
        .query_map(params![user_id, window.month, window.year], map_budget)?
        .collect::<rusqlite::Result<_>>()?;
    Ok(budgets)
}

pub struct BudgetUpsert {
    pub budget: Budget,
    pub created: bool,
}

/// Set the budget for (user, category, month, year): update the amount when
/// the row exists, insert it otherwise. The two branches run inside an
/// immediate transaction, with the UNIQUE key on the table backing them
/// against a concurrent writer.
pub fn set_budget(
    conn: &mut Connection,
    user_id: i64,
    category: &str,
    amount_cents: i64,
    window: &MonthWindow,
) -> rusqlite::Result<BudgetUpsert> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let existing_id: Option<i64> = tx
        .query_row(
            "SELECT id FROM budgets
             WHERE user_id = ? AND category = ? AND month = ? AND year = ?",
            params![user_id, category, window.month, window.year],
            |row| row.get(0),
        )
        .optional()?;

    let (id, created) = match existing_id {
        Some(id) => {
            tx.execute(
                "UPDATE budgets SET amount_cents = ? WHERE id = ?",
                params![amount_cents, id],
            )?;
            (id, false)
        }
        None => {
            tx.execute(
                "INSERT INTO budgets (user_id, category, amount_cents, month, year)
                 VALUES (?, ?, ?, ?, ?)",
                params![user_id, category, amount_cents, window.month, window.year],
            )?;
            (tx.last_insert_rowid(), true)
        }
    };

    let budget = tx.query_row(
        &format!("SELECT {} FROM budgets WHERE id = ?", BUDGET_COLUMNS),
        [id],
        map_budget,
    )?;
    tx.commit()?;

    debug!(
        budget_id = budget.id,
        user_id,
        category,
        amount_cents,
        created,
        "Set budget"
    );
    Ok(BudgetUpsert { budget, created })
}
