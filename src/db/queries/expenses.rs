use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, trace};

use crate::date_utils::MonthWindow;
use crate::models::{Expense, ExpenseChanges, NewExpense};

/// Optional list filters; every one that is `Some` is ANDed onto the query.
/// The text filters are case-insensitive substring matches.
#[derive(Debug, Default)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    pub payment_method: Option<String>,
    pub search: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

fn map_expense(row: &Row) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount_cents: row.get(2)?,
        category: row.get(3)?,
        date: row.get(4)?,
        payment_method: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

const EXPENSE_COLUMNS: &str =
    "id, user_id, amount_cents, category, date, payment_method, notes, created_at, updated_at";

pub fn list_expenses(
    conn: &Connection,
    user_id: i64,
    filter: &ExpenseFilter,
) -> rusqlite::Result<Vec<Expense>> {
    let mut sql = format!("SELECT {} FROM expenses WHERE user_id = ?", EXPENSE_COLUMNS);
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

    // LIKE is case-insensitive for ASCII in SQLite, matching the partial,
    // case-insensitive semantics of the text filters.
    if let Some(ref category) = filter.category {
        sql.push_str(" AND category LIKE ?");
        params_vec.push(Box::new(format!("%{}%", category)));
    }
    if let Some(ref payment_method) = filter.payment_method {
        sql.push_str(" AND payment_method LIKE ?");
        params_vec.push(Box::new(format!("%{}%", payment_method)));
    }
    if let Some(ref search) = filter.search {
        sql.push_str(" AND notes LIKE ?");
        params_vec.push(Box::new(format!("%{}%", search)));
    }
    if let Some(ref from_date) = filter.from_date {
        sql.push_str(" AND date >= ?");
        params_vec.push(Box::new(from_date.clone()));
    }
    if let Some(ref to_date) = filter.to_date {
        sql.push_str(" AND date <= ?");
        params_vec.push(Box::new(to_date.clone()));
    }

    sql.push_str(" ORDER BY date DESC, id DESC");

    let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let expenses: Vec<Expense> = stmt
        .query_map(params_refs.as_slice(), map_expense)?
        .collect::<rusqlite::Result<_>>()?;

    debug!(user_id, count = expenses.len(), "Listed expenses");
    Ok(expenses)
}

/// All of a user's expenses within a calendar month. The window is half-open
/// on date strings: `>= first day AND < first day of the next month`, which
/// for date-only values is the same set as an inclusive last-day bound.
pub fn list_expenses_in_month(
    conn: &Connection,
    user_id: i64,
    window: &MonthWindow,
) -> rusqlite::Result<Vec<Expense>> {
    let sql = format!(
        "SELECT {} FROM expenses WHERE user_id = ? AND date >= ? AND date < ?
         ORDER BY date DESC, id DESC",
        EXPENSE_COLUMNS
    );

    let from = window.first_day().to_string();
    let to = window.next_first_day().to_string();

    let mut stmt = conn.prepare(&sql)?;
    let expenses = stmt
        .query_map(params![user_id, from, to], map_expense)?
        .collect::<rusqlite::Result<_>>()?;

    Ok(expenses)
}

pub fn get_expense(
    conn: &Connection,
    user_id: i64,
    id: i64,
) -> rusqlite::Result<Option<Expense>> {
    trace!(expense_id = id, "Fetching expense");
    conn.query_row(
        &format!(
            "SELECT {} FROM expenses WHERE id = ? AND user_id = ?",
            EXPENSE_COLUMNS
        ),
        params![id, user_id],
        map_expense,
    )
    .optional()
}

pub fn create_expense(
    conn: &Connection,
    user_id: i64,
    expense: &NewExpense,
) -> rusqlite::Result<Expense> {
    conn.execute(
        "INSERT INTO expenses (user_id, amount_cents, category, date, payment_method, notes)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            user_id,
            expense.amount_cents,
            expense.category,
            expense.date,
            expense.payment_method,
            expense.notes,
        ],
    )?;

    let id = conn.last_insert_rowid();
    debug!(
        expense_id = id,
        user_id,
        amount_cents = expense.amount_cents,
        "Created expense"
    );

    conn.query_row(
        &format!("SELECT {} FROM expenses WHERE id = ?", EXPENSE_COLUMNS),
        [id],
        map_expense,
    )
}

/// Apply a partial update. Returns the updated row, or `None` when no row
/// matches the (id, user) pair — a foreign row looks the same as a missing
/// one to the caller.
pub fn update_expense(
    conn: &Connection,
    user_id: i64,
    id: i64,
    changes: &ExpenseChanges,
) -> rusqlite::Result<Option<Expense>> {
    let mut sets: Vec<&str> = Vec::new();
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(amount_cents) = changes.amount_cents {
        sets.push("amount_cents = ?");
        params_vec.push(Box::new(amount_cents));
    }
    if let Some(ref category) = changes.category {
        sets.push("category = ?");
        params_vec.push(Box::new(category.clone()));
    }
    if let Some(ref date) = changes.date {
        sets.push("date = ?");
        params_vec.push(Box::new(date.clone()));
    }
    if let Some(ref payment_method) = changes.payment_method {
        sets.push("payment_method = ?");
        params_vec.push(Box::new(payment_method.clone()));
    }
    if let Some(ref notes) = changes.notes {
        sets.push("notes = ?");
        params_vec.push(Box::new(notes.clone()));
    }

    if sets.is_empty() {
        return get_expense(conn, user_id, id);
    }

    sets.push("updated_at = datetime('now')");
    let sql = format!(
        "UPDATE expenses SET {} WHERE id = ? AND user_id = ?",
        sets.join(", ")
    );
    params_vec.push(Box::new(id));
    params_vec.push(Box::new(user_id));

    let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = conn.execute(&sql, params_refs.as_slice())?;

    if rows == 0 {
        return Ok(None);
    }

    debug!(expense_id = id, user_id, "Updated expense");
    get_expense(conn, user_id, id)
}

pub fn delete_expense(conn: &Connection, user_id: i64, id: i64) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "DELETE FROM expenses WHERE id = ? AND user_id = ?",
        params![id, user_id],
    )?;
    if rows > 0 {
        debug!(expense_id = id, user_id, "Deleted expense");
    }
    Ok(rows > 0)
}
