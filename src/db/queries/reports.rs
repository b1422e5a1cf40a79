use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::models::{MonthlyReport, NewReport};

fn map_report(row: &Row) -> rusqlite::Result<MonthlyReport> {
    Ok(MonthlyReport {
        id: row.get(0)?,
        user_id: row.get(1)?,
        month: row.get(2)?,
        year: row.get(3)?,
        total_spent_cents: row.get(4)?,
        top_category: row.get(5)?,
        overbudget_categories: row.get(6)?,
        created_at: row.get(7)?,
    })
}

const REPORT_COLUMNS: &str =
    "id, user_id, month, year, total_spent_cents, top_category, overbudget_categories, created_at";

pub fn get_report(
    conn: &Connection,
    user_id: i64,
    month: u32,
    year: i32,
) -> rusqlite::Result<Option<MonthlyReport>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM monthly_reports WHERE user_id = ? AND month = ? AND year = ?",
            REPORT_COLUMNS
        ),
        params![user_id, month, year],
        map_report,
    )
    .optional()
}

pub fn insert_report(
    conn: &Connection,
    user_id: i64,
    report: &NewReport,
) -> rusqlite::Result<MonthlyReport> {
    conn.execute(
        "INSERT INTO monthly_reports
         (user_id, month, year, total_spent_cents, top_category, overbudget_categories)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            user_id,
            report.month,
            report.year,
            report.total_spent_cents,
            report.top_category,
            report.overbudget_categories,
        ],
    )?;

    let id = conn.last_insert_rowid();
    debug!(report_id = id, user_id, "Saved monthly report");

    conn.query_row(
        &format!("SELECT {} FROM monthly_reports WHERE id = ?", REPORT_COLUMNS),
        [id],
        map_report,
    )
}

pub fn list_recent_reports(
    conn: &Connection,
    user_id: i64,
    limit: i64,
) -> rusqlite::Result<Vec<MonthlyReport>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM monthly_reports WHERE user_id = ?
         ORDER BY year DESC, month DESC LIMIT ?",
        REPORT_COLUMNS
    ))?;

    let reports = stmt
        .query_map(params![user_id, limit], map_report)?
        .collect::<rusqlite::Result<_>>()?;
    Ok(reports)
}
