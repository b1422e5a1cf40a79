use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::auth::AuthUser;
use crate::date_utils::MonthWindow;
use crate::db::queries::{budgets, expenses, reports};
use crate::error::AppResult;
use crate::models::{BudgetHealth, MonthlyReport, NewReport};
use crate::services::summary;
use crate::state::AppState;

/// How many archived reports the list endpoint returns.
const RECENT_REPORT_LIMIT: i64 = 3;

/// Archive the current month's summary. Saving is write-once per month:
/// when a report for this (month, year) already exists it is returned
/// unchanged instead of being recomputed.
pub async fn save(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<(StatusCode, Json<MonthlyReport>)> {
    let window = MonthWindow::current();

    let conn = state.db.get()?;
    if let Some(existing) = reports::get_report(&conn, user.user_id, window.month, window.year)? {
        return Ok((StatusCode::OK, Json(existing)));
    }

    let expense_rows = expenses::list_expenses_in_month(&conn, user.user_id, &window)?;
    let budget_rows = budgets::list_budgets_for_month(&conn, user.user_id, &window)?;

    let total_spent_cents: i64 = expense_rows.iter().map(|e| e.amount_cents).sum();
    let dash = summary::dashboard_summary(&expense_rows);

    let overbudget: Vec<String> = summary::budget_status(&budget_rows, &expense_rows)
        .into_iter()
        .filter(|row| row.status == BudgetHealth::Over.label())
        .map(|row| row.category)
        .collect();

    let report = reports::insert_report(
        &conn,
        user.user_id,
        &NewReport {
            month: window.month,
            year: window.year,
            total_spent_cents,
            top_category: dash.top_category,
            overbudget_categories: if overbudget.is_empty() {
                None
            } else {
                Some(overbudget.join(", "))
            },
        },
    )?;

    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<MonthlyReport>>> {
    let conn = state.db.get()?;
    let report_list = reports::list_recent_reports(&conn, user.user_id, RECENT_REPORT_LIMIT)?;
    Ok(Json(report_list))
}
