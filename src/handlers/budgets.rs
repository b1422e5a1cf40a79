use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::date_utils::MonthWindow;
use crate::db::queries::{budgets, expenses};
use crate::error::{AppError, AppResult};
use crate::models::{to_cents, Budget, BudgetStatusRow};
use crate::services::{categories, summary};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetBudgetPayload {
    pub category: String,
    pub amount: f64,
}

/// Set the budget for a category in the current month; 201 when the bucket
/// is new, 200 when an existing amount was overwritten.
pub async fn set(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SetBudgetPayload>,
) -> AppResult<(StatusCode, Json<Budget>)> {
    let category = categories::normalize(&payload.category);
    if category.is_empty() {
        return Err(AppError::Validation("Category is required".into()));
    }

    let amount_cents = to_cents(payload.amount);
    if amount_cents <= 0 {
        return Err(AppError::Validation(
            "Amount must be greater than zero".into(),
        ));
    }

    // Budgets are always set for "now", never backdated.
    let window = MonthWindow::current();

    let mut conn = state.db.get()?;
    let upsert = budgets::set_budget(&mut conn, user.user_id, &category, amount_cents, &window)?;

    let status = if upsert.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(upsert.budget)))
}

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Budget>>> {
    let conn = state.db.get()?;
    let budget_list = budgets::list_budgets(&conn, user.user_id)?;
    Ok(Json(budget_list))
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusParams {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

pub async fn status(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<StatusParams>,
) -> AppResult<Json<Vec<BudgetStatusRow>>> {
    let window = MonthWindow::resolve(params.month, params.year)?;

    let conn = state.db.get()?;
    let budget_rows = budgets::list_budgets_for_month(&conn, user.user_id, &window)?;
    let expense_rows = expenses::list_expenses_in_month(&conn, user.user_id, &window)?;

    Ok(Json(summary::budget_status(&budget_rows, &expense_rows)))
}
