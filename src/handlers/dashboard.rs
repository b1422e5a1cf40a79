use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::date_utils::MonthWindow;
use crate::db::queries::expenses;
use crate::error::AppResult;
use crate::services::summary::{self, DashboardSummary};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SummaryParams {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<SummaryParams>,
) -> AppResult<Json<DashboardSummary>> {
    let window = MonthWindow::resolve(params.month, params.year)?;

    let conn = state.db.get()?;
    let expense_rows = expenses::list_expenses_in_month(&conn, user.user_id, &window)?;

    Ok(Json(summary::dashboard_summary(&expense_rows)))
}
