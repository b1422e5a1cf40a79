use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::date_utils::parse_date;
use crate::db::queries::expenses::{self, ExpenseFilter};
use crate::error::{AppError, AppResult};
use crate::models::{to_cents, Expense, ExpenseChanges, NewExpense};
use crate::services::{categories, csv_export};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateExpensePayload {
    pub amount: f64,
    pub category: String,
    pub date: String,
    pub payment_method: String,
    pub notes: Option<String>,
}

impl CreateExpensePayload {
    fn validate(self) -> AppResult<NewExpense> {
        let amount_cents = to_cents(self.amount);
        if amount_cents <= 0 {
            return Err(AppError::Validation(
                "Amount must be greater than zero".into(),
            ));
        }

        let category = categories::normalize(&self.category);
        if category.is_empty() {
            return Err(AppError::Validation("Category is required".into()));
        }

        let payment_method = self.payment_method.trim().to_string();
        if payment_method.is_empty() {
            return Err(AppError::Validation("Payment method is required".into()));
        }

        let date = parse_date(self.date.trim())?.to_string();

        Ok(NewExpense {
            amount_cents,
            category,
            date,
            payment_method,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ExpenseListParams {
    pub category: Option<String>,
    pub payment_method: Option<String>,
    pub search: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

fn cleaned(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ExpenseListParams {
    /// An absent or blank parameter is a no-op filter.
    fn into_filter(self) -> AppResult<ExpenseFilter> {
        let from_date = match cleaned(self.from_date) {
            Some(d) => Some(parse_date(&d)?.to_string()),
            None => None,
        };
        let to_date = match cleaned(self.to_date) {
            Some(d) => Some(parse_date(&d)?.to_string()),
            None => None,
        };

        Ok(ExpenseFilter {
            category: cleaned(self.category).map(|c| categories::normalize(&c)),
            payment_method: cleaned(self.payment_method),
            search: cleaned(self.search),
            from_date,
            to_date,
        })
    }
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateExpensePayload>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    let new_expense = payload.validate()?;

    let conn = state.db.get()?;
    let expense = expenses::create_expense(&conn, user.user_id, &new_expense)?;

    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ExpenseListParams>,
) -> AppResult<Json<Vec<Expense>>> {
    let filter = params.into_filter()?;

    let conn = state.db.get()?;
    let expense_list = expenses::list_expenses(&conn, user.user_id, &filter)?;

    Ok(Json(expense_list))
}

#[derive(Debug, Deserialize)]
pub struct UpdateExpensePayload {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

impl UpdateExpensePayload {
    fn validate(self) -> AppResult<ExpenseChanges> {
        let mut changes = ExpenseChanges::default();

        if let Some(amount) = self.amount {
            let amount_cents = to_cents(amount);
            if amount_cents <= 0 {
                return Err(AppError::Validation(
                    "Amount must be greater than zero".into(),
                ));
            }
            changes.amount_cents = Some(amount_cents);
        }

        if let Some(ref category) = self.category {
            let category = categories::normalize(category);
            if category.is_empty() {
                return Err(AppError::Validation("Category is required".into()));
            }
            changes.category = Some(category);
        }

        if let Some(ref date) = self.date {
            changes.date = Some(parse_date(date.trim())?.to_string());
        }

        if let Some(ref payment_method) = self.payment_method {
            let payment_method = payment_method.trim().to_string();
            if payment_method.is_empty() {
                return Err(AppError::Validation("Payment method is required".into()));
            }
            changes.payment_method = Some(payment_method);
        }

        changes.notes = self.notes;

        Ok(changes)
    }
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateExpensePayload>,
) -> AppResult<Json<Expense>> {
    let changes = payload.validate()?;

    let conn = state.db.get()?;
    // A row owned by someone else is indistinguishable from a missing one.
    let updated = expenses::update_expense(&conn, user.user_id, id, &changes)?
        .ok_or_else(|| AppError::NotFound("Expense not found".into()))?;

    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let conn = state.db.get()?;
    let deleted = expenses::delete_expense(&conn, user.user_id, id)?;

    if !deleted {
        return Err(AppError::NotFound("Expense not found".into()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Download the filtered expense list as CSV.
pub async fn export(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ExpenseListParams>,
) -> AppResult<Response> {
    let filter = params.into_filter()?;

    let conn = state.db.get()?;
    let expense_list = expenses::list_expenses(&conn, user.user_id, &filter)?;
    let csv = csv_export::expenses_to_csv(&expense_list)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"expenses.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
