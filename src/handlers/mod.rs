pub mod budgets;
pub mod dashboard;
pub mod expenses;
pub mod reports;
pub mod suggestions;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Expense CRUD
        .route("/api/expenses", post(expenses::create))
        .route("/api/expenses", get(expenses::list))
        .route("/api/expenses/export", get(expenses::export))
        .route("/api/expenses/:id", put(expenses::update))
        .route("/api/expenses/:id", delete(expenses::delete))
        // Budgets
        .route("/api/budgets", post(budgets::set))
        .route("/api/budgets", get(budgets::list))
        .route("/api/budgets/status", get(budgets::status))
        // Dashboard
        .route("/api/dashboard/summary", get(dashboard::summary))
        // Spending suggestions
        .route("/api/suggestions", post(suggestions::suggest))
        // Monthly report archive
        .route("/api/reports", post(reports::save))
        .route("/api/reports", get(reports::list))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}
