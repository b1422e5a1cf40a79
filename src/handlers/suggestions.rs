use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::services::{categories, suggestions};

#[derive(Debug, Deserialize)]
pub struct SuggestionPayload {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub category: String,
    pub amount: f64,
    pub suggestions: Vec<&'static str>,
}

/// Saving tips for a category the user is spending in.
pub async fn suggest(
    Json(payload): Json<SuggestionPayload>,
) -> AppResult<Json<SuggestionResponse>> {
    let category = categories::normalize(&payload.category);
    if category.is_empty() {
        return Err(AppError::Validation("Category is required".into()));
    }
    if payload.amount <= 0.0 {
        return Err(AppError::Validation(
            "Amount must be greater than zero".into(),
        ));
    }

    let tips = suggestions::tips_for(&category);
    Ok(Json(SuggestionResponse {
        category,
        amount: payload.amount,
        suggestions: tips.to_vec(),
    }))
}
