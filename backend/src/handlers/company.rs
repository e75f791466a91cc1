//! Company profile HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use shared::models::CompanyInput;

use crate::middleware::CurrentUser;
use crate::services::CompanyService;
use crate::AppState;

/// Get the current owner's company profile
pub async fn get_company(State(state): State<AppState>, current_user: CurrentUser) -> impl IntoResponse {
    let service = CompanyService::new(state.store.clone());

    match service.get(current_user.id()).await {
        Ok(company) => (StatusCode::OK, Json(company)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create or replace the company profile
pub async fn upsert_company(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CompanyInput>,
) -> impl IntoResponse {
    let service = CompanyService::new(state.store.clone());

    match service.upsert(current_user.id(), input).await {
        Ok(company) => (StatusCode::OK, Json(company)).into_response(),
        Err(e) => e.into_response(),
    }
}
