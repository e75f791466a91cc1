//! Customer management HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::models::{CustomerInput, CustomerStatus};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::CustomerService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CustomerListQuery {
    #[serde(default)]
    pub status: CustomerStatus,
}

/// List customers, optionally only active or inactive ones
pub async fn list_customers(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<CustomerListQuery>,
) -> impl IntoResponse {
    let service = CustomerService::new(state.store.clone());

    match service.list(current_user.id(), query.status).await {
        Ok(customers) => (
            StatusCode::OK,
            Json(serde_json::json!({ "customers": customers })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = CustomerService::new(state.store.clone());

    match service.get(current_user.id(), customer_id).await {
        Ok(customer) => (StatusCode::OK, Json(customer)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CustomerInput>,
) -> impl IntoResponse {
    let service = CustomerService::new(state.store.clone());

    match service.create(current_user.id(), input).await {
        Ok(customer) => (StatusCode::CREATED, Json(customer)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
    Json(input): Json<CustomerInput>,
) -> impl IntoResponse {
    let service = CustomerService::new(state.store.clone());

    match service.update(current_user.id(), customer_id, input).await {
        Ok(customer) => (StatusCode::OK, Json(customer)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Flip a customer between active and inactive
pub async fn toggle_customer_active(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = CustomerService::new(state.store.clone());

    match service.toggle_active(current_user.id(), customer_id).await {
        Ok(customer) => (StatusCode::OK, Json(customer)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = CustomerService::new(state.store.clone());

    match service.delete(current_user.id(), customer_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
