//! Invoice HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::models::InvoiceDraft;
use shared::types::Language;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::services::InvoiceService;
use crate::store::InvoiceFilter;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DocumentQuery {
    pub lang: Option<String>,
}

fn invoice_service(state: &AppState) -> InvoiceService {
    InvoiceService::new(state.store.clone(), state.config.invoicing.clone())
}

/// List invoices newest first
pub async fn list_invoices(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<InvoiceFilter>,
) -> impl IntoResponse {
    let service = invoice_service(&state);

    match service.list(current_user.id(), &filter).await {
        Ok(invoices) => (
            StatusCode::OK,
            Json(serde_json::json!({ "invoices": invoices })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Blank draft with the suggested next number
pub async fn get_draft_template(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> impl IntoResponse {
    let service = invoice_service(&state);

    match service.draft_template(current_user.id()).await {
        Ok(template) => (StatusCode::OK, Json(template)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Compute totals of a draft without saving it
pub async fn preview_invoice(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(draft): Json<InvoiceDraft>,
) -> impl IntoResponse {
    let service = invoice_service(&state);

    match service.preview(&draft) {
        Ok(preview) => (StatusCode::OK, Json(preview)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create_invoice(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(draft): Json<InvoiceDraft>,
) -> impl IntoResponse {
    let service = invoice_service(&state);

    match service.create(current_user.id(), draft).await {
        Ok(invoice) => (StatusCode::CREATED, Json(invoice)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_invoice(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(invoice_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = invoice_service(&state);

    match service.get(current_user.id(), invoice_id).await {
        Ok(invoice) => (StatusCode::OK, Json(invoice)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Localized document for the PDF renderer
pub async fn get_invoice_document(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(invoice_id): Path<Uuid>,
    Query(query): Query<DocumentQuery>,
) -> impl IntoResponse {
    let language = match query.lang.as_deref() {
        None => None,
        Some(code) => match Language::from_code(code) {
            Some(language) => Some(language),
            None => {
                return AppError::Validation {
                    field: "lang".to_string(),
                    message: format!("Unsupported language '{}'", code),
                    message_tr: format!("Desteklenmeyen dil '{}'", code),
                }
                .into_response();
            }
        },
    };

    let service = invoice_service(&state);

    match service.document(current_user.id(), invoice_id, language).await {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Download the filtered invoice list as CSV
pub async fn export_invoices(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<InvoiceFilter>,
) -> impl IntoResponse {
    let service = invoice_service(&state);

    match service.export_csv(current_user.id(), &filter).await {
        Ok(csv) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"invoices.csv\""),
            ],
            csv,
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
