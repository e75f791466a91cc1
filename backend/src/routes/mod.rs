//! Route definitions for the Invoicer API

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - company profile
        .nest("/company", company_routes(state.clone()))
        // Protected routes - customer management
        .nest("/customers", customer_routes(state.clone()))
        // Protected routes - invoices
        .nest("/invoices", invoice_routes(state))
}

/// Company profile routes (protected)
fn company_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::get_company).put(handlers::upsert_company),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Customer management routes (protected)
fn customer_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/:customer_id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route(
            "/:customer_id/toggle-active",
            post(handlers::toggle_customer_active),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Invoice routes (protected)
fn invoice_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_invoices).post(handlers::create_invoice),
        )
        .route("/draft", get(handlers::get_draft_template))
        .route("/preview", post(handlers::preview_invoice))
        .route("/export", get(handlers::export_invoices))
        .route("/:invoice_id", get(handlers::get_invoice))
        .route("/:invoice_id/document", get(handlers::get_invoice_document))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
