pub mod routes;
pub mod models;
pub mod errors;
pub mod auth;

use axum::body::Bytes;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use serde::de::DeserializeOwned;

use crate::errors::PortalError;
use crate::workflow::Portal;

#[derive(Clone)]
pub struct AppState {
    pub portal: Portal,
}

impl AppState {
    pub fn new(portal: Portal) -> Self {
        Self { portal }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/me", get(routes::auth::me))
        .route("/reports", post(routes::reports::create_report).get(routes::reports::list_reports))
        .route("/reports/{id}", get(routes::reports::get_report).put(routes::reports::update_report))
        .route("/reports/{id}/status", axum::routing::patch(routes::reports::set_status))
        .route("/reports/{id}/submit", post(routes::reports::submit))
        .route("/reports/{id}/snapshots", get(routes::snapshots::report_snapshots))
        .route(
            "/reports/{id}/issues",
            post(routes::children::upsert_issue).put(routes::children::upsert_issue),
        )
        .route(
            "/reports/{id}/scope-schedule",
            post(routes::children::upsert_schedule)
                .put(routes::children::upsert_schedule)
                .delete(routes::children::delete_schedule),
        )
        .route(
            "/reports/{id}/financials",
            post(routes::children::upsert_financial).put(routes::children::upsert_financial),
        )
        .route(
            "/reports/{id}/appendix",
            post(routes::children::upsert_appendix).put(routes::children::upsert_appendix),
        )
        .route("/public/reports", get(routes::snapshots::public_reports))
        .route("/public/snapshots/{id}", get(routes::snapshots::public_snapshot))
        .route("/review/snapshots", get(routes::review::list))
        .route(
            "/review/snapshots/{id}",
            get(routes::review::detail).delete(routes::review::remove),
        )
        .route("/review/snapshots/{id}/approve", post(routes::review::approve))
        .route("/review/snapshots/{id}/deny", post(routes::review::deny))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Parse an optional JSON body. An empty body yields `T::default()`; a
/// malformed one is a validation error, so it answers with the usual
/// `{error, code}` shape instead of the extractor's plain-text rejection.
pub(crate) fn json_body<T: DeserializeOwned + Default>(body: &Bytes, what: &str) -> Result<T, PortalError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| PortalError::Validation(format!("invalid {what} body: {e}")))
}
