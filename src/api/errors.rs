use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::error;

use crate::errors::PortalError;

impl PortalError {
    /// HTTP status for this error. Submission failures answer with the status
    /// of the step that failed.
    pub fn status_code(&self) -> StatusCode {
        match self.root() {
            PortalError::NotFound(_) => StatusCode::NOT_FOUND,
            PortalError::Validation(_) | PortalError::Config(_) => StatusCode::BAD_REQUEST,
            PortalError::AlreadyApproved(_)
            | PortalError::InvalidStateTransition { .. }
            | PortalError::ReportClosed(_) => StatusCode::CONFLICT,
            PortalError::Authentication(_) => StatusCode::UNAUTHORIZED,
            PortalError::Permission(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let code = self.classify().error_type;
        if status.is_server_error() {
            error!(error = %self, code, "Request failed");
        }
        (status, Json(json!({"error": self.to_string(), "code": code}))).into_response()
    }
}
