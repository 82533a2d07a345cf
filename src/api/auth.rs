use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use super::AppState;
use crate::auth::users::resolve_token;
use crate::auth::RequestContext;
use crate::errors::PortalError;

/// No `Authorization` header means an anonymous caller. A header that is
/// present but malformed or unknown is rejected outright.
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = PortalError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(RequestContext::anonymous());
        };
        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PortalError::Authentication("Expected 'Authorization: Bearer <token>'".into()))?;

        let user = resolve_token(state.portal.db(), token)?;
        Ok(RequestContext::for_user(user))
    }
}
