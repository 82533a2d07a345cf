use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::models::StatusRequest;
use crate::api::{json_body, AppState};
use crate::auth::RequestContext;
use crate::errors::PortalError;
use crate::models::{FullReport, NewReport, Report, ReportUpdate, SnapshotReceipt};
use crate::workflow::serializer::DraftSubmission;

pub async fn create_report(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(req): Json<NewReport>,
) -> Result<(StatusCode, Json<Report>), PortalError> {
    let report = state.portal.create_report(&ctx, &req)?;
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn list_reports(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<Report>>, PortalError> {
    Ok(Json(state.portal.list_reports(&ctx)?))
}

pub async fn get_report(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> Result<Json<FullReport>, PortalError> {
    Ok(Json(state.portal.full_report(&ctx, id)?))
}

pub async fn update_report(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(req): Json<ReportUpdate>,
) -> Result<Json<Report>, PortalError> {
    Ok(Json(state.portal.update_report(&ctx, id, &req)?))
}

/// Only closing is supported; a closed report is never reopened.
pub async fn set_status(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Report>, PortalError> {
    if req.status != "closed" {
        return Err(PortalError::Validation(format!(
            "report status can only be set to 'closed', got '{}'",
            req.status
        )));
    }
    Ok(Json(state.portal.close_report(&ctx, id)?))
}

/// The body is optional: without one the draft is snapshotted as is.
pub async fn submit(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<(StatusCode, Json<SnapshotReceipt>), PortalError> {
    let draft: DraftSubmission = json_body(&body, "submission")?;
    let receipt = state.portal.submit_draft(&ctx, id, &draft)?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
