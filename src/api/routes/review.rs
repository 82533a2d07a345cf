use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};

use crate::api::models::{ApproveRequest, ModerationResponse, ReviewQuery, SuccessResponse};
use crate::api::{json_body, AppState};
use crate::auth::RequestContext;
use crate::db::snapshots::SnapshotFilter;
use crate::errors::PortalError;
use crate::models::{ReviewSnapshot, SnapshotDetail, SnapshotStatus};

pub async fn list(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<Vec<ReviewSnapshot>>, PortalError> {
    let filter = SnapshotFilter {
        report_id: query.report_id,
        status: query.status.as_deref().map(str::parse::<SnapshotStatus>).transpose()?,
    };
    Ok(Json(state.portal.review_snapshots(&ctx, &filter)?))
}

pub async fn detail(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> Result<Json<SnapshotDetail>, PortalError> {
    Ok(Json(state.portal.review_snapshot(&ctx, id)?))
}

pub async fn approve(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<ModerationResponse>, PortalError> {
    let req: ApproveRequest = json_body(&body, "approval")?;
    let snapshot = state.portal.approve(&ctx, id, &req.signature)?;
    Ok(Json(ModerationResponse { success: true, snapshot }))
}

pub async fn deny(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> Result<Json<ModerationResponse>, PortalError> {
    let snapshot = state.portal.deny(&ctx, id)?;
    Ok(Json(ModerationResponse { success: true, snapshot }))
}

pub async fn remove(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, PortalError> {
    state.portal.remove(&ctx, id)?;
    Ok(Json(SuccessResponse { success: true }))
}
