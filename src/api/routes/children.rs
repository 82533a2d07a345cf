use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::models::{DeleteScheduleRequest, SuccessResponse};
use crate::api::AppState;
use crate::auth::RequestContext;
use crate::errors::PortalError;
use crate::models::{
    Appendix, AppendixInput, Financial, FinancialInput, Issue, IssueInput, ScheduleInput, ScheduleItem,
};

pub async fn upsert_issue(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(report_id): Path<i64>,
    Json(req): Json<IssueInput>,
) -> Result<Json<Issue>, PortalError> {
    Ok(Json(state.portal.upsert_issue(&ctx, report_id, &req)?))
}

pub async fn upsert_schedule(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(report_id): Path<i64>,
    Json(req): Json<ScheduleInput>,
) -> Result<Json<ScheduleItem>, PortalError> {
    Ok(Json(state.portal.upsert_schedule_item(&ctx, report_id, &req)?))
}

pub async fn delete_schedule(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(report_id): Path<i64>,
    Json(req): Json<DeleteScheduleRequest>,
) -> Result<Json<SuccessResponse>, PortalError> {
    state.portal.delete_schedule_item(&ctx, report_id, req.id)?;
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn upsert_financial(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(report_id): Path<i64>,
    Json(req): Json<FinancialInput>,
) -> Result<Json<Financial>, PortalError> {
    Ok(Json(state.portal.upsert_financial(&ctx, report_id, &req)?))
}

pub async fn upsert_appendix(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(report_id): Path<i64>,
    Json(req): Json<AppendixInput>,
) -> Result<Json<Appendix>, PortalError> {
    Ok(Json(state.portal.upsert_appendix(&ctx, report_id, &req)?))
}
