use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::api::models::SnapshotsQuery;
use crate::api::AppState;
use crate::auth::RequestContext;
use crate::errors::PortalError;
use crate::models::{Report, Snapshot, SnapshotDetail};
use crate::workflow::publication::SnapshotScope;

pub async fn public_reports(State(state): State<AppState>) -> Result<Json<Vec<Report>>, PortalError> {
    Ok(Json(state.portal.list_public_reports()?))
}

pub async fn public_snapshot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SnapshotDetail>, PortalError> {
    Ok(Json(state.portal.public_snapshot(id)?))
}

/// Approved snapshots by default; `?scope=all` for reviewers.
pub async fn report_snapshots(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Query(query): Query<SnapshotsQuery>,
) -> Result<Json<Vec<Snapshot>>, PortalError> {
    let scope = query
        .scope
        .as_deref()
        .map(str::parse::<SnapshotScope>)
        .transpose()?
        .unwrap_or_default();
    Ok(Json(state.portal.snapshots_for_report(&ctx, id, scope)?))
}
