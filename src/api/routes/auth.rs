use axum::Json;

use crate::api::models::MeResponse;
use crate::auth::RequestContext;

pub async fn me(ctx: RequestContext) -> Json<MeResponse> {
    Json(MeResponse { user: ctx.user })
}
