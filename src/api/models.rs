use serde::{Deserialize, Serialize};

use crate::models::{CurrentUser, SignatureInput, Snapshot};

#[derive(Deserialize)]
pub struct DeleteScheduleRequest {
    pub id: i64,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// A missing signature deserializes to an empty one so that signature
/// validation reports what is missing.
#[derive(Deserialize, Default)]
pub struct ApproveRequest {
    #[serde(default)]
    pub signature: SignatureInput,
}

#[derive(Deserialize, Default)]
pub struct SnapshotsQuery {
    pub scope: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct ReviewQuery {
    pub report_id: Option<i64>,
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Serialize)]
pub struct ModerationResponse {
    pub success: bool,
    pub snapshot: Snapshot,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user: Option<CurrentUser>,
}
