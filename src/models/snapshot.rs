use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::appendix::Appendix;
use super::financial::Financial;
use super::issue::Issue;
use super::report::{FullReport, ReportStatus};
use super::schedule::ScheduleItem;
use crate::errors::PortalError;

/// Payload layout written by this build. Bump when the shape of
/// [`SnapshotPayload`] changes and teach [`SnapshotPayload::decode`] the old one.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Moderation state of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotStatus {
    #[default]
    Pending,
    Approved,
    Denied,
}

impl SnapshotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
        }
    }
}

impl std::fmt::Display for SnapshotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SnapshotStatus {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "denied" => Ok(Self::Denied),
            other => Err(PortalError::Validation(format!("unknown snapshot status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureMethod {
    Draw,
    Upload,
}

impl SignatureMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draw => "draw",
            Self::Upload => "upload",
        }
    }
}

/// Signature as submitted by the reviewer, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInput {
    pub name: Option<String>,
    pub method: Option<String>,
    pub image_url: Option<String>,
    pub image_data_url: Option<String>,
}

/// A signature that passed validation; written together with the approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub method: SignatureMethod,
    pub url: String,
}

/// An immutable capture of a report, with its moderation metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: i64,
    pub report_id: i64,
    pub status: SnapshotStatus,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub signature_name: Option<String>,
    pub signature_method: Option<SignatureMethod>,
    pub signature_url: Option<String>,
    pub schema_version: u32,
    pub snapshot_data: String,
}

impl Snapshot {
    pub fn payload(&self) -> Result<SnapshotPayload, PortalError> {
        SnapshotPayload::decode(self.schema_version, &self.snapshot_data)
    }
}

/// Snapshot joined with its parent report, for reviewers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSnapshot {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    pub report_name: String,
    pub department: String,
    pub report_start_date: NaiveDate,
}

/// A snapshot with its report context and decoded payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDetail {
    #[serde(flatten)]
    pub review: ReviewSnapshot,
    pub payload: SnapshotPayload,
}

impl SnapshotDetail {
    pub fn decode(review: ReviewSnapshot) -> Result<Self, PortalError> {
        let payload = review.snapshot.payload()?;
        Ok(Self { review, payload })
    }
}

/// Response to a successful submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotReceipt {
    pub snapshot_id: i64,
    pub status: SnapshotStatus,
    pub created_at: DateTime<Utc>,
}

/// The frozen, denormalized report as of submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPayload {
    pub schema_version: u32,
    pub id: i64,
    pub name: String,
    pub department: String,
    pub start_date: NaiveDate,
    pub status: ReportStatus,
    pub version: i64,
    pub issues: Vec<Issue>,
    pub schedule_scope: Vec<ScheduleItem>,
    pub financials: Vec<Financial>,
    pub appendix: Vec<Appendix>,
    pub submitted_at: DateTime<Utc>,
}

impl SnapshotPayload {
    pub fn capture(full: &FullReport, submitted_at: DateTime<Utc>) -> Self {
        let report = &full.report;
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            id: report.id,
            name: report.name.clone(),
            department: report.department.clone(),
            start_date: report.start_date,
            status: report.status,
            version: report.version,
            issues: full.issues.clone(),
            schedule_scope: full.schedule_scope.clone(),
            financials: full.financials.iter().cloned().collect(),
            appendix: full.appendix.iter().cloned().collect(),
            submitted_at,
        }
    }

    pub fn encode(&self) -> Result<String, PortalError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a stored payload, checking the version stored next to it.
    pub fn decode(schema_version: u32, data: &str) -> Result<Self, PortalError> {
        match schema_version {
            CURRENT_SCHEMA_VERSION => {
                let payload: SnapshotPayload = serde_json::from_str(data)?;
                if payload.schema_version != schema_version {
                    return Err(PortalError::Validation(format!(
                        "snapshot payload declares schema version {} but was stored as {}",
                        payload.schema_version, schema_version
                    )));
                }
                Ok(payload)
            }
            other => Err(PortalError::Validation(format!(
                "unsupported snapshot schema version {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::Report;

    fn full_report() -> FullReport {
        let now = Utc::now();
        FullReport {
            report: Report {
                id: 7,
                name: "R1".into(),
                department: "ETS".into(),
                start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                status: ReportStatus::Open,
                version: 1,
                is_latest: true,
                created_at: now,
                updated_at: now,
            },
            issues: vec![],
            schedule_scope: vec![],
            financials: Some(Financial {
                id: 1,
                report_id: 7,
                original_contract_amt: 1_000_000.0,
                paid_to_date: 250_000.0,
            }),
            appendix: None,
        }
    }

    #[test]
    fn test_payload_shape_uses_camel_case_arrays() {
        let payload = SnapshotPayload::capture(&full_report(), Utc::now());
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["schemaVersion"], 1);
        assert_eq!(value["name"], "R1");
        assert_eq!(value["startDate"], "2025-01-01");
        assert!(value["scheduleScope"].as_array().unwrap().is_empty());
        assert_eq!(value["financials"].as_array().unwrap().len(), 1);
        assert!(value["appendix"].as_array().unwrap().is_empty());
        assert!(value["submittedAt"].is_string());
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let payload = SnapshotPayload::capture(&full_report(), Utc::now());
        let data = payload.encode().unwrap();
        let err = SnapshotPayload::decode(2, &data).unwrap_err();
        assert!(err.to_string().contains("unsupported snapshot schema version 2"));
        assert_eq!(SnapshotPayload::decode(1, &data).unwrap(), payload);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("denied".parse::<SnapshotStatus>().unwrap(), SnapshotStatus::Denied);
        assert!("archived".parse::<SnapshotStatus>().is_err());
    }
}
