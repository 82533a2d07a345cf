use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::appendix::Appendix;
use super::financial::Financial;
use super::issue::Issue;
use super::schedule::ScheduleItem;
use crate::errors::PortalError;

/// Open/closed lifecycle of a report. `Closed` is terminal for the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Open,
    Closed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mutable draft report row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: i64,
    pub name: String,
    pub department: String,
    pub start_date: NaiveDate,
    pub status: ReportStatus,
    pub version: i64,
    pub is_latest: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub name: String,
    pub department: String,
    pub start_date: NaiveDate,
}

impl NewReport {
    pub fn validate(&self) -> Result<(), PortalError> {
        require_text("name", &self.name)?;
        require_text("department", &self.department)
    }
}

/// Partial in-place update of the report's general info.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportUpdate {
    pub name: Option<String>,
    pub department: Option<String>,
    pub start_date: Option<NaiveDate>,
}

impl ReportUpdate {
    pub fn validate(&self) -> Result<(), PortalError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(department) = &self.department {
            require_text("department", department)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.department.is_none() && self.start_date.is_none()
    }
}

/// A draft report together with every child collection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullReport {
    #[serde(flatten)]
    pub report: Report,
    pub issues: Vec<Issue>,
    pub schedule_scope: Vec<ScheduleItem>,
    pub financials: Option<Financial>,
    pub appendix: Option<Appendix>,
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), PortalError> {
    if value.trim().is_empty() {
        return Err(PortalError::Validation(format!("{field} is required")));
    }
    Ok(())
}
