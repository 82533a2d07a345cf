use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::report::require_text;
use crate::errors::PortalError;

/// Three-point scale used for both impact and likelihood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Low = 1, Medium = 2, High = 3.
    pub fn score(&self) -> u8 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// Overall risk is always impact score + likelihood score (2..=6).
pub fn overall_risk(impact: RiskLevel, likelihood: RiskLevel) -> u8 {
    impact.score() + likelihood.score()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    #[default]
    Open,
    Closed,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Open => "open",
            IssueStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: i64,
    pub report_id: i64,
    pub description: String,
    pub start_date: NaiveDate,
    pub impact: RiskLevel,
    pub likelihood: RiskLevel,
    pub overall_risk: u8,
    pub recommendation: Option<String>,
    pub status: IssueStatus,
}

/// Issue payload from the form. `overall_risk` is accepted for compatibility
/// with older clients but never trusted; it is recomputed on every write.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueInput {
    pub id: Option<i64>,
    pub description: String,
    pub start_date: NaiveDate,
    pub impact: RiskLevel,
    pub likelihood: RiskLevel,
    #[serde(default)]
    pub overall_risk: Option<u8>,
    pub recommendation: Option<String>,
    #[serde(default)]
    pub status: IssueStatus,
}

impl IssueInput {
    pub fn validate(&self) -> Result<(), PortalError> {
        require_text("description", &self.description)
    }

    pub fn overall_risk(&self) -> u8 {
        overall_risk(self.impact, self.likelihood)
    }
}
