use thiserror::Error;

use crate::models::snapshot::SnapshotStatus;
use crate::workflow::serializer::SubmitStep;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Snapshot {0} is already approved")]
    AlreadyApproved(i64),

    #[error("Cannot {action} a snapshot in state '{from}'")]
    InvalidStateTransition {
        from: SnapshotStatus,
        action: &'static str,
    },

    #[error("Report {0} is closed and does not accept new submissions")]
    ReportClosed(i64),

    #[error("Submission failed while {step}: {source}")]
    Submission {
        step: SubmitStep,
        #[source]
        source: Box<PortalError>,
    },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Permission error: {0}")]
    Permission(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PortalError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        PortalError::NotFound(what.to_string())
    }

    /// Attach the failing step of a transactional submission.
    pub fn in_step(self, step: SubmitStep) -> Self {
        match self {
            already @ PortalError::Submission { .. } => already,
            other => PortalError::Submission { step, source: Box::new(other) },
        }
    }

    /// The innermost error, looking through submission wrappers.
    pub fn root(&self) -> &PortalError {
        match self {
            PortalError::Submission { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<rusqlite::Error> for PortalError {
    fn from(e: rusqlite::Error) -> Self {
        PortalError::Persistence(e.to_string())
    }
}
