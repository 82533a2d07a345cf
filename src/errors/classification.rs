use super::types::PortalError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub retryable: bool,
}

impl PortalError {
    /// Classify this error into a stable code and whether a retry could help.
    ///
    /// Submission wrappers classify as their underlying cause.
    pub fn classify(&self) -> ErrorClassification {
        match self.root() {
            PortalError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                retryable: true,
            },
            PortalError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                retryable: true,
            },
            PortalError::Persistence(_) => ErrorClassification {
                error_type: "PersistenceError",
                retryable: false,
            },
            PortalError::Io(_) => ErrorClassification {
                error_type: "IoError",
                retryable: true,
            },

            PortalError::NotFound(_) => ErrorClassification {
                error_type: "NotFound",
                retryable: false,
            },
            PortalError::Validation(_) => ErrorClassification {
                error_type: "ValidationError",
                retryable: false,
            },
            PortalError::AlreadyApproved(_) => ErrorClassification {
                error_type: "AlreadyApproved",
                retryable: false,
            },
            PortalError::InvalidStateTransition { .. } | PortalError::ReportClosed(_) => {
                ErrorClassification {
                    error_type: "InvalidStateTransition",
                    retryable: false,
                }
            }
            PortalError::Authentication(_) => ErrorClassification {
                error_type: "AuthenticationError",
                retryable: false,
            },
            PortalError::Permission(_) => ErrorClassification {
                error_type: "PermissionError",
                retryable: false,
            },
            PortalError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                retryable: false,
            },
            PortalError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                retryable: false,
            },
            PortalError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                retryable: false,
            },
            // root() never yields a wrapper
            PortalError::Submission { .. } => ErrorClassification {
                error_type: "SubmissionError",
                retryable: false,
            },
        }
    }
}
