use thiserror::Error;

/// Unified error type for the access log.
#[derive(Error, Debug)]
pub enum AccessLogError {
    /// A recognized event arrived without one of its required details.
    #[error("Missing field '{field}' for {protocol}/{action} event")]
    MissingField {
        field: &'static str,
        protocol: String,
        action: String,
    },

    /// A detail was present but could not be read as the expected type.
    #[error("Invalid field '{field}' for {protocol}/{action} event: {reason}")]
    InvalidField {
        field: &'static str,
        protocol: String,
        action: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl AccessLogError {
    pub fn missing(field: &'static str, protocol: &str, action: &str) -> Self {
        AccessLogError::MissingField {
            field,
            protocol: protocol.to_string(),
            action: action.to_string(),
        }
    }

    pub fn invalid(
        field: &'static str,
        protocol: &str,
        action: &str,
        reason: impl Into<String>,
    ) -> Self {
        AccessLogError::InvalidField {
            field,
            protocol: protocol.to_string(),
            action: action.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the event source rather than the stream.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            AccessLogError::MissingField { .. } | AccessLogError::InvalidField { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AccessLogError>;
