//! Compliance-specific error types with reason codes.

use thiserror::Error;

/// Reason codes for compliance errors, providing machine-readable context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonCode {
    /// A policy rules document could not be parsed.
    PolicyParse = 100,
    /// A passport or policy id was not found.
    NotFound = 200,
    /// The persistence port failed.
    Storage = 300,
    /// Serialization or deserialization failed.
    SerializationFailed = 400,
    /// File I/O failed.
    IoFailed = 500,
    /// Configuration was unusable.
    Config = 600,
    /// A lifecycle transition is not allowed from the current status.
    InvalidTransition = 700,
}

/// Why a policy rules document was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyParseKind {
    /// Not valid YAML/JSON, or a field had the wrong shape.
    Syntax,
    /// The document has no `target` map.
    MissingTarget,
    /// The document has no `requirements` list.
    MissingRequirements,
}

impl std::fmt::Display for PolicyParseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PolicyParseKind::Syntax => "syntax",
            PolicyParseKind::MissingTarget => "missing target",
            PolicyParseKind::MissingRequirements => "missing requirements",
        };
        f.write_str(s)
    }
}

/// Errors that can occur during compliance operations.
#[derive(Error, Debug)]
pub enum ComplianceError {
    /// A policy rules document is malformed.
    #[error("Policy parse error (reason {reason}, {kind}): {message}")]
    PolicyParse {
        reason: u32,
        kind: PolicyParseKind,
        message: String,
    },

    /// A referenced record does not exist.
    #[error("Not found (reason {reason}): {message}")]
    NotFound { reason: u32, message: String },

    /// The persistence layer failed.
    #[error("Storage error (reason {reason}): {message}")]
    Storage { reason: u32, message: String },

    /// Serialization or deserialization failed.
    #[error("Serialization error (reason {reason}): {message}")]
    SerializationError { reason: u32, message: String },

    /// File I/O error.
    #[error("I/O error (reason {reason}): {message}")]
    IoError { reason: u32, message: String },

    /// Configuration error.
    #[error("Config error (reason {reason}): {message}")]
    ConfigError { reason: u32, message: String },

    /// The passport is not in a status the operation applies to.
    #[error("Invalid transition (reason {reason}): {message}")]
    InvalidTransition { reason: u32, message: String },
}

impl ComplianceError {
    pub fn policy_parse(kind: PolicyParseKind, message: impl Into<String>) -> Self {
        Self::PolicyParse {
            reason: ReasonCode::PolicyParse as u32,
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            reason: ReasonCode::NotFound as u32,
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            reason: ReasonCode::Storage as u32,
            message: message.into(),
        }
    }

    pub fn serialization_error(message: impl Into<String>) -> Self {
        Self::SerializationError {
            reason: ReasonCode::SerializationFailed as u32,
            message: message.into(),
        }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::IoError {
            reason: ReasonCode::IoFailed as u32,
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            reason: ReasonCode::Config as u32,
            message: message.into(),
        }
    }

    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::InvalidTransition {
            reason: ReasonCode::InvalidTransition as u32,
            message: message.into(),
        }
    }

    /// Numeric reason code carried by every variant.
    pub fn reason(&self) -> u32 {
        match self {
            Self::PolicyParse { reason, .. }
            | Self::NotFound { reason, .. }
            | Self::Storage { reason, .. }
            | Self::SerializationError { reason, .. }
            | Self::IoError { reason, .. }
            | Self::ConfigError { reason, .. }
            | Self::InvalidTransition { reason, .. } => *reason,
        }
    }
}

impl From<std::io::Error> for ComplianceError {
    fn from(err: std::io::Error) -> Self {
        Self::io_error(err.to_string())
    }
}

impl From<serde_json::Error> for ComplianceError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization_error(err.to_string())
    }
}

impl From<serde_yaml::Error> for ComplianceError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::policy_parse(PolicyParseKind::Syntax, err.to_string())
    }
}

/// Result type for compliance operations.
pub type ComplianceResult<T> = std::result::Result<T, ComplianceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes() {
        assert_eq!(ComplianceError::not_found("x").reason(), 200);
        assert_eq!(ComplianceError::storage("x").reason(), 300);
        assert_eq!(
            ComplianceError::policy_parse(PolicyParseKind::MissingTarget, "x").reason(),
            100
        );
    }

    #[test]
    fn test_display_includes_kind() {
        let err = ComplianceError::policy_parse(PolicyParseKind::MissingRequirements, "no list");
        let text = err.to_string();
        assert!(text.contains("missing requirements"));
        assert!(text.contains("no list"));
    }

    #[test]
    fn test_json_error_converts() {
        let err: ComplianceError = serde_json::from_str::<u32>("{").unwrap_err().into();
        assert!(matches!(err, ComplianceError::SerializationError { .. }));
    }
}
