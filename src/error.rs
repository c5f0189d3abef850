//! Error types for SideChat
//!
//! This module defines the crate-level error type, using `thiserror`
//! for ergonomic error handling. Chat API failures have their own
//! taxonomy in [`crate::api::ApiError`] so the controller can tell a
//! superseded request apart from a real failure.

use thiserror::Error;

/// Main error type for SideChat operations
///
/// Covers configuration loading, chat API calls, outbound mail,
/// transcript materialization and (de)serialization.
#[derive(Error, Debug)]
pub enum SideChatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chat API errors
    #[error("Chat API error: {0}")]
    Api(#[from] crate::api::ApiError),

    /// Outbound mail errors (address parsing, message build, SMTP transport)
    #[error("Mail error: {0}")]
    Mail(String),

    /// No user is signed in for an operation that needs one
    #[error("No user identity configured")]
    MissingIdentity,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for SideChat operations
///
/// Uses `anyhow::Error` so callers can attach context while
/// propagating with `?`.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    #[test]
    fn test_config_error_display() {
        let error = SideChatError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_mail_error_display() {
        let error = SideChatError::Mail("relay refused".to_string());
        assert_eq!(error.to_string(), "Mail error: relay refused");
    }

    #[test]
    fn test_missing_identity_display() {
        assert_eq!(
            SideChatError::MissingIdentity.to_string(),
            "No user identity configured"
        );
    }

    #[test]
    fn test_api_error_conversion() {
        let error: SideChatError = ApiError::Cancelled.into();
        assert!(matches!(error, SideChatError::Api(ApiError::Cancelled)));
        assert_eq!(error.to_string(), "Chat API error: Request superseded");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: SideChatError = io_error.into();
        assert!(matches!(error, SideChatError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: SideChatError = json_error.into();
        assert!(matches!(error, SideChatError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: SideChatError = yaml_error.into();
        assert!(matches!(error, SideChatError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SideChatError>();
    }
}
