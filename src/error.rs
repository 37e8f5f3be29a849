//! Error types shared by the pipeline helper commands.

use thiserror::Error;

/// Input validation failure collected while reading workflow context.
///
/// These are accumulated into a `Vec` so a single run reports every problem
/// at once instead of stopping at the first missing variable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required input was unset or empty.
    #[error("Missing required parameter '{0}'")]
    MissingParameter(String),

    /// The resolved version string does not match the release grammar.
    #[error("'{0}' is not a valid semver version!")]
    InvalidVersionFormat(String),
}

impl ValidationError {
    /// Missing-input error naming the environment variable.
    pub fn missing(name: &str) -> Self {
        Self::MissingParameter(name.to_string())
    }
}

/// Failure while delivering the webhook notification.
#[derive(Error, Debug)]
pub enum NotificationError {
    /// The HTTP request could not be completed (DNS, TLS, connect, ...).
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The webhook answered, but not with status 200 and the literal body `1`.
    #[error("webhook rejected the notification (status {status})")]
    UnexpectedResponse { status: u16, body: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameter_message() {
        let error = ValidationError::MissingParameter("GITHUB_REF".to_string());
        assert_eq!(error.to_string(), "Missing required parameter 'GITHUB_REF'");
    }

    #[test]
    fn test_invalid_version_message() {
        let error = ValidationError::InvalidVersionFormat("1.2".to_string());
        assert_eq!(error.to_string(), "'1.2' is not a valid semver version!");
    }

    #[test]
    fn test_unexpected_response_message() {
        let error = NotificationError::UnexpectedResponse {
            status: 500,
            body: "Internal Server Error".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "webhook rejected the notification (status 500)"
        );
    }
}
