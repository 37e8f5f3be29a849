//! Common helper functions shared across commands.

use anyhow::anyhow;

use crate::error::ValidationError;
use crate::gha;

/// Normalize a raw workflow input.
///
/// GitHub Actions passes unset inputs through as empty strings, so an empty
/// value is folded into `None` and callers only deal with one "missing"
/// shape.
pub fn normalize_input(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Report every collected validation error as a workflow annotation and
/// produce the error that aborts the command.
pub fn exit_for_errors(errors: &[ValidationError]) -> anyhow::Error {
    for error in errors {
        gha::error(&error.to_string());
    }
    anyhow!("Exiting due to previous errors.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_input_keeps_values() {
        assert_eq!(
            normalize_input(Some("refs/heads/main".to_string())),
            Some("refs/heads/main".to_string())
        );
    }

    #[test]
    fn test_normalize_input_folds_empty_to_none() {
        assert_eq!(normalize_input(Some(String::new())), None);
        assert_eq!(normalize_input(None), None);
    }

    #[test]
    fn test_normalize_input_keeps_whitespace() {
        // Only the truly empty string counts as unset.
        assert_eq!(normalize_input(Some(" ".to_string())), Some(" ".to_string()));
    }

    #[test]
    fn test_exit_for_errors_message() {
        let errors = vec![
            ValidationError::MissingParameter("GITHUB_REF".to_string()),
            ValidationError::InvalidVersionFormat("1.2".to_string()),
        ];
        let error = exit_for_errors(&errors);
        assert_eq!(error.to_string(), "Exiting due to previous errors.");
    }
}
