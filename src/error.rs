//! Error types for buzon.

use thiserror::Error;

/// Common error type for buzon.
#[derive(Error, Debug)]
pub enum BuzonError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] crate::template::TemplateError),

    /// Mail transport error.
    #[error("mail error: {0}")]
    Mail(#[from] crate::mail::SendError),
}

/// Result type alias for buzon operations.
pub type Result<T> = std::result::Result<T, BuzonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = BuzonError::Config("missing admin address".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: missing admin address"
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = BuzonError::Validation("email is malformed".to_string());
        assert_eq!(err.to_string(), "validation error: email is malformed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BuzonError = io_err.into();
        assert!(matches!(err, BuzonError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_mail_error_conversion() {
        let err: BuzonError = crate::mail::SendError::NoRecipients.into();
        assert!(matches!(err, BuzonError::Mail(_)));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(BuzonError::Config("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
