//! Error types for the terminal client.

use fittrack_client::FitTrackError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("API error: {0}")]
    Api(#[from] FitTrackError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not available here: {0}")]
    NotAvailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// True when the backend rejected the session; the coordinator logs out on this kind.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, AppError::Api(e) if e.is_unauthenticated())
    }
}

/// Result type alias for client-side operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_is_detected_through_wrapper() {
        let err: AppError = FitTrackError::from_status(401, String::new()).into();
        assert!(err.is_unauthenticated());
        let err = AppError::Validation("Passwords do not match".into());
        assert!(!err.is_unauthenticated());
        assert_eq!(err.to_string(), "Validation error: Passwords do not match");
    }
}
