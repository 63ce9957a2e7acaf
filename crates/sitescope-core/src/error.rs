//! Error types for SiteScope

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteError {
    // Request parameter errors
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Invalid mode: {mode}. Must be 'quantile' or 'threshold'")]
    InvalidMode { mode: String },

    // Spatial index errors
    #[error("Invalid coordinate at row {index}: ({lat}, {lon})")]
    InvalidCoordinate { index: usize, lat: f64, lon: f64 },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Table I/O errors
    #[error("CSV error: {0}")]
    Csv(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SiteError {
    /// Shorthand for an [`SiteError::InvalidParameter`]
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { name: name.into(), reason: reason.into() }
    }

    /// Whether the error was caused by the caller's input rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SiteError::InvalidParameter { .. }
                | SiteError::InvalidMode { .. }
                | SiteError::InvalidCoordinate { .. }
                | SiteError::Csv(_)
        )
    }
}

impl From<csv::Error> for SiteError {
    fn from(err: csv::Error) -> Self {
        SiteError::Csv(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
