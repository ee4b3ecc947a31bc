//! Error types shared across Vantage crates.

use std::path::PathBuf;

/// Top-level error type for Vantage operations.
#[derive(Debug, thiserror::Error)]
pub enum VantageError {
    #[error("Unknown device: {id}")]
    UnknownDevice { id: String },

    #[error("Unknown template: {id}")]
    UnknownTemplate { id: String },

    #[error("Unknown device finish: {id}")]
    UnknownFinish { id: String },

    #[error("Invalid color value: {value}")]
    InvalidColor { value: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Image decode error: {message}")]
    ImageDecode { message: String },

    #[error("Rasterization error: {message}")]
    Rasterize { message: String },

    #[error("Archive error: {message}")]
    Archive { message: String },

    #[error("Copy generation failed: {message}")]
    ExternalService { message: String },

    #[error("An export is already in progress")]
    ExportInProgress,

    #[error("Screen index {index} out of range (screen count {len})")]
    ScreenIndexOutOfRange { index: usize, len: usize },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using VantageError.
pub type VantageResult<T> = Result<T, VantageError>;

/// Coarse classification used to decide how a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Programming or data error (unknown device/template/finish, bad color).
    /// Never recovered from silently.
    Configuration,
    /// Image decode, rasterization, or archive failure. The current operation
    /// is aborted and prior state is left untouched.
    Io,
    /// The copy-generation collaborator failed or was misused.
    ExternalService,
    /// A competing export is already running.
    Busy,
}

impl VantageError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn image_decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode {
            message: msg.into(),
        }
    }

    pub fn rasterize(msg: impl Into<String>) -> Self {
        Self::Rasterize {
            message: msg.into(),
        }
    }

    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive {
            message: msg.into(),
        }
    }

    pub fn external_service(msg: impl Into<String>) -> Self {
        Self::ExternalService {
            message: msg.into(),
        }
    }

    /// Which part of the error taxonomy this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownDevice { .. }
            | Self::UnknownTemplate { .. }
            | Self::UnknownFinish { .. }
            | Self::InvalidColor { .. }
            | Self::Config { .. }
            | Self::ScreenIndexOutOfRange { .. }
            | Self::Json(_) => ErrorCategory::Configuration,
            Self::ImageDecode { .. }
            | Self::Rasterize { .. }
            | Self::Archive { .. }
            | Self::FileNotFound { .. }
            | Self::Io(_)
            | Self::Other(_) => ErrorCategory::Io,
            Self::ExternalService { .. } => ErrorCategory::ExternalService,
            Self::ExportInProgress => ErrorCategory::Busy,
        }
    }

    /// Configuration errors must fail loudly; everything else can be retried.
    pub fn is_recoverable(&self) -> bool {
        self.category() != ErrorCategory::Configuration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_identifiers_are_configuration_errors() {
        let errors = [
            VantageError::UnknownDevice { id: "x".into() },
            VantageError::UnknownTemplate { id: "x".into() },
            VantageError::UnknownFinish { id: "x".into() },
        ];
        for err in errors {
            assert_eq!(err.category(), ErrorCategory::Configuration);
            assert!(!err.is_recoverable());
        }
    }

    #[test]
    fn test_io_failures_are_recoverable() {
        assert_eq!(
            VantageError::image_decode("bad png").category(),
            ErrorCategory::Io
        );
        assert!(VantageError::archive("deflate").is_recoverable());
        assert_eq!(
            VantageError::ExportInProgress.category(),
            ErrorCategory::Busy
        );
    }

    #[test]
    fn test_display_names_identifier() {
        let err = VantageError::UnknownTemplate {
            id: "Neon Wave".into(),
        };
        assert_eq!(err.to_string(), "Unknown template: Neon Wave");
    }
}
