use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("No target encoding or line ending requested")]
    MissingTargetError,

    #[error("No input paths given")]
    MissingInputError,

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Permission denied for {}: {source}", .path.display())]
    PermissionError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot convert {} from {from}: {message}", .path.display())]
    ConversionError {
        path: PathBuf,
        from: String,
        message: String,
    },

    #[error("Cannot prepare working copy for {}: {source}", .path.display())]
    WorkingCopyError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Permission,
    Conversion,
    Unknown,
}

impl NormalizeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            NormalizeError::MissingTargetError
            | NormalizeError::MissingInputError
            | NormalizeError::InvalidConfigValueError { .. }
            | NormalizeError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            NormalizeError::PermissionError { .. } => ErrorCategory::Permission,
            NormalizeError::IoError(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                ErrorCategory::Permission
            }
            NormalizeError::ConversionError { .. } => ErrorCategory::Conversion,
            NormalizeError::IoError(_)
            | NormalizeError::SerializationError(_)
            | NormalizeError::WorkingCopyError { .. } => ErrorCategory::Unknown,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            NormalizeError::MissingTargetError => {
                "Nothing to do: choose a target encoding and/or line ending".to_string()
            }
            NormalizeError::MissingInputError => "No file or directory given".to_string(),
            NormalizeError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            NormalizeError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            NormalizeError::MissingTargetError => {
                "Pass one of -w/-m/-u for line endings or -a/-8/-s for the encoding"
            }
            NormalizeError::MissingInputError => "Pass at least one file or directory path",
            NormalizeError::InvalidConfigValueError { .. }
            | NormalizeError::ConfigValidationError { .. } => {
                "Check the command line options and the configuration file"
            }
            NormalizeError::PermissionError { .. } => {
                "Make sure the file is readable and writable by the current user"
            }
            NormalizeError::ConversionError { .. } => {
                "Inspect the file; its content does not match the detected encoding"
            }
            NormalizeError::WorkingCopyError { .. } => {
                "Make sure the file's directory is writable and has free space"
            }
            NormalizeError::IoError(_) | NormalizeError::SerializationError(_) => {
                "Retry the operation; check disk space and permissions"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
