use thiserror::Error;

#[derive(Error, Debug)]
pub enum DateHelperError {
    #[error("Invalid date pattern '{pattern}': {reason}")]
    FormatError { pattern: String, reason: String },

    #[error("Cannot parse '{input}' with pattern '{pattern}': {reason}")]
    ParseError {
        input: String,
        pattern: String,
        reason: String,
    },

    #[error("Invalid argument {field}={value}: {reason}")]
    InvalidArgument {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Conversion error: {message}")]
    ConversionError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Pattern,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl DateHelperError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DateHelperError::FormatError { .. } => ErrorCategory::Pattern,
            DateHelperError::ParseError { .. }
            | DateHelperError::InvalidArgument { .. }
            | DateHelperError::ConversionError { .. } => ErrorCategory::Input,
            DateHelperError::ConfigError { .. } => ErrorCategory::Configuration,
            DateHelperError::IoError(_) | DateHelperError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Pattern | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the binary. Never 0.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DateHelperError::FormatError { .. } => {
                "Use pattern letters such as yyyy, MM, dd, HH, mm, ss and quote literal text"
            }
            DateHelperError::ParseError { .. } => {
                "Make sure the text matches the pattern exactly, including zero padding"
            }
            DateHelperError::InvalidArgument { .. } => "Check the allowed range of the argument",
            DateHelperError::ConversionError { .. } => {
                "Pick a datetime within the supported range of the configured time zone"
            }
            DateHelperError::ConfigError { .. } => "Check the configuration file and CLI flags",
            DateHelperError::IoError(_) => "Check that the file exists and is readable",
            DateHelperError::SerializationError(_) => "Retry without --json",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DateHelperError::FormatError { pattern, .. } => {
                format!("The date pattern '{}' is not valid", pattern)
            }
            DateHelperError::ParseError { input, pattern, .. } => {
                format!("'{}' does not match the pattern '{}'", input, pattern)
            }
            DateHelperError::InvalidArgument { field, value, .. } => {
                format!("The value '{}' is not allowed for {}", value, field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DateHelperError>;
