//! Structured error and warning types for infrastructure resolution.

use serde::Serialize;
use std::fmt;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Structural errors
    MissingSection,
    MissingRequiredKey,
    DuplicateTask,

    // Value errors
    UnknownEnumValue,
    TypeConversion,
    InvalidValue,

    // Loader errors
    Io,
    Parse,
    UnsupportedFormat,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MissingSection => "MISSING_SECTION",
            ErrorCode::MissingRequiredKey => "MISSING_REQUIRED_KEY",
            ErrorCode::DuplicateTask => "DUPLICATE_TASK",
            ErrorCode::UnknownEnumValue => "UNKNOWN_ENUM_VALUE",
            ErrorCode::TypeConversion => "TYPE_CONVERSION",
            ErrorCode::InvalidValue => "INVALID_VALUE",
            ErrorCode::Io => "IO",
            ErrorCode::Parse => "PARSE",
            ErrorCode::UnsupportedFormat => "UNSUPPORTED_FORMAT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal resolution error. Any of these aborts reading the whole infrastructure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    #[error("Mandatory section '{section}' is missing")]
    MissingSection { section: String },

    #[error("Required key '{key}' is missing for {context}")]
    MissingRequiredKey { key: String, context: String },

    #[error("Unknown value '{value}' for '{field}'. Expected one of: {expected}")]
    UnknownEnumValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Cannot convert '{value}' at '{path}' to {expected}")]
    TypeConversion {
        path: String,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Task '{name}' is defined more than once")]
    DuplicateTask { name: String },
}

impl SpecError {
    pub fn missing_section(section: &str) -> Self {
        Self::MissingSection {
            section: section.to_string(),
        }
    }

    pub fn missing_key(key: &str, context: impl Into<String>) -> Self {
        Self::MissingRequiredKey {
            key: key.to_string(),
            context: context.into(),
        }
    }

    pub fn unknown_value(field: &str, value: &str, expected: &[&str]) -> Self {
        Self::UnknownEnumValue {
            field: field.to_string(),
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SpecError::MissingSection { .. } => ErrorCode::MissingSection,
            SpecError::MissingRequiredKey { .. } => ErrorCode::MissingRequiredKey,
            SpecError::UnknownEnumValue { .. } => ErrorCode::UnknownEnumValue,
            SpecError::TypeConversion { .. } => ErrorCode::TypeConversion,
            SpecError::InvalidValue { .. } => ErrorCode::InvalidValue,
            SpecError::DuplicateTask { .. } => ErrorCode::DuplicateTask,
        }
    }
}

/// Errors raised while loading configuration documents from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON document '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse YAML document '{path}': {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unsupported configuration format for '{path}' (expected .json, .yaml or .yml)")]
    UnsupportedFormat { path: String },

    #[error(transparent)]
    Spec(#[from] SpecError),
}

impl LoadError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LoadError::Io { .. } => ErrorCode::Io,
            LoadError::Json { .. } | LoadError::Yaml { .. } => ErrorCode::Parse,
            LoadError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            LoadError::Spec(err) => err.code(),
        }
    }
}

/// Non-fatal finding raised while reading. Resolution continues and the
/// incomplete value is passed through for a later stage to complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpecWarning {
    MissingRemoteMachine { task: String },
    MissingRemotePort { task: String },
}

impl fmt::Display for SpecWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecWarning::MissingRemoteMachine { task } => write!(
                f,
                "No remote machine was specified for multinode task '{}'. \
                 This is fine if it is provided by the control system, but it will fail in standalone mode.",
                task
            ),
            SpecWarning::MissingRemotePort { task } => write!(
                f,
                "No remote port was specified for multinode task '{}'. \
                 This is fine if it is provided by the control system, but it might fail in standalone mode.",
                task
            ),
        }
    }
}

/// Result type for resolution operations.
pub type SpecResult<T> = std::result::Result<T, SpecError>;
