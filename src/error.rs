/*!
 * Error handling for provider record normalization
 *
 * Separates malformed input (reported, never recovered) from the I/O and
 * configuration failures of the adapters around the core transform.
 */

use std::path::PathBuf;
use serde_json::Value;
use thiserror::Error;

/// Normalization library result type
pub type Result<T> = std::result::Result<T, NormalizeError>;

/// Error types with context and suggestions
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// The raw record is not a JSON object
    #[error("Malformed record: expected a JSON object, found {found}")]
    MalformedRecord {
        found: String,
        context: ErrorContext,
    },

    /// An entry inside a list-valued field is not a JSON object
    #[error("Malformed entry {index} in '{field}': expected a JSON object, found {found}")]
    MalformedEntry {
        field: String,
        index: usize,
        found: String,
    },

    /// A resolved field has the wrong JSON shape
    #[error("Invalid field '{field}': expected {expected}, found {found}")]
    InvalidField {
        field: String,
        expected: String,
        found: String,
    },

    /// File I/O errors with context
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
        context: ErrorContext,
    },

    /// Input could not be parsed as JSON
    #[error("JSON parsing error at line {line}, column {column}: {message}")]
    JsonParse {
        message: String,
        line: usize,
        column: usize,
        context: ErrorContext,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        suggestion: Option<String>,
    },

    /// Generic errors with custom message
    #[error("{message}")]
    Custom {
        message: String,
        suggestion: Option<String>,
    },
}

/// Error context providing additional information
#[derive(Debug, Default, Clone)]
pub struct ErrorContext {
    pub file_path: Option<PathBuf>,
}

/// Name of the JSON type of a value, for error messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl NormalizeError {
    /// Create a malformed record error for a non-object input
    pub fn malformed_record(found: &Value) -> Self {
        Self::MalformedRecord {
            found: json_type_name(found).to_string(),
            context: ErrorContext::default(),
        }
    }

    /// Create a malformed entry error for a non-object list member
    pub fn malformed_entry(field: &str, index: usize, found: &Value) -> Self {
        Self::MalformedEntry {
            field: field.to_string(),
            index,
            found: json_type_name(found).to_string(),
        }
    }

    /// Create an invalid field error for a value of the wrong shape
    pub fn invalid_field(field: &str, expected: &str, found: &Value) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            expected: expected.to_string(),
            found: json_type_name(found).to_string(),
        }
    }

    /// Attach a source file to errors that carry context
    pub fn with_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        match &mut self {
            Self::MalformedRecord { context, .. }
            | Self::Io { context, .. }
            | Self::JsonParse { context, .. } => {
                context.file_path = Some(path.into());
            }
            _ => {}
        }
        self
    }

    /// Whether the error was caused by the shape of the input data
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::MalformedRecord { .. }
                | Self::MalformedEntry { .. }
                | Self::InvalidField { .. }
                | Self::JsonParse { .. }
        )
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        let location = match self {
            Self::MalformedRecord { context, .. }
            | Self::Io { context, .. }
            | Self::JsonParse { context, .. } => context
                .file_path
                .as_ref()
                .map(|p| format!(" (in {})", p.display()))
                .unwrap_or_default(),
            _ => String::new(),
        };

        match self {
            Self::MalformedRecord { .. } => {
                format!(
                    "{}{}\n\nSuggestion: The input must be a single provider verification record (a JSON object)",
                    self, location
                )
            }
            Self::MalformedEntry { field, .. } => {
                format!(
                    "{}\n\nSuggestion: Every member of '{}' must be a JSON object",
                    self, field
                )
            }
            Self::JsonParse { .. } => {
                format!("{}{}\n\nSuggestion: Check that the input is valid JSON", self, location)
            }
            Self::Configuration { suggestion: Some(sug), .. }
            | Self::Custom { suggestion: Some(sug), .. } => {
                format!("{}\n\nSuggestion: {}", self, sug)
            }
            _ => format!("{}{}", self, location),
        }
    }
}

// Convenience conversions
impl From<std::io::Error> for NormalizeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: err,
            context: ErrorContext::default(),
        }
    }
}

impl From<serde_json::Error> for NormalizeError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
            context: ErrorContext::default(),
        }
    }
}
