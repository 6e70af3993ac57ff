//! Error types for queuecalc.
//!
//! Computation itself never fails: every model returns a well-formed
//! [`ComputationResult`](crate::result::ComputationResult) carrying its own
//! `warnings` and `errors`. The variants here cover the layers around the
//! engine: parameter validation, registry lookup, scenario files, and the
//! post-computation guard.

use thiserror::Error;

/// Result type alias for queuecalc operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Unified error type for all queuecalc operations.
#[derive(Debug, Error)]
pub enum QueueError {
    // ===== Registry / Input Errors =====
    /// Model identifier not present in the registry.
    #[error("Unknown model '{0}'")]
    UnknownModel(String),

    /// One or more parameter rules were violated.
    #[error("Invalid parameters: {}", messages.join(" "))]
    InvalidParameters {
        /// One message per violated rule.
        messages: Vec<String>,
    },

    /// A declared parameter was absent from the value map.
    #[error("Missing parameter '{param}' for model '{model}'")]
    MissingParameter {
        /// Model identifier.
        model: String,
        /// Parameter identifier.
        param: String,
    },

    /// Metric name not recognized by the formula reference.
    #[error("Unknown metric '{0}'")]
    UnknownMetric(String),

    // ===== Guard Violations =====
    /// NaN detected in a computed field.
    #[error("Guard: non-finite value detected at {location}")]
    NonFiniteValue {
        /// Field where the value was found.
        location: String,
    },

    /// A probability fell outside [0, 1] in a result without errors.
    #[error("Guard: constraint '{name}' violated by {violation:.6e}")]
    ConstraintViolation {
        /// Name of the violated constraint.
        name: String,
        /// Amount of violation.
        violation: f64,
    },

    // ===== Session Errors =====
    /// Nothing has been computed yet.
    #[error("Compute first, then {action}.")]
    NothingComputed {
        /// What the caller tried to do.
        action: String,
    },

    /// A comparison slot was empty.
    #[error("Set both Model A and Model B first.")]
    EmptySlot,

    // ===== Configuration Errors =====
    /// Invalid scenario configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl QueueError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create a "compute first" error for the given action.
    #[must_use]
    pub fn nothing_computed(action: impl Into<String>) -> Self {
        Self::NothingComputed {
            action: action.into(),
        }
    }

    /// Check if this error was raised by the result guard.
    #[must_use]
    pub const fn is_guard_violation(&self) -> bool {
        matches!(
            self,
            Self::NonFiniteValue { .. } | Self::ConstraintViolation { .. }
        )
    }

    /// Check if this error is an input problem the user can fix.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownModel(_)
                | Self::InvalidParameters { .. }
                | Self::MissingParameter { .. }
                | Self::UnknownMetric(_)
        )
    }
}
