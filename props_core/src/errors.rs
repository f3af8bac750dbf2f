//! # Error Types
//!
//! Structured error types for props_core. Every failure a channel, the
//! normalizer or the export pipeline can produce is one variant here, carrying
//! enough context to diagnose it from a log line or its JSON form.
//!
//! `ChannelUnavailable` is special: it is a routing signal consumed by the
//! dispatcher, not a failure reported to callers.
//!
//! ## Example
//!
//! ```rust
//! use props_core::errors::{DispatchError, DispatchResult};
//!
//! fn check_model(model_number: u8) -> DispatchResult<()> {
//!     if model_number == 0 {
//!         return Err(DispatchError::invalid_input(
//!             "number_of_model",
//!             "0",
//!             "Model numbers start at 1",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for props_core operations
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Structured error type for dispatch and export operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum DispatchError {
    /// The channel cannot be used in the current host (capability absent)
    #[error("Channel unavailable: {channel}")]
    ChannelUnavailable { channel: String },

    /// Transport, serialization or host-side failure while invoking a channel
    #[error("Channel invocation failed: {channel} - {reason}")]
    ChannelInvocation { channel: String, reason: String },

    /// The channel answered with a value of an unrecognized shape
    #[error("Malformed response from {channel}: {reason}")]
    MalformedResponse { channel: String, reason: String },

    /// The channel answered with the wrong number of values for the kind
    #[error("Arity mismatch for {kind}: expected {expected} values, got {actual}")]
    ArityMismatch {
        kind: String,
        expected: usize,
        actual: usize,
    },

    /// A request value is structurally invalid
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A parameter required by the computation kind is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Export was requested before any computation succeeded
    #[error("Export unavailable: no computed result to export")]
    ExportUnavailable,

    /// The spreadsheet encoder could not be initialized
    #[error("Encoder initialization failed: {reason}")]
    EncoderInit { reason: String },

    /// The encoder failed while producing the artifact
    #[error("Export failed for '{path}': {reason}")]
    ExportFailed { path: String, reason: String },

    /// A result or error could not be rendered as JSON
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Configuration could not be read or parsed
    #[error("Configuration error in '{path}': {reason}")]
    ConfigError { path: String, reason: String },
}

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        DispatchError::serialization(err.to_string())
    }
}

impl DispatchError {
    /// Create a ChannelUnavailable error
    pub fn channel_unavailable(channel: impl Into<String>) -> Self {
        DispatchError::ChannelUnavailable {
            channel: channel.into(),
        }
    }

    /// Create a ChannelInvocation error
    pub fn channel_invocation(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        DispatchError::ChannelInvocation {
            channel: channel.into(),
            reason: reason.into(),
        }
    }

    /// Create a MalformedResponse error
    pub fn malformed_response(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        DispatchError::MalformedResponse {
            channel: channel.into(),
            reason: reason.into(),
        }
    }

    /// Create an ArityMismatch error
    pub fn arity_mismatch(kind: impl Into<String>, expected: usize, actual: usize) -> Self {
        DispatchError::ArityMismatch {
            kind: kind.into(),
            expected,
            actual,
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        DispatchError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        DispatchError::MissingField {
            field: field.into(),
        }
    }

    /// Create an EncoderInit error
    pub fn encoder_init(reason: impl Into<String>) -> Self {
        DispatchError::EncoderInit {
            reason: reason.into(),
        }
    }

    /// Create an ExportFailed error
    pub fn export_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        DispatchError::ExportFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        DispatchError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Create a ConfigError
    pub fn config_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        DispatchError::ConfigError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors that only steer channel selection and are never
    /// surfaced to the caller.
    pub fn is_routing_signal(&self) -> bool {
        matches!(self, DispatchError::ChannelUnavailable { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DispatchError::ChannelUnavailable { .. } => "CHANNEL_UNAVAILABLE",
            DispatchError::ChannelInvocation { .. } => "CHANNEL_INVOCATION_ERROR",
            DispatchError::MalformedResponse { .. } => "CHANNEL_MALFORMED_RESPONSE",
            DispatchError::ArityMismatch { .. } => "ARITY_MISMATCH",
            DispatchError::InvalidInput { .. } => "INVALID_INPUT",
            DispatchError::MissingField { .. } => "MISSING_FIELD",
            DispatchError::ExportUnavailable => "EXPORT_UNAVAILABLE",
            DispatchError::EncoderInit { .. } => "ENCODER_INIT_FAILURE",
            DispatchError::ExportFailed { .. } => "EXPORT_FAILED",
            DispatchError::SerializationError { .. } => "SERIALIZATION_ERROR",
            DispatchError::ConfigError { .. } => "CONFIG_ERROR",
        }
    }
}
