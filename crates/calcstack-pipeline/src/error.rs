//! Error types for the pipeline.
//!
//! Everything here is a framework fault: it is never converted into a
//! content-fault response and always reaches the top-level caller as `Err`.

use calcstack_core::CoreError;
use thiserror::Error;

/// Programming errors in how calculations are wired or invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationFault {
    /// A stack called the same dependency twice within one tracer scope.
    #[error("{stack} already recorded {dependency} in this scope; reset the tracer before calling it again")]
    DuplicateDependency { stack: String, dependency: String },

    /// Two calculations were registered under one name.
    #[error("calculation {0} is already registered, choose a unique name")]
    DuplicateCalculation(String),
}

/// Errors that abort an invocation.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration fault: {0}")]
    Configuration(#[from] ConfigurationFault),

    /// A value or diagnostic the framework could not encode.
    #[error("encoding fault in {calculation}: {source}")]
    Encoding {
        calculation: String,
        #[source]
        source: CoreError,
    },

    #[error("deadline exceeded in {calculation} after {elapsed_ms} ms")]
    DeadlineExceeded { calculation: String, elapsed_ms: u64 },

    /// Request input that does not decode into the calculation's input type.
    #[error("invalid input for {calculation}: {message}")]
    InvalidInput { calculation: String, message: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Status for successful responses.
pub const STATUS_OK: u16 = 200;

/// Status for request-validation failures.
pub const STATUS_INVALID_INPUT: u16 = 422;

/// Status for framework faults.
pub const STATUS_INTERNAL: u16 = 500;

/// Dedicated status for faults raised by calculation business logic.
pub const STATUS_CONTENT_FAULT: u16 = 567;

impl PipelineError {
    /// Transport status for this error.
    pub fn status(&self) -> u16 {
        match self {
            PipelineError::InvalidInput { .. } => STATUS_INVALID_INPUT,
            _ => STATUS_INTERNAL,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
