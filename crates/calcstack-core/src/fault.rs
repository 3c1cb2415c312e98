//! Content faults: errors raised by calculation business logic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fault kind used when business logic fails with an untyped error.
pub const GENERIC_FAULT_KIND: &str = "Error";

/// An error a calculation body raises on purpose, with an explicit kind.
///
/// Bodies may return any error; raising a `ContentFault` lets the owner pick
/// the kind that ends up in the [`FaultRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ContentFault {
    pub kind: String,
    pub message: String,
}

impl ContentFault {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a rejected input value.
    pub fn value(message: impl Into<String>) -> Self {
        Self::new("ValueError", message)
    }

    /// Re-raise a fault a sub-calculation delivered to its caller.
    pub fn from_dependency(dependency: &str, record: &FaultRecord) -> Self {
        Self::new(
            record.kind.clone(),
            format!("{dependency} failed: {}", record.message),
        )
    }
}

/// Structured form of a content fault, delivered instead of an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultRecord {
    pub message: String,
    pub kind: String,
}

impl From<&ContentFault> for FaultRecord {
    fn from(fault: &ContentFault) -> Self {
        Self {
            message: fault.message.clone(),
            kind: fault.kind.clone(),
        }
    }
}
