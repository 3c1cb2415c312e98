//! Stages: each wraps the handler below it and transforms its output.
//!
//! Composition, outermost first:
//!
//! ```text
//! warning -> error -> signing -> traceability | stack-traceability -> calculate
//! ```
//!
//! The warning stage is outermost so diagnostics are delivered even when the
//! error stage converts a content fault.

mod calculate;
mod error;
mod signing;
mod stack;
mod traceability;
mod warning;

pub use calculate::Calculate;
pub use error::{fault_record, ErrorBoundary};
pub use signing::Signing;
pub use stack::StackTraceability;
pub use traceability::Traceability;
pub use warning::{WarningCapture, WarningLevel};
