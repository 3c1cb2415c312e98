//! # calcstack pipeline
//!
//! Turns business calculations into signed, traceable endpoints.
//!
//! Owners implement [`Rule`] or [`Stack`]; the [`PipelineBuilder`] wraps the
//! body in a fixed chain of stages and returns an [`Endpoint`]:
//!
//! | Stage | Adds |
//! |-------|------|
//! | traceability / stack-traceability | `{input, [intermediates,] output}` envelope |
//! | signing | owner signature over the canonical envelope |
//! | error | content faults become a [`FaultRecord`](calcstack_core::FaultRecord) |
//! | warning | diagnostics delivered next to the result |
//!
//! ## Fault taxonomy
//!
//! - Content faults (business logic) are contained and delivered as
//!   [`Outcome::Fault`] with status 567.
//! - Framework faults ([`PipelineError`]) always abort the invocation, even
//!   when a stack body tries to swallow them.

pub mod builder;
pub mod calculation;
pub mod context;
pub mod endpoint;
pub mod error;
pub mod handler;
pub mod stage;
pub mod tracer;

pub use builder::{PipelineBuilder, PipelineOptions};
pub use calculation::{Calculation, CalculationKind, Record, Rule, Stack};
pub use context::Context;
pub use endpoint::{
    CalculationInfo, DynEndpoint, Endpoint, Outcome, Response, RuleEndpoint, StackEndpoint,
};
pub use error::{
    ConfigurationFault, PipelineError, Result, STATUS_CONTENT_FAULT, STATUS_INTERNAL,
    STATUS_INVALID_INPUT, STATUS_OK,
};
pub use handler::{Fault, Handler, StageInfo};
pub use stage::WarningLevel;
pub use tracer::{Aborted, Dependency, Tracer};
