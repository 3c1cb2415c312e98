//! # calcstack
//!
//! The unified API for calcstack: signed, traceable calculations composed
//! into hierarchical stacks.
//!
//! ## Overview
//!
//! - **Rules**: plain input → output functions owned by a content owner
//! - **Stacks**: calculations that invoke other calculations as named steps
//! - **Envelopes**: every result carries its input, its output, the results
//!   of every sub-step, and the owner's signature
//! - **Faults**: business-logic errors become structured records with status
//!   567; framework faults abort the call
//!
//! ## Usage
//!
//! ```rust,ignore
//! use calcstack::{Kernel, KernelConfig};
//!
//! let mut kernel = Kernel::new(KernelConfig::load("calcstack.toml")?)?;
//! let add = kernel.define_rule(Add)?;
//! kernel.define_stack(MyFirstStack::new(add, subtract))?;
//!
//! let response = kernel.execute("MyFirstStack", json!({"x": 10, "y": 3}))?;
//! assert_eq!(response.status(), 200);
//! ```
//!
//! ## Re-exports
//!
//! - `calcstack::core` - envelopes, signatures, diagnostics, schemas
//! - `calcstack::pipeline` - calculation traits, stages, tracer, endpoints

pub mod config;
pub mod error;
pub mod kernel;
pub mod registry;

// Re-export component crates
pub use calcstack_core as core;
pub use calcstack_pipeline as pipeline;

// Re-export main types for convenience
pub use config::{KernelConfig, SigningConfig};
pub use error::{KernelError, Result};
pub use kernel::Kernel;
pub use registry::{CalculationListing, Registry};

// Re-export commonly used types
pub use calcstack_core::{
    ContentFault, Describe, Diagnostics, Envelope, FieldSpec, InputSchema, Keypair, OwnerId,
    Signed, StackEnvelope,
};
pub use calcstack_pipeline::{
    Calculation, DynEndpoint, Outcome, PipelineError, Response, Rule, RuleEndpoint, Stack,
    StackEndpoint, Tracer,
};
