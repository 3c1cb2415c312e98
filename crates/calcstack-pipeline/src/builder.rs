//! Pipeline composition.
//!
//! The builder wraps a calculation in the fixed stage chain for its kind and
//! returns a ready [`Endpoint`]. Composition happens once, at construction.

use std::sync::Arc;
use std::time::Duration;

use calcstack_core::{OwnerId, SigningService};

use crate::calculation::{CalculationKind, Rule, Stack};
use crate::endpoint::{CalculationInfo, Endpoint, RuleEndpoint, StackEndpoint};
use crate::handler::Handler;
use crate::stage::{
    Calculate, ErrorBoundary, Signing, StackTraceability, Traceability, WarningCapture,
    WarningLevel,
};

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Deadline for one top-level invocation, nested calls included.
    pub timeout: Option<Duration>,
    pub warning_level: WarningLevel,
}

#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    signer: Arc<SigningService>,
    options: PipelineOptions,
}

impl PipelineBuilder {
    pub fn new(signer: Arc<SigningService>) -> Self {
        Self {
            signer,
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn signer(&self) -> &Arc<SigningService> {
        &self.signer
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Compose warning, error, signing and traceability around a rule.
    pub fn rule<C: Rule>(&self, calculation: C) -> RuleEndpoint<C> {
        let signing = Signing::new(
            C::NAME,
            OwnerId::new(C::OWNER),
            Arc::clone(&self.signer),
            Traceability::new(Calculate::new(calculation)),
        );
        let pipeline = WarningCapture::new(
            C::NAME,
            self.options.warning_level,
            ErrorBoundary::new(C::NAME, signing),
        );
        let info = CalculationInfo::of::<C>(CalculationKind::Rule, pipeline.stages());
        Endpoint::new(info, Box::new(pipeline), self.options.timeout)
    }

    /// Compose warning, error, signing and stack-traceability around a stack.
    pub fn stack<C: Stack>(&self, calculation: C) -> StackEndpoint<C> {
        let signing = Signing::new(
            C::NAME,
            OwnerId::new(C::OWNER),
            Arc::clone(&self.signer),
            StackTraceability::new(calculation),
        );
        let pipeline = WarningCapture::new(
            C::NAME,
            self.options.warning_level,
            ErrorBoundary::new(C::NAME, signing),
        );
        let info = CalculationInfo::of::<C>(CalculationKind::Stack, pipeline.stages());
        Endpoint::new(info, Box::new(pipeline), self.options.timeout)
    }
}
