//! Tracer: records every sub-calculation a stack body invokes.
//!
//! A tracer is scoped to one stack invocation. Each dependency may be
//! recorded once per scope; calling it again without [`Tracer::reset`] is a
//! configuration fault that aborts the whole invocation.
//!
//! Results are recorded in call order as the dependency's signed envelope,
//! so a nested stack's entry carries its own `intermediates`.

use std::collections::BTreeSet;
use std::fmt;

use calcstack_core::{ContentFault, Diagnostics, Intermediates, Signed};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::context::Context;
use crate::endpoint::{Endpoint, Outcome};
use crate::error::{ConfigurationFault, PipelineError};

/// Error handed to a stack body when the tracer aborted a call.
///
/// The underlying framework fault is kept by the tracer and surfaced when
/// the stack finishes, whether or not the body propagated this error.
#[derive(Debug, Error)]
#[error("{stack} aborted: {reason}")]
pub struct Aborted {
    pub stack: &'static str,
    pub reason: String,
}

pub struct Tracer<'cx> {
    stack: &'static str,
    cx: &'cx mut Context,
    results: Intermediates,
    dependencies: BTreeSet<&'static str>,
    fatal: Option<PipelineError>,
}

impl<'cx> Tracer<'cx> {
    pub fn new(stack: &'static str, cx: &'cx mut Context) -> Self {
        Self {
            stack,
            cx,
            results: Intermediates::new(),
            dependencies: BTreeSet::new(),
            fatal: None,
        }
    }

    /// Name of the stack this tracer belongs to.
    pub fn stack(&self) -> &'static str {
        self.stack
    }

    /// Discard recorded results, opening a new scope.
    pub fn reset(&mut self) {
        debug!(stack = self.stack, discarded = self.results.len(), "tracer reset");
        self.results.clear();
    }

    /// Traced proxy for `dependency`.
    pub fn wrap<'t, I, E>(&'t mut self, dependency: &'t Endpoint<I, E>) -> Dependency<'t, 'cx, I, E> {
        self.dependencies.insert(dependency.name());
        Dependency {
            tracer: self,
            endpoint: dependency,
        }
    }

    /// Invoke `dependency` once and record its result.
    pub fn call<I, E>(&mut self, dependency: &Endpoint<I, E>, input: &I) -> anyhow::Result<Signed<E>>
    where
        I: fmt::Debug,
        E: Serialize,
    {
        self.wrap(dependency).call(input)
    }

    /// Raise a diagnostic on behalf of the stack body.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.cx.diagnostics_mut().warn(message);
    }

    /// Results recorded so far in this scope.
    pub fn intermediates(&self) -> &Intermediates {
        &self.results
    }

    /// Every dependency wrapped during this invocation.
    pub fn dependencies(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.dependencies.iter().copied()
    }

    /// Close the scope: the recorded results, or the framework fault that
    /// aborted it.
    pub(crate) fn finish(self) -> Result<Intermediates, PipelineError> {
        match self.fatal {
            Some(e) => Err(e),
            None => Ok(self.results),
        }
    }

    fn abort(&mut self, err: PipelineError) -> anyhow::Error {
        let aborted = Aborted {
            stack: self.stack,
            reason: err.to_string(),
        };
        // Keep the first fault; later ones are consequences.
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        anyhow::Error::new(aborted)
    }
}

impl fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("stack", &self.stack)
            .field("recorded", &self.results.names())
            .field("aborted", &self.fatal.is_some())
            .finish()
    }
}

/// A dependency seen through the tracer.
pub struct Dependency<'t, 'cx, I, E> {
    tracer: &'t mut Tracer<'cx>,
    endpoint: &'t Endpoint<I, E>,
}

impl<I, E> Dependency<'_, '_, I, E>
where
    I: fmt::Debug,
    E: Serialize,
{
    pub fn name(&self) -> &'static str {
        self.endpoint.name()
    }

    /// Invoke the dependency's full pipeline and record the signed result.
    ///
    /// A content fault in the dependency comes back as a [`ContentFault`] the
    /// body may handle. Framework faults abort the stack.
    pub fn call(&mut self, input: &I) -> anyhow::Result<Signed<E>> {
        let name = self.endpoint.name();
        let tracer = &mut *self.tracer;

        if let Some(fatal) = &tracer.fatal {
            let reason = fatal.to_string();
            return Err(anyhow::Error::new(Aborted {
                stack: tracer.stack,
                reason,
            }));
        }
        if tracer.results.contains(name) {
            let fault = ConfigurationFault::DuplicateDependency {
                stack: tracer.stack.to_string(),
                dependency: name.to_string(),
            };
            return Err(tracer.abort(fault.into()));
        }
        if let Err(e) = tracer.cx.check_deadline(tracer.stack) {
            return Err(tracer.abort(e));
        }

        info!(
            stack = tracer.stack,
            dependency = name,
            trace_id = %tracer.cx.trace_id(),
            "{} is calling {}",
            tracer.stack,
            name
        );
        debug!(dependency = name, input = ?input, "dependency input");

        let mut child = tracer.cx.child();
        let response = match self.endpoint.invoke(input, &mut child) {
            Ok(response) => response,
            Err(e) => return Err(tracer.abort(e)),
        };

        if let Some(encoded) = response.diagnostics.as_deref() {
            tracer.cx.diagnostics_mut().extend(Diagnostics::decode(encoded));
        }

        match response.outcome {
            Outcome::Success(signed) => {
                let record = match serde_json::to_value(&signed) {
                    Ok(record) => record,
                    Err(e) => return Err(tracer.abort(PipelineError::Serialization(e.to_string()))),
                };
                tracer.results.insert(name, record);
                Ok(signed)
            }
            Outcome::Fault(record) => {
                debug!(dependency = name, kind = %record.kind, "dependency faulted");
                Err(ContentFault::from_dependency(name, &record).into())
            }
        }
    }
}
