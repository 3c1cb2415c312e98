//! Invocation context: state scoped to one external call.
//!
//! A fresh context is created for every top-level `execute`. Nested
//! invocations get a child context sharing the trace id and deadline, so no
//! state is ever shared between concurrent calls.

use std::time::{Duration, Instant};

use calcstack_core::{Diagnostics, TraceId};

use crate::error::PipelineError;

#[derive(Debug)]
pub struct Context {
    trace_id: TraceId,
    started: Instant,
    deadline: Option<Instant>,
    depth: usize,
    diagnostics: Diagnostics,
}

impl Context {
    /// Context for a top-level invocation.
    pub fn new(timeout: Option<Duration>) -> Self {
        let started = Instant::now();
        Self {
            trace_id: TraceId::generate(),
            started,
            deadline: timeout.map(|t| started + t),
            depth: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Context for a nested invocation, with an empty diagnostics region.
    pub fn child(&self) -> Self {
        Self {
            trace_id: self.trace_id,
            started: self.started,
            deadline: self.deadline,
            depth: self.depth + 1,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn trace_id(&self) -> TraceId {
        self.trace_id
    }

    /// 0 for the top-level call.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Swap in a new diagnostics region, returning the previous one.
    pub fn replace_diagnostics(&mut self, diagnostics: Diagnostics) -> Diagnostics {
        std::mem::replace(&mut self.diagnostics, diagnostics)
    }

    pub fn check_deadline(&self, calculation: &str) -> Result<(), PipelineError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(PipelineError::DeadlineExceeded {
                calculation: calculation.to_string(),
                elapsed_ms: self.started.elapsed().as_millis() as u64,
            }),
            _ => Ok(()),
        }
    }
}
