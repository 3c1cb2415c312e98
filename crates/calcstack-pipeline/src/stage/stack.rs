//! Stack-Traceability: runs a stack body inside a fresh tracer scope and
//! folds the recorded sub-calculations into the envelope.

use calcstack_core::StackEnvelope;
use tracing::debug;

use crate::calculation::Stack;
use crate::context::Context;
use crate::handler::{Fault, Handler, StageInfo};
use crate::tracer::Tracer;

pub struct StackTraceability<C> {
    calculation: C,
}

impl<C> StackTraceability<C> {
    pub fn new(calculation: C) -> Self {
        Self { calculation }
    }
}

impl<C: Stack> Handler for StackTraceability<C> {
    type Input = C::Input;
    type Output = StackEnvelope<C::Input, C::Output>;

    fn call(&self, input: &C::Input, cx: &mut Context) -> Result<Self::Output, Fault> {
        // One scope per invocation: nothing leaks in from earlier calls.
        let mut tracer = Tracer::new(C::NAME, cx);
        let result = self.calculation.calculate(input, &mut tracer);
        let dependencies: Vec<_> = tracer.dependencies().collect();

        // A framework fault wins over whatever the body returned, even if the
        // body caught it.
        let intermediates = tracer.finish()?;
        let output = result.map_err(Fault::Content)?;

        debug!(
            stack = C::NAME,
            recorded = intermediates.len(),
            dependencies = ?dependencies,
            "stack body completed"
        );
        Ok(StackEnvelope {
            input: input.clone(),
            intermediates,
            output,
        })
    }

    fn stages(&self) -> Vec<StageInfo> {
        vec![
            StageInfo::of::<C::Output>("calculate"),
            StageInfo::of::<Self::Output>("stack-traceability"),
        ]
    }
}
