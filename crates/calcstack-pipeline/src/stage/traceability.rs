//! Traceability: pairs the output with the exact input that produced it.

use calcstack_core::Envelope;

use crate::context::Context;
use crate::handler::{Fault, Handler, StageInfo};

pub struct Traceability<H> {
    inner: H,
}

impl<H> Traceability<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> Handler for Traceability<H>
where
    H: Handler,
    H::Input: Clone,
{
    type Input = H::Input;
    type Output = Envelope<H::Input, H::Output>;

    fn call(&self, input: &H::Input, cx: &mut Context) -> Result<Self::Output, Fault> {
        let output = self.inner.call(input, cx)?;
        Ok(Envelope {
            input: input.clone(),
            output,
        })
    }

    fn stages(&self) -> Vec<StageInfo> {
        let mut stages = self.inner.stages();
        stages.push(StageInfo::of::<Self::Output>("traceability"));
        stages
    }
}
