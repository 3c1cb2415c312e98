//! Signing: attaches the owner's signature to the envelope.

use std::sync::Arc;

use calcstack_core::{OwnerId, Signed, SigningService};
use serde::Serialize;

use crate::context::Context;
use crate::error::PipelineError;
use crate::handler::{Fault, Handler, StageInfo};

pub struct Signing<H> {
    inner: H,
    calculation: &'static str,
    owner: OwnerId,
    signer: Arc<SigningService>,
}

impl<H> Signing<H> {
    pub fn new(
        calculation: &'static str,
        owner: OwnerId,
        signer: Arc<SigningService>,
        inner: H,
    ) -> Self {
        Self {
            inner,
            calculation,
            owner,
            signer,
        }
    }
}

impl<H> Handler for Signing<H>
where
    H: Handler,
    H::Output: Serialize,
{
    type Input = H::Input;
    type Output = Signed<H::Output>;

    fn call(&self, input: &H::Input, cx: &mut Context) -> Result<Self::Output, Fault> {
        let envelope = self.inner.call(input, cx)?;
        self.signer
            .attach(&self.owner, envelope)
            .map_err(|source| {
                PipelineError::Encoding {
                    calculation: self.calculation.to_string(),
                    source,
                }
                .into()
            })
    }

    fn stages(&self) -> Vec<StageInfo> {
        let mut stages = self.inner.stages();
        stages.push(StageInfo::of::<Self::Output>("signing"));
        stages
    }
}
