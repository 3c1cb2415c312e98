//! Error stage: turns content faults into structured fault records.
//!
//! Framework faults pass through untouched.

use calcstack_core::{ContentFault, FaultRecord, GENERIC_FAULT_KIND};
use tracing::warn;

use crate::context::Context;
use crate::endpoint::Outcome;
use crate::handler::{Fault, Handler, StageInfo};

pub struct ErrorBoundary<H> {
    inner: H,
    calculation: &'static str,
}

impl<H> ErrorBoundary<H> {
    pub fn new(calculation: &'static str, inner: H) -> Self {
        Self { inner, calculation }
    }
}

/// Fault record for a business-logic error.
///
/// The kind comes from a [`ContentFault`] anywhere in the chain, otherwise
/// [`GENERIC_FAULT_KIND`].
pub fn fault_record(err: &anyhow::Error) -> FaultRecord {
    match err.chain().find_map(|e| e.downcast_ref::<ContentFault>()) {
        Some(fault) if err.chain().count() == 1 => FaultRecord::from(fault),
        Some(fault) => FaultRecord {
            message: format!("{err:#}"),
            kind: fault.kind.clone(),
        },
        None => FaultRecord {
            message: format!("{err:#}"),
            kind: GENERIC_FAULT_KIND.to_string(),
        },
    }
}

impl<H: Handler> Handler for ErrorBoundary<H> {
    type Input = H::Input;
    type Output = Outcome<H::Output>;

    fn call(&self, input: &H::Input, cx: &mut Context) -> Result<Self::Output, Fault> {
        match self.inner.call(input, cx) {
            Ok(value) => Ok(Outcome::Success(value)),
            Err(Fault::Content(err)) => {
                let record = fault_record(&err);
                warn!(
                    calculation = self.calculation,
                    kind = %record.kind,
                    message = %record.message,
                    "content fault"
                );
                Ok(Outcome::Fault(record))
            }
            Err(fault @ Fault::Pipeline(_)) => Err(fault),
        }
    }

    fn stages(&self) -> Vec<StageInfo> {
        let mut stages = self.inner.stages();
        stages.push(StageInfo::of::<Self::Output>("error"));
        stages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context as _;

    #[test]
    fn test_typed_fault_keeps_kind() {
        let err = anyhow::Error::new(ContentFault::value("We don't like the number 4"));
        let record = fault_record(&err);
        assert_eq!(record.kind, "ValueError");
        assert_eq!(record.message, "We don't like the number 4");
    }

    #[test]
    fn test_context_wrapped_fault_keeps_kind() {
        let err = Err::<(), _>(ContentFault::value("negative"))
            .context("computing z")
            .unwrap_err();
        let record = fault_record(&err);
        assert_eq!(record.kind, "ValueError");
        assert_eq!(record.message, "computing z: negative");
    }

    #[test]
    fn test_untyped_fault_is_generic() {
        let record = fault_record(&anyhow::anyhow!("boom"));
        assert_eq!(record.kind, GENERIC_FAULT_KIND);
        assert_eq!(record.message, "boom");
    }
}
