//! Warning stage: collects diagnostics raised anywhere below it and
//! delivers them next to the result.
//!
//! Each warning stage owns a fresh diagnostics region for the duration of its
//! call and restores the caller's region afterwards, so nested invocations
//! and concurrent invocations never see each other's messages.

use calcstack_core::Diagnostics;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::context::Context;
use crate::endpoint::{Outcome, Response};
use crate::error::PipelineError;
use crate::handler::{Fault, Handler, StageInfo};

/// Level at which captured diagnostics are also written to the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    Debug,
    #[default]
    Info,
    Ignore,
}

impl WarningLevel {
    fn log(self, calculation: &str, diagnostics: &Diagnostics) {
        for message in diagnostics.messages() {
            match self {
                WarningLevel::Debug => debug!(calculation, warning = %message, "diagnostic"),
                WarningLevel::Info => info!(calculation, warning = %message, "diagnostic"),
                WarningLevel::Ignore => {}
            }
        }
    }
}

pub struct WarningCapture<H> {
    inner: H,
    calculation: &'static str,
    level: WarningLevel,
}

impl<H> WarningCapture<H> {
    pub fn new(calculation: &'static str, level: WarningLevel, inner: H) -> Self {
        Self {
            inner,
            calculation,
            level,
        }
    }
}

impl<H, T> Handler for WarningCapture<H>
where
    H: Handler<Output = Outcome<T>>,
{
    type Input = H::Input;
    type Output = Response<T>;

    fn call(&self, input: &H::Input, cx: &mut Context) -> Result<Response<T>, Fault> {
        let outer = cx.replace_diagnostics(Diagnostics::new());
        let result = self.inner.call(input, cx);
        let captured = cx.replace_diagnostics(outer);

        let outcome = result?;
        self.level.log(self.calculation, &captured);
        let diagnostics = captured.encode().map_err(|source| PipelineError::Encoding {
            calculation: self.calculation.to_string(),
            source,
        })?;

        Ok(Response {
            outcome,
            diagnostics,
        })
    }

    fn stages(&self) -> Vec<StageInfo> {
        let mut stages = self.inner.stages();
        stages.push(StageInfo::of::<Response<T>>("warning"));
        stages
    }
}
