//! Handler: the common "transform or fault" contract every stage implements.
//!
//! Stages wrap an inner handler, so stage N's output type is by construction
//! the input type stage N+1 works with.

use serde::Serialize;

use crate::context::Context;
use crate::error::PipelineError;

/// Why a handler did not produce its output.
#[derive(Debug)]
pub enum Fault {
    /// Raised by calculation business logic; the error stage contains it.
    Content(anyhow::Error),
    /// Raised by the framework itself; never contained.
    Pipeline(PipelineError),
}

impl From<PipelineError> for Fault {
    fn from(e: PipelineError) -> Self {
        Fault::Pipeline(e)
    }
}

/// Name and produced type of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageInfo {
    pub name: &'static str,
    pub produces: &'static str,
}

impl StageInfo {
    pub fn of<T: ?Sized>(name: &'static str) -> Self {
        Self {
            name,
            produces: std::any::type_name::<T>(),
        }
    }
}

pub trait Handler: Send + Sync {
    type Input;
    type Output;

    fn call(&self, input: &Self::Input, cx: &mut Context) -> Result<Self::Output, Fault>;

    /// Stages of this chain, innermost first.
    fn stages(&self) -> Vec<StageInfo>;
}
