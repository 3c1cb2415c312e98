//! Calculation traits implemented by business owners.
//!
//! A calculation declares its name, owner and record types as associated
//! items. The pipeline is built around the type at construction time; owners
//! never touch envelopes, signatures or fault handling.

use std::fmt;

use calcstack_core::{Describe, Diagnostics};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::tracer::Tracer;

/// A serializable, validated record: calculation input or output.
pub trait Record: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {}

impl<T> Record for T where T: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationKind {
    Rule,
    Stack,
}

/// Static description shared by rules and stacks.
pub trait Calculation: Send + Sync + 'static {
    type Input: Record + Describe;
    type Output: Record;

    /// Unique within the kernel it is defined in.
    const NAME: &'static str;
    /// Identity whose signature the envelope carries.
    const OWNER: &'static str;
    const TAGS: &'static [&'static str] = &[];
    const DESCRIPTION: &'static str = "";
}

/// A leaf calculation.
///
/// Returning `Err` raises a content fault. Return a
/// [`ContentFault`](calcstack_core::ContentFault) to choose the fault kind.
pub trait Rule: Calculation {
    fn calculate(
        &self,
        input: &Self::Input,
        diagnostics: &mut Diagnostics,
    ) -> anyhow::Result<Self::Output>;
}

/// A composite calculation whose body invokes other calculations through
/// the tracer.
pub trait Stack: Calculation {
    fn calculate(&self, input: &Self::Input, tracer: &mut Tracer<'_>)
        -> anyhow::Result<Self::Output>;
}
