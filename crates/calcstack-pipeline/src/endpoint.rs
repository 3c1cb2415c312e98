//! Endpoints: a calculation with its composed pipeline and metadata.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use calcstack_core::{
    Describe, Envelope, FaultRecord, InputSchema, OwnerId, ResponseSchema, Signed, StackEnvelope,
    DIAGNOSTICS_DELIMITER, DIAGNOSTICS_HEADER,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::calculation::{Calculation, CalculationKind, Record};
use crate::context::Context;
use crate::error::{PipelineError, STATUS_CONTENT_FAULT, STATUS_OK};
use crate::handler::{Fault, Handler, StageInfo};
use crate::stage::fault_record;

/// Body of a response: the signed envelope, or the content fault that
/// replaced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Fault(FaultRecord),
}

/// What a top-level caller receives.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    pub outcome: Outcome<T>,
    /// Encoded diagnostics, `None` when nothing was raised.
    pub diagnostics: Option<String>,
}

impl<T> Response<T> {
    pub fn status(&self) -> u16 {
        match self.outcome {
            Outcome::Success(_) => STATUS_OK,
            Outcome::Fault(_) => STATUS_CONTENT_FAULT,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match &self.outcome {
            Outcome::Success(value) => Some(value),
            Outcome::Fault(_) => None,
        }
    }

    pub fn into_success(self) -> Option<T> {
        match self.outcome {
            Outcome::Success(value) => Some(value),
            Outcome::Fault(_) => None,
        }
    }

    pub fn fault(&self) -> Option<&FaultRecord> {
        match &self.outcome {
            Outcome::Fault(record) => Some(record),
            Outcome::Success(_) => None,
        }
    }

    /// Decoded diagnostics, in the order they were raised.
    pub fn warnings(&self) -> Vec<&str> {
        self.diagnostics
            .as_deref()
            .map(|d| d.split(DIAGNOSTICS_DELIMITER).collect())
            .unwrap_or_default()
    }

    /// Header name and value a transport attaches for the diagnostics.
    pub fn diagnostics_header(&self) -> Option<(&'static str, &str)> {
        self.diagnostics.as_deref().map(|d| (DIAGNOSTICS_HEADER, d))
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Response<U>, E> {
        let outcome = match self.outcome {
            Outcome::Success(value) => Outcome::Success(f(value)?),
            Outcome::Fault(record) => Outcome::Fault(record),
        };
        Ok(Response {
            outcome,
            diagnostics: self.diagnostics,
        })
    }
}

/// Metadata handed to the documentation/transport layer.
#[derive(Debug, Clone, Serialize)]
pub struct CalculationInfo {
    pub name: &'static str,
    pub owner: OwnerId,
    pub kind: CalculationKind,
    pub tags: Vec<&'static str>,
    pub description: &'static str,
    pub input: InputSchema,
    pub response: ResponseSchema,
    pub stages: Vec<StageInfo>,
}

impl CalculationInfo {
    pub(crate) fn of<C: Calculation>(kind: CalculationKind, stages: Vec<StageInfo>) -> Self {
        let response = match kind {
            CalculationKind::Rule => ResponseSchema::rule::<C::Input, C::Output>(C::NAME),
            CalculationKind::Stack => ResponseSchema::stack::<C::Input, C::Output>(C::NAME),
        };
        Self {
            name: C::NAME,
            owner: OwnerId::new(C::OWNER),
            kind,
            tags: C::TAGS.to_vec(),
            description: C::DESCRIPTION,
            input: C::Input::describe(),
            response,
            stages,
        }
    }

    /// Route the transport layer exposes this calculation under.
    pub fn endpoint(&self) -> String {
        format!("/{}", self.name)
    }

    /// Input field to upstream source tag.
    pub fn mapping(&self) -> BTreeMap<String, String> {
        self.input.mapping()
    }
}

type Pipeline<I, E> = Box<dyn Handler<Input = I, Output = Response<Signed<E>>>>;

/// A calculation wrapped in its full stage pipeline.
///
/// Endpoints are immutable after construction and safe to share across
/// threads; each call gets its own [`Context`].
pub struct Endpoint<I, E> {
    info: CalculationInfo,
    pipeline: Pipeline<I, E>,
    timeout: Option<Duration>,
}

/// Endpoint of a rule.
pub type RuleEndpoint<C> = Endpoint<
    <C as Calculation>::Input,
    Envelope<<C as Calculation>::Input, <C as Calculation>::Output>,
>;

/// Endpoint of a stack.
pub type StackEndpoint<C> = Endpoint<
    <C as Calculation>::Input,
    StackEnvelope<<C as Calculation>::Input, <C as Calculation>::Output>,
>;

impl<I, E> Endpoint<I, E> {
    pub(crate) fn new(info: CalculationInfo, pipeline: Pipeline<I, E>, timeout: Option<Duration>) -> Self {
        Self {
            info,
            pipeline,
            timeout,
        }
    }

    pub fn name(&self) -> &'static str {
        self.info.name
    }

    pub fn info(&self) -> &CalculationInfo {
        &self.info
    }

    pub fn stages(&self) -> &[StageInfo] {
        &self.info.stages
    }

    /// Invoke as a top-level call.
    ///
    /// Content faults come back as `Ok` with a fault outcome; `Err` is
    /// reserved for framework faults.
    pub fn execute(&self, input: &I) -> Result<Response<Signed<E>>, PipelineError> {
        let mut cx = Context::new(self.timeout);
        debug!(
            calculation = self.info.name,
            trace_id = %cx.trace_id(),
            "executing"
        );
        self.invoke(input, &mut cx)
    }

    /// Invoke within an existing context.
    pub(crate) fn invoke(&self, input: &I, cx: &mut Context) -> Result<Response<Signed<E>>, PipelineError> {
        cx.check_deadline(self.info.name)?;
        match self.pipeline.call(input, cx) {
            Ok(response) => Ok(response),
            Err(Fault::Pipeline(e)) => Err(e),
            // The error stage contains content faults; this only fires if a
            // stage above it raised one.
            Err(Fault::Content(err)) => Ok(Response {
                outcome: Outcome::Fault(fault_record(&err)),
                diagnostics: None,
            }),
        }
    }
}

impl<I, E> fmt::Debug for Endpoint<I, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("name", &self.info.name)
            .field("kind", &self.info.kind)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Type-erased endpoint, driven with JSON values.
pub trait DynEndpoint: Send + Sync {
    fn info(&self) -> &CalculationInfo;

    fn execute_json(&self, input: Value) -> Result<Response<Value>, PipelineError>;
}

impl<I, E> DynEndpoint for Endpoint<I, E>
where
    I: Record,
    E: Serialize + Send + Sync + 'static,
{
    fn info(&self) -> &CalculationInfo {
        &self.info
    }

    fn execute_json(&self, input: Value) -> Result<Response<Value>, PipelineError> {
        let input: I = serde_json::from_value(input).map_err(|e| PipelineError::InvalidInput {
            calculation: self.info.name.to_string(),
            message: e.to_string(),
        })?;
        self.execute(&input)?
            .try_map(serde_json::to_value)
            .map_err(|e| PipelineError::Serialization(e.to_string()))
    }
}
