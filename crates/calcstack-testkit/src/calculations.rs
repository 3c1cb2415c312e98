//! Demo calculations written the way a content owner would write them.
//!
//! `Add` and `Subtract` are rules; `MyFirstStack` composes them and
//! `NestedStack` composes `MyFirstStack` with `Subtract`.

use std::sync::Arc;

use calcstack_core::{ContentFault, Describe, Diagnostics, FieldSpec, InputSchema};
use calcstack_pipeline::{Calculation, Rule, RuleEndpoint, Stack, StackEndpoint, Tracer};
use serde::{Deserialize, Serialize};

/// Just two numbers as input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputModel {
    pub x: f64,
    pub y: f64,
}

impl InputModel {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Describe for InputModel {
    fn describe() -> InputSchema {
        InputSchema::new("InputModel")
            .description("Just two numbers as input")
            .field(FieldSpec::number("x").example(20).mapping("ABC"))
            .field(FieldSpec::number("y").example(-3))
    }
}

/// And one number as output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputModel {
    pub z: f64,
}

pub struct Add;

impl Calculation for Add {
    type Input = InputModel;
    type Output = OutputModel;
    const NAME: &'static str = "Add";
    const OWNER: &'static str = "Another";
    const TAGS: &'static [&'static str] = &["SimpleCalculations"];
    const DESCRIPTION: &'static str = "To calculate the sum. Have fun with it.";
}

impl Rule for Add {
    fn calculate(
        &self,
        input: &InputModel,
        diagnostics: &mut Diagnostics,
    ) -> anyhow::Result<OutputModel> {
        if input.x == 4.0 {
            return Err(ContentFault::value("We don't like the number 4").into());
        }
        diagnostics.warn("Actually, we are really picky");
        Ok(OutputModel {
            z: input.x + input.y,
        })
    }
}

pub struct Subtract;

impl Calculation for Subtract {
    type Input = InputModel;
    type Output = OutputModel;
    const NAME: &'static str = "Subtract";
    const OWNER: &'static str = "A third";
    const TAGS: &'static [&'static str] = &["SimpleCalculations"];
    const DESCRIPTION: &'static str = "To calculate a difference.";
}

impl Rule for Subtract {
    fn calculate(&self, input: &InputModel, _: &mut Diagnostics) -> anyhow::Result<OutputModel> {
        Ok(OutputModel {
            z: input.x - input.y,
        })
    }
}

/// Adds, then subtracts 5 and `y` from the sum.
pub struct MyFirstStack {
    add: Arc<RuleEndpoint<Add>>,
    subtract: Arc<RuleEndpoint<Subtract>>,
}

impl MyFirstStack {
    pub fn new(add: Arc<RuleEndpoint<Add>>, subtract: Arc<RuleEndpoint<Subtract>>) -> Self {
        Self { add, subtract }
    }
}

impl Calculation for MyFirstStack {
    type Input = InputModel;
    type Output = OutputModel;
    const NAME: &'static str = "MyFirstStack";
    const OWNER: &'static str = "Another";
    const DESCRIPTION: &'static str =
        "We take two input parameters and add them, then subtract 5 and the second variable";
}

impl Stack for MyFirstStack {
    fn calculate(&self, input: &InputModel, tracer: &mut Tracer<'_>) -> anyhow::Result<OutputModel> {
        let sum = tracer.call(&self.add, input)?;
        let difference = tracer.call(
            &self.subtract,
            &InputModel::new(sum.output.z - 5.0, input.y),
        )?;
        Ok(OutputModel {
            z: difference.output.z,
        })
    }
}

/// Runs `MyFirstStack`, then subtracts 5 and `y` from its result.
pub struct NestedStack {
    stack: Arc<StackEndpoint<MyFirstStack>>,
    subtract: Arc<RuleEndpoint<Subtract>>,
}

impl NestedStack {
    pub fn new(
        stack: Arc<StackEndpoint<MyFirstStack>>,
        subtract: Arc<RuleEndpoint<Subtract>>,
    ) -> Self {
        Self { stack, subtract }
    }
}

impl Calculation for NestedStack {
    type Input = InputModel;
    type Output = OutputModel;
    const NAME: &'static str = "NestedStack";
    const OWNER: &'static str = "Another";
    const DESCRIPTION: &'static str = "Shows that stacks nest as deep as needed";
}

impl Stack for NestedStack {
    fn calculate(&self, input: &InputModel, tracer: &mut Tracer<'_>) -> anyhow::Result<OutputModel> {
        let first = tracer.call(&self.stack, input)?;
        let difference = tracer.call(
            &self.subtract,
            &InputModel::new(first.output.z - 5.0, input.y),
        )?;
        Ok(OutputModel {
            z: difference.output.z,
        })
    }
}

/// Calls `Subtract` twice, optionally resetting the tracer in between.
pub struct Repeated {
    subtract: Arc<RuleEndpoint<Subtract>>,
    reset_between: bool,
}

impl Repeated {
    pub fn new(subtract: Arc<RuleEndpoint<Subtract>>, reset_between: bool) -> Self {
        Self {
            subtract,
            reset_between,
        }
    }
}

impl Calculation for Repeated {
    type Input = InputModel;
    type Output = OutputModel;
    const NAME: &'static str = "Repeated";
    const OWNER: &'static str = "A third";
}

impl Stack for Repeated {
    fn calculate(&self, input: &InputModel, tracer: &mut Tracer<'_>) -> anyhow::Result<OutputModel> {
        let once = tracer.call(&self.subtract, input)?;
        if self.reset_between {
            tracer.reset();
        }
        let twice = tracer.call(
            &self.subtract,
            &InputModel::new(once.output.z, input.y),
        )?;
        Ok(OutputModel {
            z: twice.output.z,
        })
    }
}
