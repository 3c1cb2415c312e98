//! Innermost stage: runs a rule body.

use crate::calculation::Rule;
use crate::context::Context;
use crate::handler::{Fault, Handler, StageInfo};

pub struct Calculate<C> {
    calculation: C,
}

impl<C> Calculate<C> {
    pub fn new(calculation: C) -> Self {
        Self { calculation }
    }
}

impl<C: Rule> Handler for Calculate<C> {
    type Input = C::Input;
    type Output = C::Output;

    fn call(&self, input: &C::Input, cx: &mut Context) -> Result<C::Output, Fault> {
        self.calculation
            .calculate(input, cx.diagnostics_mut())
            .map_err(Fault::Content)
    }

    fn stages(&self) -> Vec<StageInfo> {
        vec![StageInfo::of::<C::Output>("calculate")]
    }
}
