//! Proptest generators for property-based testing.

use proptest::prelude::*;

use calcstack_core::Keypair;

use crate::calculations::InputModel;

/// Magnitude bound for generated operands; sums and differences stay exact
/// enough to compare with `==`.
pub const OPERAND_BOUND: f64 = 1e12;

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a finite operand.
pub fn operand() -> impl Strategy<Value = f64> {
    -OPERAND_BOUND..OPERAND_BOUND
}

/// Generate any input.
pub fn input() -> impl Strategy<Value = InputModel> {
    (operand(), operand()).prop_map(|(x, y)| InputModel::new(x, y))
}

/// Generate an input `Add` accepts.
pub fn accepted_input() -> impl Strategy<Value = InputModel> {
    input().prop_filter("Add rejects x == 4", |i| i.x != 4.0)
}

/// Generate an input `Add` rejects.
pub fn rejected_input() -> impl Strategy<Value = InputModel> {
    operand().prop_map(|y| InputModel::new(4.0, y))
}

/// Generate a warning message that can be encoded.
pub fn warning_message() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.!?]{1,40}".prop_map(String::from)
}
