//! Golden vectors for the demo calculations.
//!
//! Every operand is exactly representable, so expected results compare with
//! `==`. `None` means the calculation ends in a content fault.

use serde_json::{json, Value};

/// One input with the expected `z` of every demo calculation.
#[derive(Debug, Clone, Copy)]
pub struct GoldenVector {
    pub name: &'static str,
    pub x: f64,
    pub y: f64,
    pub add: Option<f64>,
    pub subtract: f64,
    pub first_stack: Option<f64>,
    pub nested_stack: Option<f64>,
}

impl GoldenVector {
    pub fn input(&self) -> Value {
        json!({ "x": self.x, "y": self.y })
    }

    /// Expected `z` for a calculation by name.
    pub fn expected(&self, calculation: &str) -> Option<f64> {
        match calculation {
            "Add" => self.add,
            "Subtract" => Some(self.subtract),
            "MyFirstStack" => self.first_stack,
            "NestedStack" => self.nested_stack,
            _ => None,
        }
    }
}

pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "documented_example",
            x: 10.0,
            y: 3.0,
            add: Some(13.0),
            subtract: 7.0,
            first_stack: Some(5.0),
            nested_stack: Some(-3.0),
        },
        GoldenVector {
            name: "zeros",
            x: 0.0,
            y: 0.0,
            add: Some(0.0),
            subtract: 0.0,
            first_stack: Some(-5.0),
            nested_stack: Some(-10.0),
        },
        GoldenVector {
            name: "binary_fractions",
            x: 1.5,
            y: 2.25,
            add: Some(3.75),
            subtract: -0.75,
            first_stack: Some(-3.5),
            nested_stack: Some(-10.75),
        },
        GoldenVector {
            name: "negative_x",
            x: -7.0,
            y: 4.0,
            add: Some(-3.0),
            subtract: -11.0,
            first_stack: Some(-12.0),
            nested_stack: Some(-21.0),
        },
        GoldenVector {
            name: "negative_y",
            x: 100.0,
            y: -3.0,
            add: Some(97.0),
            subtract: 103.0,
            first_stack: Some(95.0),
            nested_stack: Some(93.0),
        },
        GoldenVector {
            name: "rejected_four",
            x: 4.0,
            y: 1.0,
            add: None,
            subtract: 3.0,
            first_stack: None,
            nested_stack: None,
        },
    ]
}
