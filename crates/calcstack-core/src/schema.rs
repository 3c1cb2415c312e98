//! Schema descriptors handed to the documentation/transport layer.
//!
//! Input types describe themselves through [`Describe`]; response schemas are
//! composed once per calculation from the declared input and output types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Primitive shape of an input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Number,
    Integer,
    String,
    Boolean,
    Object,
    Array,
}

/// One declared input field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Upstream source-field tag this input is sourced from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            description: None,
            example: None,
            mapping: None,
        }
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn example(mut self, example: impl Into<Value>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn mapping(mut self, tag: impl Into<String>) -> Self {
        self.mapping = Some(tag.into());
        self
    }
}

/// Declared shape of a calculation's input record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSchema {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldSpec>,
}

impl InputSchema {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Field-lineage descriptor: input field name to upstream source tag.
    pub fn mapping(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter_map(|f| f.mapping.as_ref().map(|m| (f.name.clone(), m.clone())))
            .collect()
    }
}

/// Implemented by every calculation input record.
pub trait Describe {
    fn describe() -> InputSchema;
}

/// Composite response structure of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSchema {
    /// `<Name>Response`.
    pub title: String,
    /// Top-level fields in serialization order.
    pub fields: Vec<String>,
    pub input_type: String,
    pub output_type: String,
    pub input: InputSchema,
}

impl ResponseSchema {
    /// Schema of a signed rule envelope.
    pub fn rule<I: Describe, O>(name: &str) -> Self {
        Self::compose::<I, O>(name, &["input", "output", "signatures"])
    }

    /// Schema of a signed stack envelope.
    pub fn stack<I: Describe, O>(name: &str) -> Self {
        Self::compose::<I, O>(name, &["input", "intermediates", "output", "signatures"])
    }

    fn compose<I: Describe, O>(name: &str, fields: &[&str]) -> Self {
        Self {
            title: format!("{name}Response"),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            input_type: std::any::type_name::<I>().to_string(),
            output_type: std::any::type_name::<O>().to_string(),
            input: I::describe(),
        }
    }

    pub fn has_intermediates(&self) -> bool {
        self.fields.iter().any(|f| f == "intermediates")
    }
}
