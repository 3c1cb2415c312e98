//! Stage composition, fault containment and tracer scoping.

use std::sync::Arc;
use std::time::Duration;

use calcstack_core::{
    ContentFault, Describe, Diagnostics, FieldSpec, InputSchema, Keypair, OwnerId, SigningService,
};
use calcstack_pipeline::{
    Calculation, ConfigurationFault, DynEndpoint, PipelineBuilder, PipelineError, PipelineOptions,
    Rule, RuleEndpoint, Stack, Tracer,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Pair {
    a: f64,
    b: f64,
}

impl Describe for Pair {
    fn describe() -> InputSchema {
        InputSchema::new("Pair")
            .field(FieldSpec::number("a").mapping("LEDGER_A"))
            .field(FieldSpec::number("b"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Total {
    total: f64,
}

struct Sum;

impl Calculation for Sum {
    type Input = Pair;
    type Output = Total;
    const NAME: &'static str = "Sum";
    const OWNER: &'static str = "Ledger";
}

impl Rule for Sum {
    fn calculate(&self, input: &Pair, diagnostics: &mut Diagnostics) -> anyhow::Result<Total> {
        if input.b == 0.0 {
            diagnostics.warn("b is zero");
        }
        if input.a < 0.0 {
            return Err(ContentFault::value("a must not be negative").into());
        }
        Ok(Total {
            total: input.a + input.b,
        })
    }
}

struct Noisy;

impl Calculation for Noisy {
    type Input = Pair;
    type Output = Total;
    const NAME: &'static str = "Noisy";
    const OWNER: &'static str = "Ledger";
}

impl Rule for Noisy {
    fn calculate(&self, _input: &Pair, diagnostics: &mut Diagnostics) -> anyhow::Result<Total> {
        diagnostics.warn("first;second");
        Ok(Total { total: 0.0 })
    }
}

/// Calls `Sum` twice.
struct Twice {
    sum: Arc<RuleEndpoint<Sum>>,
    reset_between: bool,
    swallow: bool,
}

impl Calculation for Twice {
    type Input = Pair;
    type Output = Total;
    const NAME: &'static str = "Twice";
    const OWNER: &'static str = "Ledger";
}

impl Stack for Twice {
    fn calculate(&self, input: &Pair, tracer: &mut Tracer<'_>) -> anyhow::Result<Total> {
        let first = tracer.call(&self.sum, input)?;
        if self.reset_between {
            tracer.reset();
        }
        match tracer.call(&self.sum, input) {
            Ok(second) => Ok(Total {
                total: first.output.total + second.output.total,
            }),
            Err(_) if self.swallow => Ok(first.output.clone()),
            Err(e) => Err(e),
        }
    }
}

/// Falls back when `Sum` faults.
struct Guarded {
    sum: Arc<RuleEndpoint<Sum>>,
}

impl Calculation for Guarded {
    type Input = Pair;
    type Output = Total;
    const NAME: &'static str = "Guarded";
    const OWNER: &'static str = "Treasury";
}

impl Stack for Guarded {
    fn calculate(&self, input: &Pair, tracer: &mut Tracer<'_>) -> anyhow::Result<Total> {
        match tracer.call(&self.sum, input) {
            Ok(signed) => Ok(signed.output.clone()),
            Err(_) => {
                tracer.warn("fell back");
                Ok(Total { total: -1.0 })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Seen {
    dependencies: Vec<String>,
    recorded: usize,
}

/// Reports what its tracer knows after a call and a reset.
struct Census {
    sum: Arc<RuleEndpoint<Sum>>,
}

impl Calculation for Census {
    type Input = Pair;
    type Output = Seen;
    const NAME: &'static str = "Census";
    const OWNER: &'static str = "Ledger";
}

impl Stack for Census {
    fn calculate(&self, input: &Pair, tracer: &mut Tracer<'_>) -> anyhow::Result<Seen> {
        tracer.call(&self.sum, input)?;
        tracer.reset();
        Ok(Seen {
            dependencies: tracer.dependencies().map(str::to_string).collect(),
            recorded: tracer.intermediates().len(),
        })
    }
}

fn builder() -> PipelineBuilder {
    PipelineBuilder::new(Arc::new(SigningService::new(
        "test",
        Keypair::from_seed(&[7u8; 32]),
    )))
}

fn with_sum() -> (PipelineBuilder, Arc<RuleEndpoint<Sum>>) {
    let b = builder();
    let sum = Arc::new(b.rule(Sum));
    (b, sum)
}

#[test]
fn test_rule_envelope_is_signed_by_owner() {
    let b = builder();
    let sum = b.rule(Sum);

    let response = sum.execute(&Pair { a: 2.0, b: 3.0 }).unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.diagnostics.is_none());

    let signed = response.success().unwrap();
    assert_eq!(signed.input, Pair { a: 2.0, b: 3.0 });
    assert_eq!(signed.output.total, 5.0);
    assert_eq!(signed.signatures.len(), 1);
    signed
        .verify(&OwnerId::new("Ledger"), &b.signer().public_key())
        .unwrap();
    assert!(signed
        .verify(&OwnerId::new("Treasury"), &b.signer().public_key())
        .is_err());
}

#[test]
fn test_rule_stage_order() {
    let sum = builder().rule(Sum);
    let names: Vec<_> = sum.stages().iter().map(|s| s.name).collect();
    assert_eq!(
        names,
        vec!["calculate", "traceability", "signing", "error", "warning"]
    );
    assert_eq!(sum.info().response.title, "SumResponse");
    assert_eq!(sum.info().mapping()["a"], "LEDGER_A");
    assert_eq!(sum.info().endpoint(), "/Sum");
}

#[test]
fn test_content_fault_keeps_diagnostics() {
    let sum = builder().rule(Sum);

    let response = sum.execute(&Pair { a: -1.0, b: 0.0 }).unwrap();
    assert_eq!(response.status(), 567);
    let fault = response.fault().unwrap();
    assert_eq!(fault.kind, "ValueError");
    assert_eq!(fault.message, "a must not be negative");
    assert_eq!(response.warnings(), vec!["b is zero"]);
}

#[test]
fn test_delimiter_in_diagnostic_is_framework_fault() {
    let noisy = builder().rule(Noisy);
    let err = noisy.execute(&Pair { a: 1.0, b: 1.0 }).unwrap_err();
    assert!(matches!(err, PipelineError::Encoding { .. }));
}

#[test]
fn test_stack_stage_order() {
    let (b, sum) = with_sum();
    let stack = b.stack(Twice {
        sum,
        reset_between: true,
        swallow: false,
    });
    let names: Vec<_> = stack.stages().iter().map(|s| s.name).collect();
    assert_eq!(
        names,
        vec!["calculate", "stack-traceability", "signing", "error", "warning"]
    );
    assert!(stack.info().response.has_intermediates());
}

#[test]
fn test_duplicate_dependency_aborts() {
    let (b, sum) = with_sum();
    let stack = b.stack(Twice {
        sum,
        reset_between: false,
        swallow: false,
    });

    let err = stack.execute(&Pair { a: 1.0, b: 2.0 }).unwrap_err();
    match err {
        PipelineError::Configuration(ConfigurationFault::DuplicateDependency {
            stack,
            dependency,
        }) => {
            assert_eq!(stack, "Twice");
            assert_eq!(dependency, "Sum");
        }
        other => panic!("expected duplicate dependency, got {other:?}"),
    }
}

#[test]
fn test_swallowed_duplicate_still_aborts() {
    let (b, sum) = with_sum();
    let stack = b.stack(Twice {
        sum,
        reset_between: false,
        swallow: true,
    });

    let err = stack.execute(&Pair { a: 1.0, b: 2.0 }).unwrap_err();
    assert!(matches!(err, PipelineError::Configuration(_)));
}

#[test]
fn test_reset_allows_second_call() {
    let (b, sum) = with_sum();
    let stack = b.stack(Twice {
        sum,
        reset_between: true,
        swallow: false,
    });

    let response = stack.execute(&Pair { a: 1.0, b: 0.0 }).unwrap();
    let signed = response.success().unwrap();
    assert_eq!(signed.output.total, 2.0);
    assert_eq!(signed.intermediates.names(), vec!["Sum"]);
    // Both calls raised a warning, both are forwarded.
    assert_eq!(response.warnings(), vec!["b is zero", "b is zero"]);
}

#[test]
fn test_each_invocation_gets_a_fresh_scope() {
    let (b, sum) = with_sum();
    let stack = b.stack(Twice {
        sum,
        reset_between: true,
        swallow: false,
    });

    for _ in 0..3 {
        let response = stack.execute(&Pair { a: 1.0, b: 1.0 }).unwrap();
        assert_eq!(response.success().unwrap().intermediates.len(), 1);
    }
}

#[test]
fn test_dependency_fault_is_visible_to_body() {
    let b = builder();
    let sum = Arc::new(b.rule(Sum));
    let guarded = b.stack(Guarded { sum });

    let response = guarded.execute(&Pair { a: -5.0, b: 1.0 }).unwrap();
    assert_eq!(response.status(), 200);
    let signed = response.success().unwrap();
    assert_eq!(signed.output.total, -1.0);
    assert!(signed.intermediates.is_empty());
    assert_eq!(response.warnings(), vec!["fell back"]);
    signed
        .verify(&OwnerId::new("Treasury"), &b.signer().public_key())
        .unwrap();
}

#[test]
fn test_execute_json_rejects_bad_input() {
    let sum = builder().rule(Sum);

    let err = sum.execute_json(json!({"a": "two", "b": 1})).unwrap_err();
    assert_eq!(err.status(), 422);

    let response = sum.execute_json(json!({"a": 2, "b": 1})).unwrap();
    let body = response.success().unwrap();
    assert_eq!(body["output"]["total"], 3.0);
    assert!(body["signatures"]["Ledger"]["key"]
        .as_str()
        .unwrap()
        .starts_with("ed25519:"));
}

#[test]
fn test_expired_deadline_is_framework_fault() {
    let b = builder().with_options(PipelineOptions {
        timeout: Some(Duration::ZERO),
        ..PipelineOptions::default()
    });
    let sum = b.rule(Sum);

    let err = sum.execute(&Pair { a: 1.0, b: 1.0 }).unwrap_err();
    assert!(matches!(err, PipelineError::DeadlineExceeded { .. }));
}

#[test]
fn test_known_dependencies_outlive_reset() {
    let (b, sum) = with_sum();
    let census = b.stack(Census { sum });

    let response = census.execute(&Pair { a: 1.0, b: 1.0 }).unwrap();
    let signed = response.success().unwrap();
    assert_eq!(signed.output.dependencies, vec!["Sum"]);
    assert_eq!(signed.output.recorded, 0);
    assert!(signed.intermediates.is_empty());
}
