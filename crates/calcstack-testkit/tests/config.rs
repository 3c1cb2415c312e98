//! Kernel construction from TOML configuration.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use calcstack::{Kernel, KernelConfig, KernelError, PipelineError};
use calcstack_core::{Diagnostics, Keypair, OwnerId};
use calcstack_pipeline::{Calculation, Rule, RuleEndpoint, Stack, Tracer, WarningLevel};
use calcstack_testkit::{Add, InputModel, OutputModel, Subtract, TestFixture, FIXTURE_SEED};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(&format!(
        r#"
        warning_log_level = "debug"

        [signing]
        key_id = "nightly"
        seed = "{}"
        "#,
        hex::encode(FIXTURE_SEED)
    ));

    let config = KernelConfig::load(file.path()).unwrap();
    assert_eq!(config.warning_log_level, WarningLevel::Debug);

    let mut kernel = Kernel::new(config).unwrap();
    assert_eq!(
        kernel.public_key(),
        Keypair::from_seed(&FIXTURE_SEED).public_key()
    );

    let add = kernel.define_rule(Add).unwrap();
    let response = add.execute(&InputModel::new(1.0, 2.0)).unwrap();
    let signed = response.success().unwrap();
    let owner = OwnerId::new("Another");
    assert_eq!(signed.signatures.get(&owner).unwrap().key, "ed25519:nightly");
    signed.verify(&owner, &kernel.public_key()).unwrap();
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = KernelConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, KernelError::Io(_)));
}

#[test]
fn test_unknown_key_rejected() {
    let file = write_config("invocation_timeout = 5\n");
    let err = KernelConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, KernelError::ConfigParse(_)));
}

#[test]
fn test_bad_seed_rejected_at_construction() {
    let config = KernelConfig::from_toml_str("[signing]\nseed = \"not hex\"").unwrap();
    assert!(matches!(Kernel::new(config), Err(KernelError::Config(_))));
}

#[test]
fn test_generous_timeout_does_not_fire() {
    let config = KernelConfig::from_toml_str("invocation_timeout_ms = 60000").unwrap();
    let fixture = TestFixture::with_config(config);
    let response = fixture
        .nested_stack
        .execute(&InputModel::new(10.0, 3.0))
        .unwrap();
    assert_eq!(response.success().unwrap().output.z, -3.0);
}

#[test]
fn test_expired_deadline_aborts() {
    let mut config = KernelConfig::default();
    // Bypasses validation on purpose: a zero deadline is already expired.
    config.invocation_timeout_ms = Some(0);
    let fixture = TestFixture::with_config(config);

    let err = fixture
        .first_stack
        .execute(&InputModel::new(10.0, 3.0))
        .unwrap_err();
    assert!(matches!(err, PipelineError::DeadlineExceeded { .. }));
}

/// Takes longer than the configured deadline.
struct Slow;

impl Calculation for Slow {
    type Input = InputModel;
    type Output = OutputModel;
    const NAME: &'static str = "Slow";
    const OWNER: &'static str = "Another";
}

impl Rule for Slow {
    fn calculate(&self, input: &InputModel, _: &mut Diagnostics) -> anyhow::Result<OutputModel> {
        std::thread::sleep(Duration::from_millis(80));
        Ok(OutputModel { z: input.x })
    }
}

struct SlowThenSubtract {
    slow: Arc<RuleEndpoint<Slow>>,
    subtract: Arc<RuleEndpoint<Subtract>>,
}

impl Calculation for SlowThenSubtract {
    type Input = InputModel;
    type Output = OutputModel;
    const NAME: &'static str = "SlowThenSubtract";
    const OWNER: &'static str = "Another";
}

impl Stack for SlowThenSubtract {
    fn calculate(&self, input: &InputModel, tracer: &mut Tracer<'_>) -> anyhow::Result<OutputModel> {
        let first = tracer.call(&self.slow, input)?;
        let second = tracer.call(&self.subtract, &InputModel::new(first.output.z, input.y))?;
        Ok(second.output)
    }
}

#[test]
fn test_deadline_checked_before_each_sub_call() {
    let config = KernelConfig::from_toml_str("invocation_timeout_ms = 20").unwrap();
    let mut kernel = Kernel::with_keypair(config, Keypair::from_seed(&FIXTURE_SEED));
    let slow = kernel.define_rule(Slow).unwrap();
    let subtract = kernel.define_rule(Subtract).unwrap();
    let stack = kernel
        .define_stack(SlowThenSubtract { slow, subtract })
        .unwrap();

    // The first sub-call starts in time; the second finds the deadline spent.
    let err = stack.execute(&InputModel::new(10.0, 3.0)).unwrap_err();
    match err {
        PipelineError::DeadlineExceeded {
            calculation,
            elapsed_ms,
        } => {
            assert_eq!(calculation, "SlowThenSubtract");
            assert!(elapsed_ms >= 80, "elapsed {elapsed_ms}ms");
        }
        other => panic!("expected deadline exceeded, got {other:?}"),
    }
}
