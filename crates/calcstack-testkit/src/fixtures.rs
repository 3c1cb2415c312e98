//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::{Arc, Once};

use calcstack::{Kernel, KernelConfig};
use calcstack_core::{Ed25519PublicKey, Keypair, OwnerId};
use calcstack_pipeline::{RuleEndpoint, StackEndpoint};

use crate::calculations::{Add, MyFirstStack, NestedStack, Subtract};

/// Seed used by [`TestFixture::deterministic`].
pub const FIXTURE_SEED: [u8; 32] = [0x42; 32];

/// A kernel with every demo calculation defined.
pub struct TestFixture {
    pub kernel: Kernel,
    pub add: Arc<RuleEndpoint<Add>>,
    pub subtract: Arc<RuleEndpoint<Subtract>>,
    pub first_stack: Arc<StackEndpoint<MyFirstStack>>,
    pub nested_stack: Arc<StackEndpoint<NestedStack>>,
}

impl TestFixture {
    /// Create a new test fixture with a random signing key.
    pub fn new() -> Self {
        Self::with_keypair(KernelConfig::default(), Keypair::generate())
    }

    /// Create with a deterministic key from [`FIXTURE_SEED`].
    pub fn deterministic() -> Self {
        Self::with_seed(FIXTURE_SEED)
    }

    /// Create with a deterministic key from `seed`.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::with_keypair(KernelConfig::default(), Keypair::from_seed(&seed))
    }

    pub fn with_config(config: KernelConfig) -> Self {
        let keypair = Keypair::from_seed(&FIXTURE_SEED);
        Self::with_keypair(config, keypair)
    }

    fn with_keypair(config: KernelConfig, keypair: Keypair) -> Self {
        let mut kernel = Kernel::with_keypair(config, keypair);
        let add = kernel.define_rule(Add).expect("define Add");
        let subtract = kernel.define_rule(Subtract).expect("define Subtract");
        let first_stack = kernel
            .define_stack(MyFirstStack::new(add.clone(), subtract.clone()))
            .expect("define MyFirstStack");
        let nested_stack = kernel
            .define_stack(NestedStack::new(first_stack.clone(), subtract.clone()))
            .expect("define NestedStack");

        Self {
            kernel,
            add,
            subtract,
            first_stack,
            nested_stack,
        }
    }

    /// Get the signing public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.kernel.public_key()
    }

    pub fn owner(name: &str) -> OwnerId {
        OwnerId::new(name)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

static TRACING: Once = Once::new();

/// Install a test-writer tracing subscriber once per process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}
