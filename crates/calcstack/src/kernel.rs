//! The Kernel: unified API for defining and executing calculations.
//!
//! The Kernel owns the signing service, the pipeline builder and the
//! registry. Calculations are defined once at startup; afterwards the kernel
//! is read-only and can be shared across threads.

use std::sync::Arc;

use calcstack_core::{Ed25519PublicKey, Keypair, SigningService};
use calcstack_pipeline::{
    CalculationInfo, PipelineBuilder, Response, Rule, RuleEndpoint, Stack, StackEndpoint,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::KernelConfig;
use crate::error::{KernelError, Result};
use crate::registry::{CalculationListing, Registry};

pub struct Kernel {
    config: KernelConfig,
    builder: PipelineBuilder,
    registry: Registry,
}

impl Kernel {
    /// Create a kernel with the key described by `config`.
    pub fn new(config: KernelConfig) -> Result<Self> {
        let keypair = config.keypair()?;
        Ok(Self::with_keypair(config, keypair))
    }

    /// Create a kernel signing with an explicit keypair.
    pub fn with_keypair(config: KernelConfig, keypair: Keypair) -> Self {
        info!(
            key_id = %config.signing.key_id,
            key = %keypair.public_key().fingerprint(),
            "signing service ready"
        );
        let signer = Arc::new(SigningService::new(config.signing.key_id.clone(), keypair));
        let builder = PipelineBuilder::new(signer).with_options(config.pipeline_options());
        Self {
            config,
            builder,
            registry: Registry::new(),
        }
    }

    /// Public key every envelope signature verifies against.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.builder.signer().public_key()
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Definition
    // ─────────────────────────────────────────────────────────────────────────

    /// Build and register a rule.
    ///
    /// The returned endpoint can be handed to stacks as a dependency.
    pub fn define_rule<C: Rule>(&mut self, calculation: C) -> Result<Arc<RuleEndpoint<C>>> {
        self.registry.check_available(C::NAME)?;
        let endpoint = Arc::new(self.builder.rule(calculation));
        self.registry.register(endpoint.clone())?;
        Ok(endpoint)
    }

    /// Build and register a stack.
    pub fn define_stack<C: Stack>(&mut self, calculation: C) -> Result<Arc<StackEndpoint<C>>> {
        self.registry.check_available(C::NAME)?;
        let endpoint = Arc::new(self.builder.stack(calculation));
        self.registry.register(endpoint.clone())?;
        Ok(endpoint)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Discovery
    // ─────────────────────────────────────────────────────────────────────────

    pub fn list_calculations(&self) -> Vec<CalculationListing> {
        self.registry.list_calculations()
    }

    pub fn info(&self, name: &str) -> Option<&CalculationInfo> {
        self.registry.get(name).map(|e| e.info())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Execution
    // ─────────────────────────────────────────────────────────────────────────

    /// Execute a calculation by name with a JSON input.
    pub fn execute(&self, name: &str, input: Value) -> Result<Response<Value>> {
        let endpoint = self
            .registry
            .get(name)
            .ok_or_else(|| KernelError::UnknownCalculation(name.to_string()))?;
        debug!(calculation = name, "dispatching");
        Ok(endpoint.execute_json(input)?)
    }
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel")
            .field("key_id", &self.config.signing.key_id)
            .field("calculations", &self.registry.len())
            .finish()
    }
}
