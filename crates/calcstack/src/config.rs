//! Kernel configuration, loadable from TOML.
//!
//! ```toml
//! invocation_timeout_ms = 2000
//! warning_log_level = "debug"
//!
//! [signing]
//! key_id = "prod-2024"
//! seed = "<64 hex chars>"
//! ```

use std::path::Path;
use std::time::Duration;

use calcstack_core::Keypair;
use calcstack_pipeline::{PipelineOptions, WarningLevel};
use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};

/// Configuration for the Kernel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KernelConfig {
    pub signing: SigningConfig,
    /// Deadline for one external call, nested calls included.
    pub invocation_timeout_ms: Option<u64>,
    /// Level at which captured warnings are logged.
    pub warning_log_level: WarningLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SigningConfig {
    /// Appears in every signature as `ed25519:<key_id>`.
    pub key_id: String,
    /// Hex-encoded 32-byte seed. A random key is generated when absent.
    pub seed: Option<String>,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            key_id: "calcstack".to_string(),
            seed: None,
        }
    }
}

impl KernelConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.signing.key_id.is_empty() {
            return Err(KernelError::Config("signing.key_id must not be empty".into()));
        }
        if self.invocation_timeout_ms == Some(0) {
            return Err(KernelError::Config(
                "invocation_timeout_ms must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Signing key described by this configuration.
    pub fn keypair(&self) -> Result<Keypair> {
        match &self.signing.seed {
            Some(seed) => Keypair::from_seed_hex(seed)
                .map_err(|e| KernelError::Config(format!("signing.seed: {e}"))),
            None => Ok(Keypair::generate()),
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            timeout: self.invocation_timeout_ms.map(Duration::from_millis),
            warning_level: self.warning_log_level,
        }
    }
}
