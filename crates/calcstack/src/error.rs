//! Error types for the Kernel.

use calcstack_pipeline::{ConfigurationFault, PipelineError};
use thiserror::Error;

/// Errors that can occur during Kernel operations.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Fault raised while defining or executing a calculation.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// No calculation registered under this name.
    #[error("unknown calculation: {0}")]
    UnknownCalculation(String),

    /// Configuration that parses but cannot be used.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigurationFault> for KernelError {
    fn from(fault: ConfigurationFault) -> Self {
        KernelError::Pipeline(PipelineError::Configuration(fault))
    }
}

impl KernelError {
    /// Transport status for this error.
    pub fn status(&self) -> u16 {
        match self {
            KernelError::Pipeline(e) => e.status(),
            KernelError::UnknownCalculation(_) => 404,
            _ => calcstack_pipeline::STATUS_INTERNAL,
        }
    }
}

/// Result type for Kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
