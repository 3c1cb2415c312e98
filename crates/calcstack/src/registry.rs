//! Registry of defined calculations, keyed by unique name.

use std::collections::BTreeMap;
use std::sync::Arc;

use calcstack_pipeline::{ConfigurationFault, DynEndpoint};
use serde::Serialize;
use tracing::info;

/// One entry of the discovery listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculationListing {
    pub name: String,
    pub endpoint: String,
}

#[derive(Default)]
pub struct Registry {
    endpoints: BTreeMap<&'static str, Arc<dyn DynEndpoint>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.endpoints.contains_key(name)
    }

    /// Fails if the name is already taken; the registry is left unchanged.
    pub fn check_available(&self, name: &str) -> Result<(), ConfigurationFault> {
        if self.contains(name) {
            return Err(ConfigurationFault::DuplicateCalculation(name.to_string()));
        }
        Ok(())
    }

    pub fn register(&mut self, endpoint: Arc<dyn DynEndpoint>) -> Result<(), ConfigurationFault> {
        let info = endpoint.info();
        let name = info.name;
        self.check_available(name)?;
        info!(
            calculation = name,
            owner = %info.owner,
            kind = ?info.kind,
            "registered calculation"
        );
        self.endpoints.insert(name, endpoint);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn DynEndpoint>> {
        self.endpoints.get(name)
    }

    /// Every calculation in name order.
    pub fn list_calculations(&self) -> Vec<CalculationListing> {
        self.endpoints
            .values()
            .map(|e| CalculationListing {
                name: e.info().name.to_string(),
                endpoint: e.info().endpoint(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
