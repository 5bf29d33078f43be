//! Trigger provider registry.

use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

use hookline_protocols::error::RegistryError;
use hookline_protocols::trigger::{TriggerProvider, TriggerProviderDeclaration};

/// Registry for trigger providers, keyed by provider name.
pub struct TriggerRegistry {
    providers: DashMap<String, Arc<dyn TriggerProvider>>,
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self {
            providers: DashMap::new(),
        }
    }

    /// Register a provider after validating its declaration.
    pub fn register(&self, provider: Arc<dyn TriggerProvider>) -> Result<(), RegistryError> {
        provider.declaration().validate()?;
        let name = provider.name().to_string();

        if self.providers.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered(name));
        }

        info!(provider = %name, "Registered trigger provider");
        self.providers.insert(name, provider);
        Ok(())
    }

    pub fn unregister(&self, name: &str) -> Result<(), RegistryError> {
        self.providers
            .remove(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn TriggerProvider>> {
        self.providers.get(name).map(|p| p.clone())
    }

    /// Like [`get`](Self::get) but reports a missing provider as an error.
    pub fn require(&self, name: &str) -> Result<Arc<dyn TriggerProvider>, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    pub fn list_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.iter().map(|p| p.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn declarations(&self) -> Vec<TriggerProviderDeclaration> {
        let mut decls: Vec<TriggerProviderDeclaration> = self
            .providers
            .iter()
            .map(|p| p.declaration().clone())
            .collect();
        decls.sort_by(|a, b| a.identity.name.cmp(&b.identity.name));
        decls
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for TriggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
