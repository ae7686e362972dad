//! Provider registry
//!
//! The fixed provider set is built once per invocation and passed
//! explicitly to call sites; all lookups go through `get`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::Cache;
use crate::error::{McinitError, McinitResult};
use crate::provider::{
    BungeeProvider, PaperFamilyProvider, PaperProject, Provider, PurpurProvider, VanillaProvider,
};

pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Registry with the full built-in provider set
    pub fn with_defaults(cache: Cache) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(VanillaProvider::new(cache.clone())));
        registry.register(Arc::new(PaperFamilyProvider::new(
            PaperProject::Paper,
            cache.clone(),
        )));
        registry.register(Arc::new(PurpurProvider::new(cache.clone())));
        registry.register(Arc::new(PaperFamilyProvider::new(
            PaperProject::Folia,
            cache.clone(),
        )));
        registry.register(Arc::new(PaperFamilyProvider::new(
            PaperProject::Velocity,
            cache.clone(),
        )));
        registry.register(Arc::new(PaperFamilyProvider::new(
            PaperProject::Waterfall,
            cache,
        )));
        registry.register(Arc::new(BungeeProvider::new()));
        registry
    }

    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    pub fn get(&self, name: &str) -> McinitResult<Arc<dyn Provider>> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| McinitError::ProviderNotFound(name.to_string()))
    }

    /// Registered provider names, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn exists(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
