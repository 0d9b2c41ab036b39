//! Instance-scoped registry of available speech backends

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::speech::traits::SpeechEngine;

/// Registry mapping engine ids to backend instances
///
/// Populated once at pipeline construction; availability is expressed by
/// presence in the map, so probing happens at registration time only.
#[derive(Default)]
pub struct EngineRegistry {
    engines: HashMap<String, Arc<dyn SpeechEngine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend under its own id, replacing any previous entry
    pub fn register(&mut self, engine: Arc<dyn SpeechEngine>) {
        let id = engine.info().id.clone();
        info!(engine_id = %id, "registered speech engine");
        self.engines.insert(id, engine);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn SpeechEngine>> {
        self.engines.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.engines.contains_key(id)
    }

    /// Ids of all registered backends, sorted for stable output
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.engines.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl std::fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("engines", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::formant::FormantEngine;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = EngineRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(FormantEngine::new(16_000)));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("formant"));
        assert!(registry.get("formant").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_ids_sorted() {
        let mut registry = EngineRegistry::new();
        registry.register(Arc::new(FormantEngine::new(16_000)));
        assert_eq!(registry.ids(), vec!["formant".to_string()]);
    }
}
