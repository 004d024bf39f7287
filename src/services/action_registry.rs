// src/services/action_registry.rs
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};

pub type ActionHandler = Arc<dyn Fn() + Send + Sync>;

/// Maps action names coming back from the chat endpoint to client callbacks.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    handlers: Arc<RwLock<HashMap<String, ActionHandler>>>,
}

impl Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = match self.handlers.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(_) => Vec::new(),
        };
        f.debug_struct("ActionRegistry").field("actions", &names).finish()
    }
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`, replacing any previous one.
    pub fn register<F>(&self, name: impl Into<String>, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut guard = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        guard.insert(name.into(), Arc::new(handler));
    }

    /// Runs the handler for `name`. Unknown names are logged and ignored.
    pub fn dispatch(&self, name: &str) -> bool {
        let handler = {
            let guard = self.handlers.read().unwrap_or_else(|e| e.into_inner());
            guard.get(name).cloned()
        };

        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => {
                tracing::warn!(action = name, "unknown chat action");
                false
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        let guard = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        guard.contains_key(name)
    }
}
