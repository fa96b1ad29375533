use super::traits::{Handler, HandlerSpec};
use crate::error::HandlerError;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Central registry mapping `"namespace.action"` keys to handlers.
///
/// Populated once at process start, read-only afterwards; a shared
/// `Arc<HandlerRegistry>` may back any number of concurrent plan runs.
/// Resolution is a pure lookup: resolving the same key twice yields the
/// same handler, and failing lookups have no side effects.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn Handler>>,
    namespaces: HashSet<String>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Replaces any existing handler with the same
    /// namespace/action pair.
    pub fn register(&mut self, handler: Box<dyn Handler>) {
        let handler: Arc<dyn Handler> = Arc::from(handler);
        let key = format!("{}.{}", handler.namespace(), handler.action());
        self.namespaces.insert(handler.namespace().to_string());
        self.handlers.insert(key, handler);
    }

    /// Resolve a (namespace, action) pair to a handler.
    ///
    /// Two failure modes are kept distinct and never collapsed into a
    /// no-op: an unknown namespace is [`HandlerError::NotFound`], while a
    /// known namespace with no such action is [`HandlerError::Contract`] —
    /// the location exists but exposes no compatible entry point.
    pub fn resolve(&self, namespace: &str, action: &str) -> Result<Arc<dyn Handler>, HandlerError> {
        let key = format!("{namespace}.{action}");
        if let Some(handler) = self.handlers.get(&key) {
            return Ok(Arc::clone(handler));
        }

        if self.namespaces.contains(namespace) {
            Err(HandlerError::Contract {
                namespace: namespace.to_string(),
                action: action.to_string(),
            })
        } else {
            Err(HandlerError::NotFound {
                namespace: namespace.to_string(),
                action: action.to_string(),
            })
        }
    }

    /// Sorted list of registered `"namespace.action"` keys.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Specs for all registered handlers, sorted by key.
    pub fn specs(&self) -> Vec<HandlerSpec> {
        let mut specs: Vec<HandlerSpec> = self.handlers.values().map(|h| h.spec()).collect();
        specs.sort_by(|a, b| (&a.namespace, &a.action).cmp(&(&b.namespace, &b.action)));
        specs
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
