use super::create_character::CreateCharacterHandler;
use super::notify_party::NotifyPartyHandler;
use super::registry::HandlerRegistry;
use super::traits::Handler;
use super::validate_fields::ValidateFieldsHandler;
use crate::store::DocumentStore;
use std::sync::Arc;

/// Create the default handler set.
pub fn default_handlers(
    store: &Arc<dyn DocumentStore>,
    character_collection: &str,
) -> Vec<Box<dyn Handler>> {
    vec![
        Box::new(ValidateFieldsHandler::new()),
        Box::new(CreateCharacterHandler::new(
            Arc::clone(store),
            character_collection,
        )),
        Box::new(NotifyPartyHandler::new()),
    ]
}

/// Build a registry populated with the default handlers.
pub fn default_registry(
    store: &Arc<dyn DocumentStore>,
    character_collection: &str,
) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    for handler in default_handlers(store, character_collection) {
        registry.register(handler);
    }
    registry
}
