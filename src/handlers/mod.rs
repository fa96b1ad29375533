pub mod create_character;
pub mod factory;
pub mod notify_party;
pub mod registry;
pub mod traits;
pub mod validate_fields;

pub use create_character::CreateCharacterHandler;
pub use factory::{default_handlers, default_registry};
pub use notify_party::NotifyPartyHandler;
pub use registry::HandlerRegistry;
pub use traits::{Handler, HandlerSpec};
pub use validate_fields::ValidateFieldsHandler;
