// TabMix services
// Stateless-at-the-edge logic: media command planning and delivery, settings persistence.

pub mod command_dispatcher;
pub mod settings_engine;
