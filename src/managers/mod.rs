// TabMix state managers
// Managers hold the in-memory state: mixer channels and browser tabs.

pub mod channel_registry;
pub mod tab_manager;
