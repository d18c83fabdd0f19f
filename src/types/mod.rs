// TabMix shared type definitions
// Each submodule defines types used across the application.

pub mod channel;
pub mod command;
pub mod errors;
pub mod event;
pub mod settings;
pub mod tab;
