use std::fmt;

use super::channel::{ChannelId, TabId};

// === MixerError ===

/// Errors raised by the channel registry and the command dispatcher.
///
/// None of these are fatal: the shell logs them and keeps running.
#[derive(Debug, Clone, PartialEq)]
pub enum MixerError {
    /// The operation referenced a channel that is not registered.
    UnknownChannel(ChannelId),
    /// A channel with this id is already registered.
    DuplicateChannel(ChannelId),
    /// Volume outside `0..=100` percent.
    InvalidVolume(i64),
    /// The page of a tab could not execute a media command.
    PageCommandFailure { tab: TabId, reason: String },
    /// The channel exists for the whole application lifetime and cannot be removed.
    PermanentChannel(ChannelId),
}

impl fmt::Display for MixerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MixerError::UnknownChannel(id) => write!(f, "Unknown channel: {}", id),
            MixerError::DuplicateChannel(id) => write!(f, "Channel already exists: {}", id),
            MixerError::InvalidVolume(v) => {
                write!(f, "Invalid volume: {} (expected 0..=100)", v)
            }
            MixerError::PageCommandFailure { tab, reason } => {
                write!(f, "Page command failed on tab {}: {}", tab, reason)
            }
            MixerError::PermanentChannel(id) => {
                write!(f, "Channel cannot be removed: {}", id)
            }
        }
    }
}

impl std::error::Error for MixerError {}

// === TabError ===

/// Errors related to tab management operations.
#[derive(Debug, Clone, PartialEq)]
pub enum TabError {
    /// Tab with the given ID was not found.
    NotFound(TabId),
}

impl fmt::Display for TabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabError::NotFound(id) => write!(f, "Tab not found: {}", id),
        }
    }
}

impl std::error::Error for TabError {}

impl From<TabError> for MixerError {
    fn from(err: TabError) -> Self {
        match err {
            TabError::NotFound(id) => MixerError::UnknownChannel(ChannelId::Tab(id)),
        }
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
