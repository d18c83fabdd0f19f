use serde::{Deserialize, Serialize};

/// Top-level TabMix settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TabMixSettings {
    pub window: WindowSettings,
    pub tabs: TabSettings,
    pub mixer: MixerSettings,
    pub logging: LoggingSettings,
}

/// Main window geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Height of the mixer strip docked under the page area.
    pub mixer_height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "TabMix".to_string(),
            width: 1200,
            height: 800,
            mixer_height: 230,
        }
    }
}

/// What new tabs open with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabSettings {
    pub start_url: String,
    /// New tabs are labelled `"{label_prefix} {n}"`.
    pub label_prefix: String,
}

impl Default for TabSettings {
    fn default() -> Self {
        Self {
            start_url: "https://www.youtube.com".to_string(),
            label_prefix: "YouTube".to_string(),
        }
    }
}

/// Page-side behaviour of the mixer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MixerSettings {
    /// CSS selector of the elements media commands apply to.
    pub media_selector: String,
}

impl Default for MixerSettings {
    fn default() -> Self {
        Self {
            media_selector: "video".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
