use serde::{Deserialize, Serialize};

use super::channel::TabId;

/// One-shot instruction applied to every media element present on a page at
/// the moment it runs. Elements added later are not affected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MediaCommand {
    SetMediaVolume { value: f64 },
    SetMediaPlayback { playing: bool },
}

impl MediaCommand {
    pub fn volume(value: f64) -> Self {
        MediaCommand::SetMediaVolume {
            value: value.clamp(0.0, 1.0),
        }
    }

    pub fn playback(playing: bool) -> Self {
        MediaCommand::SetMediaPlayback { playing }
    }

    /// Renders the command as a self-contained page script.
    ///
    /// `selector` picks the media elements (`video` by default). The script
    /// never throws: `play()` rejections (autoplay policy, no source) are
    /// swallowed on the page side.
    pub fn to_script(&self, selector: &str) -> String {
        let selector = serde_json::to_string(selector).unwrap_or_else(|_| "\"video\"".into());
        let body = match self {
            MediaCommand::SetMediaVolume { value } => {
                format!("els[i].volume = {:.2};", value.clamp(0.0, 1.0))
            }
            MediaCommand::SetMediaPlayback { playing: true } => {
                "var p = els[i].play(); if (p && p.catch) { p.catch(function(){}); }".to_string()
            }
            MediaCommand::SetMediaPlayback { playing: false } => "els[i].pause();".to_string(),
        };
        format!(
            "(function(){{try{{var els = document.querySelectorAll({});for (var i = 0; i < els.length; i++) {{ {} }}}}catch(e){{}}}})();",
            selector, body
        )
    }
}

/// A media command addressed to one tab's page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageCommand {
    pub tab: TabId,
    pub command: MediaCommand,
}

impl PageCommand {
    pub fn new(tab: TabId, command: MediaCommand) -> Self {
        Self { tab, command }
    }
}
