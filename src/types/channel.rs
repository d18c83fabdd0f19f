use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable handle of a browser tab. Allocated from a monotonically increasing
/// counter, never reused after the tab closes.
pub type TabId = u32;

/// Volume every channel starts at, in percent.
pub const DEFAULT_VOLUME: u8 = 50;

/// Upper bound of the volume scale, in percent.
pub const MAX_VOLUME: u8 = 100;

/// Identifies one audio-controllable unit: a single tab or the master fader.
///
/// On the wire a channel is either the string `"master"` or the integer tab id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawChannelId", into = "RawChannelId")]
pub enum ChannelId {
    Master,
    Tab(TabId),
}

impl ChannelId {
    pub fn tab(&self) -> Option<TabId> {
        match self {
            ChannelId::Master => None,
            ChannelId::Tab(id) => Some(*id),
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelId::Master => write!(f, "master"),
            ChannelId::Tab(id) => write!(f, "tab {}", id),
        }
    }
}

impl From<TabId> for ChannelId {
    fn from(id: TabId) -> Self {
        ChannelId::Tab(id)
    }
}

/// Untagged JSON form of [`ChannelId`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawChannelId {
    Tab(TabId),
    Name(String),
}

impl TryFrom<RawChannelId> for ChannelId {
    type Error = String;

    fn try_from(raw: RawChannelId) -> Result<Self, Self::Error> {
        match raw {
            RawChannelId::Tab(id) => Ok(ChannelId::Tab(id)),
            RawChannelId::Name(name) if name == "master" => Ok(ChannelId::Master),
            RawChannelId::Name(name) => name
                .parse::<TabId>()
                .map(ChannelId::Tab)
                .map_err(|_| format!("invalid channel id: {}", name)),
        }
    }
}

impl From<ChannelId> for RawChannelId {
    fn from(id: ChannelId) -> Self {
        match id {
            ChannelId::Master => RawChannelId::Name("master".to_string()),
            ChannelId::Tab(id) => RawChannelId::Tab(id),
        }
    }
}

/// Mixer state of a single channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    /// Percent in `0..=100`.
    pub volume: u8,
    pub muted: bool,
    /// Volume captured when the channel last became muted.
    pub pre_mute_volume: u8,
}

impl Channel {
    pub fn new(id: ChannelId) -> Self {
        Self {
            id,
            volume: DEFAULT_VOLUME,
            muted: false,
            pre_mute_volume: DEFAULT_VOLUME,
        }
    }

    /// Volume a page should be playing at for this channel alone, in `0.0..=1.0`.
    pub fn effective_volume(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            normalize(self.volume)
        }
    }
}

/// Converts a percentage to the `0.0..=1.0` scale used by media elements.
pub fn normalize(percent: u8) -> f64 {
    f64::from(percent.min(MAX_VOLUME)) / 100.0
}
