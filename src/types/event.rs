use serde::{Deserialize, Serialize};

use super::channel::{ChannelId, TabId};

/// Discrete input the mixer receives from the UI shell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MixerEvent {
    TabOpened { tab: TabId },
    TabClosed { tab: TabId },
    /// `percent` is signed so out-of-range input can be reported rather than truncated.
    VolumeChanged { channel: ChannelId, percent: i64 },
    MuteToggled { channel: ChannelId, muted: bool },
    PlayRequested { channel: ChannelId },
    PauseRequested { channel: ChannelId },
    /// The tab's page finished loading; re-apply its own effective volume.
    PageLoaded { tab: TabId },
}
