use tracing::debug;

use crate::types::channel::{Channel, ChannelId, TabId, MAX_VOLUME};
use crate::types::errors::MixerError;

/// Trait defining the channel registry interface.
///
/// The registry only records state. Sending anything to a page is the
/// dispatcher's job, so every method here can be tested without a live page.
pub trait ChannelRegistryTrait {
    fn create_channel(&mut self, id: ChannelId) -> Result<&Channel, MixerError>;
    fn remove_channel(&mut self, id: ChannelId) -> Result<Channel, MixerError>;
    fn get_channel(&self, id: ChannelId) -> Result<&Channel, MixerError>;
    fn set_volume(&mut self, id: ChannelId, volume: i64) -> Result<(), MixerError>;
    fn set_muted(&mut self, id: ChannelId, muted: bool) -> Result<(), MixerError>;
    fn all_channel_ids(&self) -> Vec<TabId>;
    fn current_volume(&self, id: ChannelId) -> Result<u8, MixerError>;
    fn is_muted(&self, id: ChannelId) -> Result<bool, MixerError>;
    fn snapshot(&self) -> Vec<Channel>;
}

/// In-memory store of every channel's volume and mute state.
///
/// The master channel exists from construction and cannot be removed. Tab
/// channels are kept in creation order, which is the fan-out order.
pub struct ChannelRegistry {
    master: Channel,
    tabs: Vec<Channel>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self {
            master: Channel::new(ChannelId::Master),
            tabs: Vec::new(),
        }
    }

    fn find_tab_index(&self, tab: TabId) -> Option<usize> {
        self.tabs.iter().position(|c| c.id == ChannelId::Tab(tab))
    }

    fn channel_mut(&mut self, id: ChannelId) -> Result<&mut Channel, MixerError> {
        match id {
            ChannelId::Master => Ok(&mut self.master),
            ChannelId::Tab(tab) => self
                .tabs
                .iter_mut()
                .find(|c| c.id == ChannelId::Tab(tab))
                .ok_or(MixerError::UnknownChannel(id)),
        }
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks a percentage before anything is mutated.
pub fn validate_volume(volume: i64) -> Result<u8, MixerError> {
    if (0..=i64::from(MAX_VOLUME)).contains(&volume) {
        Ok(volume as u8)
    } else {
        Err(MixerError::InvalidVolume(volume))
    }
}

impl ChannelRegistryTrait for ChannelRegistry {
    /// Register a channel with volume 50, unmuted.
    fn create_channel(&mut self, id: ChannelId) -> Result<&Channel, MixerError> {
        let tab = match id {
            ChannelId::Master => return Err(MixerError::DuplicateChannel(id)),
            ChannelId::Tab(tab) => tab,
        };
        if self.find_tab_index(tab).is_some() {
            return Err(MixerError::DuplicateChannel(id));
        }
        self.tabs.push(Channel::new(id));
        debug!(channel = %id, "channel created");
        Ok(&self.tabs[self.tabs.len() - 1])
    }

    fn remove_channel(&mut self, id: ChannelId) -> Result<Channel, MixerError> {
        let tab = match id {
            ChannelId::Master => return Err(MixerError::PermanentChannel(id)),
            ChannelId::Tab(tab) => tab,
        };
        let idx = self
            .find_tab_index(tab)
            .ok_or(MixerError::UnknownChannel(id))?;
        debug!(channel = %id, "channel removed");
        Ok(self.tabs.remove(idx))
    }

    fn get_channel(&self, id: ChannelId) -> Result<&Channel, MixerError> {
        match id {
            ChannelId::Master => Ok(&self.master),
            ChannelId::Tab(tab) => self
                .find_tab_index(tab)
                .map(|idx| &self.tabs[idx])
                .ok_or(MixerError::UnknownChannel(id)),
        }
    }

    /// Validate-then-set: an out-of-range volume leaves the record untouched.
    fn set_volume(&mut self, id: ChannelId, volume: i64) -> Result<(), MixerError> {
        let channel = self.channel_mut(id)?;
        channel.volume = validate_volume(volume)?;
        Ok(())
    }

    /// Muting captures the current volume into `pre_mute_volume`. Unmuting
    /// leaves `volume` alone: the last slider value stays authoritative.
    fn set_muted(&mut self, id: ChannelId, muted: bool) -> Result<(), MixerError> {
        let channel = self.channel_mut(id)?;
        if muted && !channel.muted {
            channel.pre_mute_volume = channel.volume;
        }
        channel.muted = muted;
        Ok(())
    }

    fn all_channel_ids(&self) -> Vec<TabId> {
        self.tabs.iter().filter_map(|c| c.id.tab()).collect()
    }

    fn current_volume(&self, id: ChannelId) -> Result<u8, MixerError> {
        self.get_channel(id).map(|c| c.volume)
    }

    fn is_muted(&self, id: ChannelId) -> Result<bool, MixerError> {
        self.get_channel(id).map(|c| c.muted)
    }

    /// Master first, then tabs in creation order.
    fn snapshot(&self) -> Vec<Channel> {
        std::iter::once(&self.master)
            .chain(self.tabs.iter())
            .cloned()
            .collect()
    }
}
