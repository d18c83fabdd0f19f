//! Command Dispatcher for TabMix.
//!
//! Turns a channel-scoped intent (volume, mute, play, pause) into concrete
//! per-page media commands. Planning and delivery are split: the `apply_*`
//! methods update the registry and return the commands to send, `deliver`
//! pushes them through a [`PageSink`].
//!
//! Master operations fan out to every tab in creation order. The master
//! value overrides what each page plays at, but never rewrites the tab
//! channels' own stored volume or mute flag.

use tracing::{debug, warn};

use crate::managers::channel_registry::{validate_volume, ChannelRegistry, ChannelRegistryTrait};
use crate::types::channel::{normalize, ChannelId, TabId};
use crate::types::command::{MediaCommand, PageCommand};
use crate::types::errors::MixerError;
use crate::types::settings::MixerSettings;

/// Receives media commands addressed to tab pages.
///
/// Sending is fire-and-forget: `Ok` means the command was handed to the page,
/// not that it took effect.
pub trait PageSink {
    fn send(&mut self, command: &PageCommand) -> Result<(), MixerError>;

    /// Called with the live mixer settings before a batch is delivered.
    /// Sinks that render scripts take the media selector from here.
    fn use_settings(&mut self, _mixer: &MixerSettings) {}
}

/// Outcome of delivering a batch of page commands.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DispatchReport {
    pub sent: Vec<PageCommand>,
    pub failed: Vec<(PageCommand, MixerError)>,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Sends every command in order. A failing page is logged and recorded, and
/// the remaining commands are still attempted; nothing is rolled back.
pub fn deliver(commands: &[PageCommand], sink: &mut dyn PageSink) -> DispatchReport {
    let mut report = DispatchReport::default();
    for command in commands {
        match sink.send(command) {
            Ok(()) => report.sent.push(*command),
            Err(err) => {
                let err = match err {
                    e @ MixerError::PageCommandFailure { .. } => e,
                    other => MixerError::PageCommandFailure {
                        tab: command.tab,
                        reason: other.to_string(),
                    },
                };
                warn!(tab = command.tab, error = %err, "page command not delivered");
                report.failed.push((*command, err));
            }
        }
    }
    report
}

/// Owns the channel registry; the only writer of channel state.
pub struct CommandDispatcher {
    registry: ChannelRegistry,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self {
            registry: ChannelRegistry::new(),
        }
    }

    /// Read-only view for rendering and tests.
    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// Pages an operation on `id` reaches. Fails for unknown channels before
    /// anything is mutated or sent.
    fn targets(&self, id: ChannelId) -> Result<Vec<TabId>, MixerError> {
        match id {
            ChannelId::Master => Ok(self.registry.all_channel_ids()),
            ChannelId::Tab(tab) => {
                self.registry.get_channel(id)?;
                Ok(vec![tab])
            }
        }
    }

    fn fan_out(targets: &[TabId], command: MediaCommand) -> Vec<PageCommand> {
        debug!(?command, targets = targets.len(), "planned media command");
        targets
            .iter()
            .map(|&tab| PageCommand::new(tab, command))
            .collect()
    }

    /// Registers the channel of a freshly opened tab and plans the initial
    /// volume for its page.
    pub fn open_tab(&mut self, tab: TabId) -> Result<Vec<PageCommand>, MixerError> {
        let channel = self.registry.create_channel(ChannelId::Tab(tab))?;
        let command = MediaCommand::volume(channel.effective_volume());
        Ok(Self::fan_out(&[tab], command))
    }

    pub fn close_tab(&mut self, tab: TabId) -> Result<(), MixerError> {
        self.registry.remove_channel(ChannelId::Tab(tab)).map(|_| ())
    }

    /// Re-plans the tab's own effective volume, e.g. after its page reloaded
    /// and the elements that received earlier commands are gone.
    pub fn resync_tab(&mut self, tab: TabId) -> Result<Vec<PageCommand>, MixerError> {
        let channel = self.registry.get_channel(ChannelId::Tab(tab))?;
        let command = MediaCommand::volume(channel.effective_volume());
        Ok(Self::fan_out(&[tab], command))
    }

    /// Stores `percent` on the channel and plans `percent / 100` for its
    /// page, or for every tab when `id` is the master.
    ///
    /// A muted channel still sends the raw value; the mute flag is only
    /// re-evaluated by `apply_mute`.
    pub fn apply_volume(&mut self, id: ChannelId, percent: i64) -> Result<Vec<PageCommand>, MixerError> {
        let targets = self.targets(id)?;
        let percent = validate_volume(percent)?;
        self.registry.set_volume(id, i64::from(percent))?;
        Ok(Self::fan_out(&targets, MediaCommand::volume(normalize(percent))))
    }

    /// Muted sends `0.0`; unmuted sends `slider / 100`. The master applies the
    /// same value to every tab, ignoring their individual volumes.
    pub fn apply_mute(
        &mut self,
        id: ChannelId,
        muted: bool,
        slider: i64,
    ) -> Result<Vec<PageCommand>, MixerError> {
        let targets = self.targets(id)?;
        // A mute sends silence whatever the slider says.
        let value = if muted {
            0.0
        } else {
            normalize(validate_volume(slider)?)
        };
        self.registry.set_muted(id, muted)?;
        Ok(Self::fan_out(&targets, MediaCommand::volume(value)))
    }

    pub fn play(&mut self, id: ChannelId) -> Result<Vec<PageCommand>, MixerError> {
        let targets = self.targets(id)?;
        Ok(Self::fan_out(&targets, MediaCommand::playback(true)))
    }

    pub fn pause(&mut self, id: ChannelId) -> Result<Vec<PageCommand>, MixerError> {
        let targets = self.targets(id)?;
        Ok(Self::fan_out(&targets, MediaCommand::playback(false)))
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
