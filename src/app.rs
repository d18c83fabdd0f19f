//! App Core for TabMix.
//!
//! Holds the tab manager, the command dispatcher (which owns the channel
//! registry) and the settings engine, and routes UI events between them.

use serde::Serialize;
use tracing::{info, warn};

use crate::managers::channel_registry::ChannelRegistryTrait;
use crate::managers::tab_manager::{TabManager, TabManagerTrait};
use crate::services::command_dispatcher::{deliver, CommandDispatcher, DispatchReport, PageSink};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::channel::{ChannelId, TabId};
use crate::types::command::PageCommand;
use crate::types::errors::{MixerError, SettingsError};
use crate::types::event::MixerEvent;
use crate::types::settings::TabMixSettings;

/// One mixer strip as the shell renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelView {
    pub channel: ChannelId,
    pub label: String,
    pub volume: u8,
    pub muted: bool,
    pub active: bool,
}

/// Central application struct.
pub struct App {
    pub tab_manager: TabManager,
    pub dispatcher: CommandDispatcher,
    pub settings_engine: SettingsEngine,
    load_error: Option<SettingsError>,
}

impl App {
    /// Creates the app, loading settings from `config_path` or the platform
    /// default. An unreadable settings file is replaced by defaults and kept
    /// in [`App::load_error`] so the binary can report it once logging is up.
    pub fn new(config_path: Option<String>) -> Self {
        let mut settings_engine = SettingsEngine::new(config_path);
        let load_error = settings_engine.load().err();
        let tab_manager = TabManager::new(&settings_engine.get_settings().tabs.label_prefix);

        Self {
            tab_manager,
            dispatcher: CommandDispatcher::new(),
            settings_engine,
            load_error,
        }
    }

    pub fn settings(&self) -> &TabMixSettings {
        self.settings_engine.get_settings()
    }

    /// Why the settings file was not used, if it was not.
    pub fn load_error(&self) -> Option<&SettingsError> {
        self.load_error.as_ref()
    }

    /// Logs a settings load failure. Call after the subscriber is installed.
    pub fn report_load_error(&self) {
        if let Some(e) = &self.load_error {
            warn!(error = %e, path = self.settings_engine.get_config_path(), "using default settings");
        }
    }

    /// Updates one setting by dot-path, saves it, and applies it to the
    /// running session.
    pub fn set_setting(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        self.settings_engine.set_value(key, value)?;
        let prefix = self.settings().tabs.label_prefix.clone();
        self.tab_manager.set_label_prefix(&prefix);
        Ok(())
    }

    /// Opens a tab on `url` (the configured start page when `None`) and
    /// registers its channel. Returns the new tab id and the delivery report
    /// of the initial volume command.
    pub fn open_tab(
        &mut self,
        url: Option<&str>,
        label: Option<&str>,
        sink: &mut dyn PageSink,
    ) -> Result<(TabId, DispatchReport), MixerError> {
        let url = url
            .map(str::to_string)
            .unwrap_or_else(|| self.settings().tabs.start_url.clone());
        let tab = self.tab_manager.create_tab(&url, label);
        match self.handle_event(MixerEvent::TabOpened { tab }, sink) {
            Ok(report) => Ok((tab, report)),
            Err(e) => {
                if let Err(rollback) = self.tab_manager.close_tab(tab) {
                    warn!(tab, error = %rollback, "tab rollback failed");
                }
                Err(e)
            }
        }
    }

    pub fn close_tab(&mut self, tab: TabId, sink: &mut dyn PageSink) -> Result<(), MixerError> {
        self.handle_event(MixerEvent::TabClosed { tab }, sink).map(|_| ())
    }

    /// Applies one UI event: registry update first, then page commands.
    ///
    /// Errors are logged here and returned; none of them leave the registry
    /// half-updated.
    pub fn handle_event(
        &mut self,
        event: MixerEvent,
        sink: &mut dyn PageSink,
    ) -> Result<DispatchReport, MixerError> {
        let planned = self.plan(event);
        match planned {
            Ok(commands) => {
                sink.use_settings(&self.settings().mixer);
                Ok(deliver(&commands, sink))
            }
            Err(e) => {
                warn!(?event, error = %e, "mixer event rejected");
                Err(e)
            }
        }
    }

    fn plan(&mut self, event: MixerEvent) -> Result<Vec<PageCommand>, MixerError> {
        match event {
            MixerEvent::TabOpened { tab } => {
                if self.tab_manager.get_tab(tab).is_none() {
                    return Err(MixerError::UnknownChannel(ChannelId::Tab(tab)));
                }
                self.dispatcher.open_tab(tab)
            }
            MixerEvent::TabClosed { tab } => {
                if self.tab_manager.get_tab(tab).is_none() {
                    return Err(MixerError::UnknownChannel(ChannelId::Tab(tab)));
                }
                self.dispatcher.close_tab(tab)?;
                self.tab_manager.close_tab(tab)?;
                Ok(Vec::new())
            }
            MixerEvent::VolumeChanged { channel, percent } => {
                self.dispatcher.apply_volume(channel, percent)
            }
            MixerEvent::MuteToggled { channel, muted } => {
                let slider = self.dispatcher.registry().current_volume(channel)?;
                self.dispatcher.apply_mute(channel, muted, i64::from(slider))
            }
            MixerEvent::PlayRequested { channel } => self.dispatcher.play(channel),
            MixerEvent::PauseRequested { channel } => self.dispatcher.pause(channel),
            MixerEvent::PageLoaded { tab } => self.dispatcher.resync_tab(tab),
        }
    }

    /// Master first, then one strip per tab in creation order.
    pub fn channel_views(&self) -> Vec<ChannelView> {
        let active = self.tab_manager.get_active_tab().map(|t| t.id);
        self.dispatcher
            .registry()
            .snapshot()
            .into_iter()
            .map(|c| {
                let label = match c.id {
                    ChannelId::Master => "Master".to_string(),
                    ChannelId::Tab(tab) => self
                        .tab_manager
                        .get_tab(tab)
                        .map(|t| t.label.clone())
                        .unwrap_or_else(|| tab.to_string()),
                };
                ChannelView {
                    channel: c.id,
                    label,
                    volume: c.volume,
                    muted: c.muted,
                    active: c.id.tab().is_some() && c.id.tab() == active,
                }
            })
            .collect()
    }

    /// Shutdown sequence: nothing is persisted, only logged.
    pub fn shutdown(&mut self) {
        info!(tabs = self.tab_manager.tab_count(), "shutting down");
    }
}
