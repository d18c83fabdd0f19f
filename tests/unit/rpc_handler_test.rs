//! Unit tests for the method handler shared by the GUI IPC bridge and the
//! `tabmix-ctl` stdio server.

use std::sync::Mutex;

use serde_json::json;
use tabmix::app::App;
use tabmix::rpc_handler::{closed_tab, handle_method};
use tabmix::services::command_dispatcher::PageSink;
use tabmix::types::command::{MediaCommand, PageCommand};
use tabmix::types::errors::MixerError;
use tabmix::types::settings::MixerSettings;
use tempfile::TempDir;

#[derive(Default)]
struct RecordingSink {
    sent: Vec<PageCommand>,
}

impl PageSink for RecordingSink {
    fn send(&mut self, command: &PageCommand) -> Result<(), MixerError> {
        self.sent.push(*command);
        Ok(())
    }
}

fn setup() -> (Mutex<App>, RecordingSink, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let path = tmp.path().join("settings.json").to_string_lossy().to_string();
    (Mutex::new(App::new(Some(path))), RecordingSink::default(), tmp)
}

// ─── Unknown method ───

#[test]
fn test_unknown_method_returns_error() {
    let (app, mut sink, _tmp) = setup();
    let res = handle_method(&app, &mut sink, "nonexistent.method", &json!({}));
    assert!(res.unwrap_err().contains("unknown method"));
}

// ─── Tabs ───

#[test]
fn test_tab_open_defaults_and_normalizes() {
    let (app, mut sink, _tmp) = setup();

    let res = handle_method(&app, &mut sink, "tab.open", &json!({})).unwrap();
    assert_eq!(res["id"], 0);
    assert_eq!(res["url"], "https://www.youtube.com");
    assert_eq!(res["dispatch"]["sent"], 1);

    let res = handle_method(&app, &mut sink, "tab.open", &json!({"url": "vimeo.com"})).unwrap();
    assert_eq!(res["id"], 1);
    assert_eq!(res["url"], "https://vimeo.com");
}

#[test]
fn test_tab_list_switch_close() {
    let (app, mut sink, _tmp) = setup();
    handle_method(&app, &mut sink, "tab.open", &json!({"label": "A"})).unwrap();
    handle_method(&app, &mut sink, "tab.open", &json!({"label": "B"})).unwrap();

    handle_method(&app, &mut sink, "tab.switch", &json!({"id": 0})).unwrap();
    let list = handle_method(&app, &mut sink, "tab.list", &json!({})).unwrap();
    let arr = list.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["label"], "A");
    assert_eq!(arr[0]["active"], true);

    let res = handle_method(&app, &mut sink, "tab.close", &json!({"id": 0})).unwrap();
    assert_eq!(res["active"], 1);
    assert!(handle_method(&app, &mut sink, "tab.close", &json!({"id": 0})).is_err());
    assert!(handle_method(&app, &mut sink, "tab.close", &json!({})).is_err());
}

// ─── Mixer ───

#[test]
fn test_master_volume_fans_out() {
    let (app, mut sink, _tmp) = setup();
    for _ in 0..3 {
        handle_method(&app, &mut sink, "tab.open", &json!({})).unwrap();
    }
    sink.sent.clear();

    let res = handle_method(
        &app,
        &mut sink,
        "mixer.volume",
        &json!({"channel": "master", "percent": 70}),
    )
    .unwrap();
    assert_eq!(res["sent"], 3);
    assert!(sink
        .sent
        .iter()
        .all(|c| c.command == MediaCommand::SetMediaVolume { value: 0.7 }));
}

#[test]
fn test_mute_play_pause_on_tab() {
    let (app, mut sink, _tmp) = setup();
    handle_method(&app, &mut sink, "tab.open", &json!({})).unwrap();
    sink.sent.clear();

    handle_method(&app, &mut sink, "mixer.mute", &json!({"channel": 0, "muted": true})).unwrap();
    handle_method(&app, &mut sink, "mixer.play", &json!({"channel": 0})).unwrap();
    handle_method(&app, &mut sink, "mixer.pause", &json!({"channel": "0"})).unwrap();

    let cmds: Vec<MediaCommand> = sink.sent.iter().map(|c| c.command).collect();
    assert_eq!(
        cmds,
        vec![
            MediaCommand::SetMediaVolume { value: 0.0 },
            MediaCommand::playback(true),
            MediaCommand::playback(false),
        ]
    );
}

#[test]
fn test_mixer_errors_are_strings() {
    let (app, mut sink, _tmp) = setup();
    let err = handle_method(&app, &mut sink, "mixer.play", &json!({"channel": 4})).unwrap_err();
    assert!(err.contains("Unknown channel"));

    let err = handle_method(
        &app,
        &mut sink,
        "mixer.volume",
        &json!({"channel": "master", "percent": 150}),
    )
    .unwrap_err();
    assert!(err.contains("Invalid volume"));

    let err = handle_method(&app, &mut sink, "mixer.play", &json!({"channel": "left"})).unwrap_err();
    assert!(err.contains("invalid channel"));
    assert!(handle_method(&app, &mut sink, "mixer.volume", &json!({"channel": 0})).is_err());
    assert!(sink.sent.is_empty());
}

#[test]
fn test_raw_event() {
    let (app, mut sink, _tmp) = setup();
    handle_method(&app, &mut sink, "tab.open", &json!({})).unwrap();
    sink.sent.clear();

    let res = handle_method(
        &app,
        &mut sink,
        "mixer.event",
        &json!({"type": "volume_changed", "channel": 0, "percent": 25}),
    )
    .unwrap();
    assert_eq!(res["sent"], 1);
    assert_eq!(sink.sent[0].command, MediaCommand::SetMediaVolume { value: 0.25 });

    assert!(handle_method(&app, &mut sink, "mixer.event", &json!({"type": "explode"})).is_err());
}

#[test]
fn test_state_lists_master_first() {
    let (app, mut sink, _tmp) = setup();
    handle_method(&app, &mut sink, "tab.open", &json!({"label": "Lofi"})).unwrap();
    handle_method(&app, &mut sink, "mixer.mute", &json!({"channel": "master", "muted": true})).unwrap();

    let state = handle_method(&app, &mut sink, "mixer.state", &json!({})).unwrap();
    let channels = state["channels"].as_array().unwrap();
    assert_eq!(channels[0]["channel"], "master");
    assert_eq!(channels[0]["muted"], true);
    assert_eq!(channels[1]["channel"], 0);
    assert_eq!(channels[1]["label"], "Lofi");
    assert_eq!(channels[1]["volume"], 50);
    assert_eq!(state["tabs"].as_array().unwrap().len(), 1);
}

// ─── Settings ───

#[test]
fn test_settings_get_and_set() {
    let (app, mut sink, _tmp) = setup();
    let settings = handle_method(&app, &mut sink, "settings.get", &json!({})).unwrap();
    assert_eq!(settings["mixer"]["media_selector"], "video");

    handle_method(
        &app,
        &mut sink,
        "settings.set",
        &json!({"key": "tabs.start_url", "value": "https://vimeo.com"}),
    )
    .unwrap();
    let settings = handle_method(&app, &mut sink, "settings.get", &json!({})).unwrap();
    assert_eq!(settings["tabs"]["start_url"], "https://vimeo.com");

    assert!(handle_method(&app, &mut sink, "settings.set", &json!({"key": "x"})).is_err());
}

/// Renders scripts with whatever selector the app hands over before delivery.
#[derive(Default)]
struct ScriptSink {
    media_selector: String,
    scripts: Vec<String>,
}

impl PageSink for ScriptSink {
    fn use_settings(&mut self, mixer: &MixerSettings) {
        self.media_selector.clone_from(&mixer.media_selector);
    }

    fn send(&mut self, command: &PageCommand) -> Result<(), MixerError> {
        self.scripts.push(command.command.to_script(&self.media_selector));
        Ok(())
    }
}

#[test]
fn test_media_selector_change_applies_to_next_command() {
    let (app, _, _tmp) = setup();
    let mut sink = ScriptSink::default();
    handle_method(&app, &mut sink, "tab.open", &json!({})).unwrap();
    assert!(sink.scripts[0].contains(r#"querySelectorAll("video")"#));

    handle_method(
        &app,
        &mut sink,
        "settings.set",
        &json!({"key": "mixer.media_selector", "value": "video, audio"}),
    )
    .unwrap();
    handle_method(&app, &mut sink, "mixer.play", &json!({"channel": "master"})).unwrap();

    assert_eq!(sink.scripts.len(), 2);
    assert!(sink.scripts[1].contains(r#"querySelectorAll("video, audio")"#));
}

#[test]
fn test_label_prefix_change_applies_to_new_tabs() {
    let (app, mut sink, _tmp) = setup();
    handle_method(&app, &mut sink, "tab.open", &json!({})).unwrap();
    handle_method(
        &app,
        &mut sink,
        "settings.set",
        &json!({"key": "tabs.label_prefix", "value": "Clip"}),
    )
    .unwrap();
    handle_method(&app, &mut sink, "tab.open", &json!({})).unwrap();

    let tabs = handle_method(&app, &mut sink, "tab.list", &json!({})).unwrap();
    assert_eq!(tabs[0]["label"], "YouTube 0");
    assert_eq!(tabs[1]["label"], "Clip 1");
}

// ─── Closed tabs ───

#[test]
fn test_closed_tab_covers_close_and_raw_event() {
    assert_eq!(closed_tab("tab.close", &json!({"id": 3})), Some(3));
    assert_eq!(closed_tab("mixer.event", &json!({"type": "tab_closed", "tab": 4})), Some(4));
    assert_eq!(closed_tab("mixer.event", &json!({"type": "page_loaded", "tab": 4})), None);
    assert_eq!(closed_tab("tab.switch", &json!({"id": 3})), None);
}

#[test]
fn test_raw_tab_closed_event_removes_tab() {
    let (app, mut sink, _tmp) = setup();
    handle_method(&app, &mut sink, "tab.open", &json!({})).unwrap();
    let params = json!({"type": "tab_closed", "tab": 0});

    handle_method(&app, &mut sink, "mixer.event", &params).unwrap();

    assert_eq!(closed_tab("mixer.event", &params), Some(0));
    let tabs = handle_method(&app, &mut sink, "tab.list", &json!({})).unwrap();
    assert!(tabs.as_array().unwrap().is_empty());
}
