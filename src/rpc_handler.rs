//! Method handler for the TabMix JSON protocol.
//!
//! Both the mixer strip inside the GUI (over wry IPC) and the `tabmix-ctl`
//! stdio server post `{"method": ..., "params": {...}}` objects. This module
//! turns them into `App` calls so the mapping can be unit-tested without a
//! window.

use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::tab_manager::TabManagerTrait;
use crate::services::command_dispatcher::{DispatchReport, PageSink};
use crate::types::channel::{ChannelId, TabId};
use crate::types::event::MixerEvent;

fn report_json(report: &DispatchReport) -> Value {
    let failed: Vec<Value> = report
        .failed
        .iter()
        .map(|(cmd, err)| json!({"tab": cmd.tab, "error": err.to_string()}))
        .collect();
    json!({"sent": report.sent.len(), "failed": failed})
}

fn channel_param(params: &Value) -> Result<ChannelId, String> {
    let raw = params.get("channel").cloned().ok_or("missing channel")?;
    serde_json::from_value(raw).map_err(|e| format!("invalid channel: {}", e))
}

fn tab_param(params: &Value) -> Result<TabId, String> {
    params
        .get("id")
        .and_then(|v| v.as_u64())
        .and_then(|v| TabId::try_from(v).ok())
        .ok_or_else(|| "missing id".to_string())
}

fn tabs_json(app: &App) -> Value {
    let active = app.tab_manager.get_active_tab().map(|t| t.id);
    let tabs: Vec<Value> = app
        .tab_manager
        .get_all_tabs()
        .iter()
        .map(|t| json!({"id": t.id, "label": t.label, "title": t.title, "url": t.url, "active": Some(t.id) == active}))
        .collect();
    json!(tabs)
}

/// Full mixer state: strips plus tabs, used to render the mixer UI.
pub fn state_json(app: &App) -> Value {
    json!({"channels": app.channel_views(), "tabs": tabs_json(app)})
}

/// Dispatch a method call to the app.
///
/// Page commands produced by the call go to `sink` before this returns.
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(
    app: &Mutex<App>,
    sink: &mut dyn PageSink,
    method: &str,
    params: &Value,
) -> Result<Value, String> {
    let mut a = app.lock().map_err(|e| e.to_string())?;
    match method {
        // ─── Tabs ───
        "tab.open" => {
            let url = params
                .get("url")
                .and_then(|v| v.as_str())
                .map(normalize_url);
            let label = params.get("label").and_then(|v| v.as_str());
            let (id, report) = a
                .open_tab(url.as_deref(), label, sink)
                .map_err(|e| e.to_string())?;
            let url = a.tab_manager.get_tab(id).map(|t| t.url.clone()).unwrap_or_default();
            Ok(json!({"id": id, "url": url, "dispatch": report_json(&report)}))
        }
        "tab.close" => {
            let id = tab_param(params)?;
            a.close_tab(id, sink).map_err(|e| e.to_string())?;
            let active = a.tab_manager.get_active_tab().map(|t| t.id);
            Ok(json!({"ok": true, "active": active}))
        }
        "tab.switch" => {
            let id = tab_param(params)?;
            a.tab_manager.switch_tab(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true, "active": id}))
        }
        "tab.list" => Ok(tabs_json(&a)),

        // ─── Mixer ───
        "mixer.volume" => {
            let channel = channel_param(params)?;
            let percent = params
                .get("percent")
                .and_then(|v| v.as_i64())
                .ok_or("missing percent")?;
            let report = a
                .handle_event(MixerEvent::VolumeChanged { channel, percent }, sink)
                .map_err(|e| e.to_string())?;
            Ok(report_json(&report))
        }
        "mixer.mute" => {
            let channel = channel_param(params)?;
            let muted = params
                .get("muted")
                .and_then(|v| v.as_bool())
                .ok_or("missing muted")?;
            let report = a
                .handle_event(MixerEvent::MuteToggled { channel, muted }, sink)
                .map_err(|e| e.to_string())?;
            Ok(report_json(&report))
        }
        "mixer.play" | "mixer.pause" => {
            let channel = channel_param(params)?;
            let event = if method == "mixer.play" {
                MixerEvent::PlayRequested { channel }
            } else {
                MixerEvent::PauseRequested { channel }
            };
            let report = a.handle_event(event, sink).map_err(|e| e.to_string())?;
            Ok(report_json(&report))
        }
        "mixer.event" => {
            let event: MixerEvent = serde_json::from_value(params.clone())
                .map_err(|e| format!("invalid event: {}", e))?;
            let report = a.handle_event(event, sink).map_err(|e| e.to_string())?;
            Ok(report_json(&report))
        }
        "mixer.state" => Ok(state_json(&a)),

        // ─── Settings ───
        "settings.get" => serde_json::to_value(a.settings()).map_err(|e| e.to_string()),
        "settings.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            a.set_setting(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}

/// Tab a successful call closed, so the shell can drop its page view.
/// Covers `tab.close` and a raw `tab_closed` event on `mixer.event`.
pub fn closed_tab(method: &str, params: &Value) -> Option<TabId> {
    match method {
        "tab.close" => tab_param(params).ok(),
        "mixer.event" => match serde_json::from_value(params.clone()) {
            Ok(MixerEvent::TabClosed { tab }) => Some(tab),
            _ => None,
        },
        _ => None,
    }
}

// ─── Helpers ───

/// Turns address-bar input into a loadable URL: full URLs pass through,
/// host-like input gets `https://`, anything else becomes a search.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "about:blank" {
        return "about:blank".to_string();
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return trimmed.to_string();
    }
    if trimmed.contains('.') && !trimmed.contains(' ') {
        return format!("https://{}", trimmed);
    }
    format!("https://www.youtube.com/results?search_query={}", urlencoding(trimmed))
}

fn urlencoding(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 3);
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(char::from(b"0123456789ABCDEF"[(b >> 4) as usize]));
                out.push(char::from(b"0123456789ABCDEF"[(b & 0xf) as usize]));
            }
        }
    }
    out
}
