//! TabMix control server — drives a headless mixer over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"mixer.volume", "params":{"channel":"master","percent":70}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Page commands the request produces are written first, one line each:
//! {"event":"page_command","tab":0,"command":{...},"script":"..."}

use std::io::{self, BufRead, Write};
use std::sync::Mutex;

use serde_json::{json, Value};
use tracing::{info, warn};

use tabmix::app::App;
use tabmix::logging::init_tracing;
use tabmix::rpc_handler::handle_method;
use tabmix::services::command_dispatcher::PageSink;
use tabmix::types::command::PageCommand;
use tabmix::types::errors::MixerError;
use tabmix::types::settings::MixerSettings;

/// Emits page commands as protocol lines instead of running them in a page.
struct StdoutSink {
    media_selector: String,
}

impl PageSink for StdoutSink {
    fn use_settings(&mut self, mixer: &MixerSettings) {
        self.media_selector.clone_from(&mixer.media_selector);
    }

    fn send(&mut self, command: &PageCommand) -> Result<(), MixerError> {
        let line = json!({
            "event": "page_command",
            "tab": command.tab,
            "command": command.command,
            "script": command.command.to_script(&self.media_selector),
        });
        write_line(&line).map_err(|e| MixerError::PageCommandFailure {
            tab: command.tab,
            reason: e.to_string(),
        })
    }
}

fn write_line(value: &Value) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", value)?;
    out.flush()
}

fn main() {
    let config_path = std::env::var("TABMIX_CONFIG").ok();
    let app = App::new(config_path);
    init_tracing(&app.settings().logging.filter);
    app.report_load_error();

    let mut sink = StdoutSink {
        media_selector: app.settings().mixer.media_selector.clone(),
    };
    let app = Mutex::new(app);

    if write_line(&json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")})).is_err() {
        return;
    }
    info!("control server ready");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "unparseable request");
                if write_line(&json!({"id": null, "error": format!("parse error: {}", e)})).is_err() {
                    break;
                }
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&app, &mut sink, method, &params) {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        if write_line(&response).is_err() {
            break;
        }
    }

    if let Ok(mut a) = app.lock() {
        a.shutdown();
    };
}
