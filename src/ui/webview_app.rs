//! Tabbed browser window with a mixer strip, built on `wry` + `tao`.
//!
//! Architecture:
//! - One child WebView per tab fills the upper part of the window; only the
//!   active tab's view is visible.
//! - The mixer strip is its own WebView docked at the bottom, served through
//!   the `tabmix://` custom protocol.
//! - The strip talks to Rust with `window.ipc.postMessage({method, params})`,
//!   handled by `rpc_handler::handle_method`. Page commands produced there
//!   are queued and forwarded to the event loop, which owns the WebViews.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy};
use tao::window::{Window, WindowBuilder};
use tracing::{debug, error, info, warn};
use wry::dpi::{LogicalPosition, LogicalSize};
use wry::{PageLoadEvent, Rect, WebView, WebViewBuilder};

use crate::app::App;
use crate::logging::init_tracing;
use crate::managers::tab_manager::TabManagerTrait;
use crate::rpc_handler::{closed_tab, handle_method, state_json};
use crate::services::command_dispatcher::{deliver, PageSink};
use crate::types::channel::TabId;
use crate::types::command::PageCommand;
use crate::types::errors::MixerError;
use crate::types::event::MixerEvent;
use crate::types::settings::MixerSettings;

#[derive(Debug)]
enum UserEvent {
    CreateTabView { tab: TabId, url: String },
    DestroyTabView(TabId),
    ShowActiveTab,
    RunCommands(Vec<PageCommand>),
    PageLoaded(TabId),
    TitleChanged { tab: TabId, title: String },
    RenderMixer,
    Toast(String),
}

const MIXER_JS: &str = include_str!("../../resources/ui/mixer.js");
const MIXER_CSS: &str = include_str!("../../resources/ui/mixer.css");
const MIXER_BODY: &str = include_str!("../../resources/ui/mixer.html");

fn mixer_html() -> String {
    let mut html = String::with_capacity(MIXER_BODY.len() + MIXER_CSS.len() + MIXER_JS.len() + 256);
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><style>");
    html.push_str(MIXER_CSS);
    html.push_str("</style></head><body>");
    html.push_str(MIXER_BODY);
    html.push_str("<script>");
    html.push_str(MIXER_JS);
    html.push_str("</script></body></html>");
    html
}

// ─── Page sinks ───

/// Collects commands planned inside the IPC handler; the event loop runs them.
#[derive(Default)]
struct QueueSink {
    pending: Vec<PageCommand>,
}

impl PageSink for QueueSink {
    fn send(&mut self, command: &PageCommand) -> Result<(), MixerError> {
        self.pending.push(*command);
        Ok(())
    }
}

/// Evaluates commands in the tab WebViews. Fire-and-forget: the script
/// result is never awaited.
struct WebViewSink<'a> {
    views: &'a HashMap<TabId, WebView>,
    media_selector: String,
}

impl PageSink for WebViewSink<'_> {
    fn use_settings(&mut self, mixer: &MixerSettings) {
        self.media_selector.clone_from(&mixer.media_selector);
    }

    fn send(&mut self, command: &PageCommand) -> Result<(), MixerError> {
        let view = self
            .views
            .get(&command.tab)
            .ok_or_else(|| MixerError::PageCommandFailure {
                tab: command.tab,
                reason: "no page view".to_string(),
            })?;
        view.evaluate_script(&command.command.to_script(&self.media_selector))
            .map_err(|e| MixerError::PageCommandFailure {
                tab: command.tab,
                reason: e.to_string(),
            })
    }
}

// ─── IPC handler ───

fn handle_ipc(state: &Mutex<App>, proxy: &EventLoopProxy<UserEvent>, body: &str) {
    let msg: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "malformed IPC message");
            return;
        }
    };
    let method = msg.get("method").and_then(|v| v.as_str()).unwrap_or("");
    let params = msg.get("params").cloned().unwrap_or(Value::Null);

    let mut sink = QueueSink::default();
    match handle_method(state, &mut sink, method, &params) {
        Ok(result) => {
            if let Some(tab) = closed_tab(method, &params) {
                let _ = proxy.send_event(UserEvent::DestroyTabView(tab));
            }
            match method {
                "tab.open" => {
                    if let (Some(tab), Some(url)) = (
                        result.get("id").and_then(|v| v.as_u64()).and_then(|v| TabId::try_from(v).ok()),
                        result.get("url").and_then(|v| v.as_str()),
                    ) {
                        let _ = proxy.send_event(UserEvent::CreateTabView {
                            tab,
                            url: url.to_string(),
                        });
                    }
                    let _ = proxy.send_event(UserEvent::ShowActiveTab);
                }
                "tab.close" | "tab.switch" | "mixer.event" => {
                    let _ = proxy.send_event(UserEvent::ShowActiveTab);
                }
                _ => {}
            }
        }
        Err(e) => {
            warn!(method, error = %e, "IPC call failed");
            let _ = proxy.send_event(UserEvent::Toast(e));
        }
    }

    if !sink.pending.is_empty() {
        let _ = proxy.send_event(UserEvent::RunCommands(sink.pending));
    }
    let _ = proxy.send_event(UserEvent::RenderMixer);
}

// ─── Layout ───

/// Bounds of the page area and of the mixer strip for the current window size.
fn layout(window: &Window, mixer_height: u32) -> (Rect, Rect) {
    let size = window.inner_size().to_logical::<f64>(window.scale_factor());
    let mixer_h = f64::from(mixer_height).min(size.height);
    let page_h = (size.height - mixer_h).max(0.0);
    let page = Rect {
        position: LogicalPosition::new(0.0, 0.0).into(),
        size: LogicalSize::new(size.width, page_h).into(),
    };
    let mixer = Rect {
        position: LogicalPosition::new(0.0, page_h).into(),
        size: LogicalSize::new(size.width, mixer_h).into(),
    };
    (page, mixer)
}

fn attach<'a>(builder: WebViewBuilder<'a>, window: &'a Window) -> wry::Result<WebView> {
    #[cfg(target_os = "linux")]
    {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window.default_vbox().ok_or_else(|| {
            wry::Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "window has no GTK vbox",
            ))
        })?;
        builder.build_gtk(vbox)
    }

    #[cfg(not(target_os = "linux"))]
    {
        builder.build_as_child(window)
    }
}

fn build_tab_view(
    window: &Window,
    proxy: &EventLoopProxy<UserEvent>,
    tab: TabId,
    url: &str,
    bounds: Rect,
) -> wry::Result<WebView> {
    let load_proxy = proxy.clone();
    let title_proxy = proxy.clone();
    let builder = WebViewBuilder::new()
        .with_url(url)
        .with_bounds(bounds)
        .with_on_page_load_handler(move |event, _url| {
            if let PageLoadEvent::Finished = event {
                let _ = load_proxy.send_event(UserEvent::PageLoaded(tab));
            }
        })
        .with_document_title_changed_handler(move |title| {
            let _ = title_proxy.send_event(UserEvent::TitleChanged { tab, title });
        })
        .with_devtools(cfg!(debug_assertions));
    attach(builder, window)
}

// ─── Main entry point ───

pub fn run() {
    let app = App::new(None);
    init_tracing(&app.settings().logging.filter);
    app.report_load_error();

    let settings = app.settings().clone();
    let state = Arc::new(Mutex::new(app));

    let event_loop: EventLoop<UserEvent> = EventLoopBuilder::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let window = match WindowBuilder::new()
        .with_title(&settings.window.title)
        .with_inner_size(tao::dpi::LogicalSize::new(
            f64::from(settings.window.width),
            f64::from(settings.window.height),
        ))
        .build(&event_loop)
    {
        Ok(w) => w,
        Err(e) => {
            error!(error = %e, "failed to create window");
            return;
        }
    };

    let ipc_state = state.clone();
    let ipc_proxy = proxy.clone();
    let (_, mixer_bounds) = layout(&window, settings.window.mixer_height);

    let mixer_builder = WebViewBuilder::new()
        .with_custom_protocol("tabmix".into(), move |_wv_id, _request| {
            wry::http::Response::builder()
                .header("Content-Type", "text/html; charset=utf-8")
                .body(mixer_html().into_bytes().into())
                .unwrap_or_default()
        })
        .with_url("tabmix://localhost/mixer")
        .with_bounds(mixer_bounds)
        .with_ipc_handler(move |msg: wry::http::Request<String>| {
            let body = msg.body().as_str();
            debug!(len = body.len(), "ipc message");
            handle_ipc(&ipc_state, &ipc_proxy, body);
        })
        .with_devtools(cfg!(debug_assertions));

    let mixer = match attach(mixer_builder, &window) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "failed to create mixer view");
            return;
        }
    };

    let mut views: HashMap<TabId, WebView> = HashMap::new();
    info!("window ready");

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                if let Ok(mut s) = state.lock() {
                    s.shutdown();
                }
                *control_flow = ControlFlow::Exit;
            }

            Event::WindowEvent {
                event: WindowEvent::Resized(_),
                ..
            } => {
                let (page, strip) = layout(&window, settings.window.mixer_height);
                let _ = mixer.set_bounds(strip);
                for view in views.values() {
                    let _ = view.set_bounds(page);
                }
            }

            Event::UserEvent(user_event) => match user_event {
                UserEvent::CreateTabView { tab, url } => {
                    let (page, _) = layout(&window, settings.window.mixer_height);
                    match build_tab_view(&window, &proxy, tab, &url, page) {
                        Ok(view) => {
                            views.insert(tab, view);
                        }
                        Err(e) => warn!(tab, error = %e, "failed to create tab view"),
                    }
                }
                UserEvent::DestroyTabView(tab) => {
                    views.remove(&tab);
                }
                UserEvent::ShowActiveTab => {
                    let active = state
                        .lock()
                        .ok()
                        .and_then(|s| s.tab_manager.get_active_tab().map(|t| t.id));
                    for (id, view) in &views {
                        let _ = view.set_visible(Some(*id) == active);
                    }
                }
                UserEvent::RunCommands(commands) => {
                    let media_selector = state
                        .lock()
                        .map(|s| s.settings().mixer.media_selector.clone())
                        .unwrap_or_else(|_| MixerSettings::default().media_selector);
                    let mut sink = WebViewSink {
                        views: &views,
                        media_selector,
                    };
                    deliver(&commands, &mut sink);
                }
                UserEvent::PageLoaded(tab) => {
                    let mut sink = WebViewSink {
                        views: &views,
                        media_selector: MixerSettings::default().media_selector,
                    };
                    if let Ok(mut s) = state.lock() {
                        let _ = s.handle_event(MixerEvent::PageLoaded { tab }, &mut sink);
                        let url = views.get(&tab).and_then(|v| v.url().ok());
                        if let Some(url) = url {
                            let _ = s.tab_manager.update_tab_url(tab, &url);
                        }
                    }
                }
                UserEvent::TitleChanged { tab, title } => {
                    let updated = state
                        .lock()
                        .map(|mut s| s.tab_manager.update_tab_title(tab, &title).is_ok())
                        .unwrap_or(false);
                    if updated {
                        let _ = proxy.send_event(UserEvent::RenderMixer);
                    }
                }
                UserEvent::RenderMixer => {
                    let payload = state.lock().ok().map(|s| state_json(&s));
                    if let Some(payload) = payload {
                        let js = format!("if(window.__tm_render)__tm_render({})", payload);
                        let _ = mixer.evaluate_script(&js);
                    }
                }
                UserEvent::Toast(message) => {
                    let js = format!(
                        "if(window.__tm_toast)__tm_toast({})",
                        Value::String(message)
                    );
                    let _ = mixer.evaluate_script(&js);
                }
            },

            _ => {}
        }
    });
}
