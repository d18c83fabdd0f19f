//! TabMix — a tabbed web browser with a per-tab audio mixer strip.
//!
//! Entry point: opens the browser window with its mixer strip.
//! When built without the `gui` feature, runs a console demo of the mixer core.

#[cfg(feature = "gui")]
fn main() {
    tabmix::ui::webview_app::run();
}

#[cfg(not(feature = "gui"))]
use tabmix::{
    services::command_dispatcher::PageSink,
    types::{command::PageCommand, errors::MixerError},
};

/// Prints every page command instead of running it.
#[cfg(not(feature = "gui"))]
struct PrintSink;

#[cfg(not(feature = "gui"))]
impl PageSink for PrintSink {
    fn send(&mut self, command: &PageCommand) -> Result<(), MixerError> {
        println!("    -> tab {}: {:?}", command.tab, command.command);
        Ok(())
    }
}

#[cfg(not(feature = "gui"))]
fn main() {
    tabmix::logging::init_tracing("warn");

    println!();
    println!("TabMix v{} — Demo Mode", env!("CARGO_PKG_VERSION"));
    println!();

    demo_tabs();
    demo_mixer();
    demo_master();
    demo_failures();

    println!();
    println!("  All mixer components demonstrated.");
}

#[cfg(not(feature = "gui"))]
fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

#[cfg(not(feature = "gui"))]
fn demo_app() -> tabmix::app::App {
    let dir = std::env::temp_dir().join("tabmix-demo");
    let path = dir.join("settings.json").to_string_lossy().to_string();
    tabmix::app::App::new(Some(path))
}

#[cfg(not(feature = "gui"))]
fn demo_tabs() {
    use tabmix::managers::tab_manager::TabManagerTrait;
    section("Tabs");

    let mut app = demo_app();
    let (t0, _) = app.open_tab(None, None, &mut PrintSink).expect("open tab");
    let (t1, _) = app.open_tab(Some("https://vimeo.com"), Some("Vimeo"), &mut PrintSink).expect("open tab");
    println!("  Opened tabs {} and {}, count = {}", t0, t1, app.tab_manager.tab_count());

    app.close_tab(t0, &mut PrintSink).expect("close tab");
    let (t2, _) = app.open_tab(None, None, &mut PrintSink).expect("open tab");
    println!("  Closed {}, reopened as {} (ids are never reused)", t0, t2);
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_mixer() {
    use tabmix::types::channel::ChannelId;
    use tabmix::types::event::MixerEvent;
    section("Per-tab channel");

    let mut app = demo_app();
    let (tab, _) = app.open_tab(None, None, &mut PrintSink).expect("open tab");
    let channel = ChannelId::Tab(tab);

    println!("  Mute:");
    app.handle_event(MixerEvent::MuteToggled { channel, muted: true }, &mut PrintSink).expect("mute");
    println!("  Volume 30 while muted:");
    app.handle_event(MixerEvent::VolumeChanged { channel, percent: 30 }, &mut PrintSink).expect("volume");
    println!("  Unmute:");
    app.handle_event(MixerEvent::MuteToggled { channel, muted: false }, &mut PrintSink).expect("unmute");
    println!("  Play:");
    app.handle_event(MixerEvent::PlayRequested { channel }, &mut PrintSink).expect("play");
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_master() {
    use tabmix::types::channel::ChannelId;
    use tabmix::types::event::MixerEvent;
    section("Master fan-out");

    let mut app = demo_app();
    for percent in [20, 80, 50] {
        let (tab, _) = app.open_tab(None, None, &mut PrintSink).expect("open tab");
        app.handle_event(
            MixerEvent::VolumeChanged { channel: ChannelId::Tab(tab), percent },
            &mut PrintSink,
        )
        .expect("volume");
    }

    println!("  Master volume 70:");
    app.handle_event(
        MixerEvent::VolumeChanged { channel: ChannelId::Master, percent: 70 },
        &mut PrintSink,
    )
    .expect("master volume");
    for view in app.channel_views() {
        println!("    {:<10} volume={:>3} muted={}", view.label, view.volume, view.muted);
    }
    println!("  Master pause:");
    app.handle_event(MixerEvent::PauseRequested { channel: ChannelId::Master }, &mut PrintSink)
        .expect("master pause");
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_failures() {
    use tabmix::types::channel::ChannelId;
    use tabmix::types::event::MixerEvent;
    section("Rejected events");

    let mut app = demo_app();
    let unknown = app.handle_event(MixerEvent::PlayRequested { channel: ChannelId::Tab(42) }, &mut PrintSink);
    println!("  Play on tab 42: {}", unknown.map(|_| "ok".to_string()).unwrap_or_else(|e| e.to_string()));
    let invalid = app.handle_event(
        MixerEvent::VolumeChanged { channel: ChannelId::Master, percent: 140 },
        &mut PrintSink,
    );
    println!("  Master volume 140: {}", invalid.map(|_| "ok".to_string()).unwrap_or_else(|e| e.to_string()));
}
