//! TabMix UI layer.
//!
//! Uses `wry` for cross-platform WebView rendering:
//! - Windows: WebView2
//! - Linux: WebKitGTK
//! - macOS: WKWebView
//!
//! Pages run in one WebView per tab; the mixer strip is an HTML/CSS/JS page
//! in its own WebView that talks to the Rust side over wry IPC.

pub mod webview_app;
