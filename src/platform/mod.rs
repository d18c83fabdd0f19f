// TabMix platform abstraction
// Resolves where the settings file lives on Windows, macOS and Linux,
// selected at compile time with `cfg(target_os)`.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Returns the platform-specific configuration directory for TabMix.
///
/// - **Linux**: `~/.config/tabmix` (or `$XDG_CONFIG_HOME/tabmix`)
/// - **macOS**: `~/Library/Application Support/TabMix`
/// - **Windows**: `%APPDATA%/TabMix`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}
