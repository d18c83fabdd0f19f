// TabMix platform paths for Linux
// Config: $XDG_CONFIG_HOME/tabmix, falling back to ~/.config/tabmix

use std::env;
use std::path::PathBuf;

pub fn get_config_dir() -> PathBuf {
    config_dir_from(env::var("XDG_CONFIG_HOME").ok(), env::var("HOME").ok())
}

fn config_dir_from(xdg: Option<String>, home: Option<String>) -> PathBuf {
    match xdg.filter(|v| !v.is_empty()) {
        Some(xdg) => PathBuf::from(xdg).join("tabmix"),
        None => PathBuf::from(home.unwrap_or_else(|| String::from("/tmp")))
            .join(".config")
            .join("tabmix"),
    }
}
