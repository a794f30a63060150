use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
const SETTINGS_FILE_NAME: &str = "meditate.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
}

/// Defaults, then the first settings file found, then environment overrides.
/// Command-line flags are applied on top by the binaries.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    for path in settings_file_candidates() {
        if apply_settings_file(&mut settings, &path) {
            tracing::debug!(path = %path.display(), "loaded settings file");
            break;
        }
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings
}

fn settings_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(SETTINGS_FILE_NAME)];
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("meditate").join(SETTINGS_FILE_NAME));
    }
    candidates
}

fn apply_settings_file(settings: &mut Settings, path: &Path) -> bool {
    let Ok(raw) = fs::read_to_string(path) else {
        return false;
    };
    match toml::from_str::<FileSettings>(&raw) {
        Ok(file_cfg) => {
            if let Some(v) = file_cfg.server_url {
                settings.server_url = normalize_server_url(&v);
            }
            true
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), "ignoring malformed settings file: {err}");
            false
        }
    }
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("MEDITATE_SERVER_URL") {
        settings.server_url = normalize_server_url(&v);
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = normalize_server_url(&v);
    }
}

pub fn normalize_server_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_SERVER_URL.to_string();
    }
    trimmed.to_string()
}
