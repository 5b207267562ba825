use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `OVERTURE__`), and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("OVERTURE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.marquee.rate_per_second.is_finite() && self.marquee.rate_per_second > 0.0) {
            return Err("marquee.rate_per_second must be > 0".to_string());
        }
        if !(self.marquee.min_duration_secs.is_finite() && self.marquee.min_duration_secs >= 0.0) {
            return Err("marquee.min_duration_secs must be >= 0".to_string());
        }
        let share = self.marquee.title_share_with_album;
        if !(share > 0.0 && share <= 1.0) {
            return Err("marquee.title_share_with_album must be in (0, 1]".to_string());
        }
        if self.ui.tick_ms == 0 {
            return Err("ui.tick_ms must be >= 1".to_string());
        }
        if self.library.manifest_name.trim().is_empty() {
            return Err("library.manifest_name must not be empty".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `OVERTURE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("OVERTURE_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/overture/config.toml`
/// or `~/.config/overture/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("overture").join("config.toml"))
}

/// Default log file under `$XDG_STATE_HOME/overture/overture.log` or
/// `~/.local/state/overture/overture.log`.
pub fn default_log_path() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("overture").join("overture.log"))
}
