use std::{env, path::PathBuf};

use super::schema::Settings;

/// `Settings::load` layers environment variables (prefix `NETFLIX_EXPLORER__`)
/// over an optional config file over struct defaults.
impl Settings {
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("NETFLIX_EXPLORER")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Reject combinations the dashboard cannot render.
    pub fn validate(&self) -> Result<(), String> {
        if self.filters.min_year > self.filters.max_year {
            return Err(format!(
                "filters.min_year ({}) must not exceed filters.max_year ({})",
                self.filters.min_year, self.filters.max_year
            ));
        }
        if self.charts.top_countries == 0 {
            return Err("charts.top_countries must be >= 1".to_string());
        }
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            return Err("window.width and window.height must be positive".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `NETFLIX_EXPLORER_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("NETFLIX_EXPLORER_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("netflix-explorer").join("config.toml"))
}
