use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::sample_data::SAMPLE_TEAM_NAME;
use crate::state::ViewMode;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// JSON roster fixture; the built-in sample roster is used when unset.
    pub roster_path: Option<PathBuf>,
    pub view_mode: ViewMode,
    pub tick: Duration,
    pub team_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            roster_path: None,
            view_mode: ViewMode::Manager,
            tick: Duration::from_millis(250),
            team_name: SAMPLE_TEAM_NAME.to_string(),
        }
    }
}

impl AppConfig {
    /// Reads the process environment. Call after `.env` files are loaded.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let roster_path = lookup("ROSTER_PATH")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);
        let view_mode = match lookup("SQUAD_VIEW_MODE")
            .map(|raw| raw.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("player") => ViewMode::Player,
            _ => defaults.view_mode,
        };
        let tick = lookup("SQUAD_TICK_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .map(|ms| Duration::from_millis(ms.max(50)))
            .unwrap_or(defaults.tick);
        let team_name = lookup("SQUAD_TEAM_NAME")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or(defaults.team_name);

        Self {
            roster_path,
            view_mode,
            tick,
            team_name,
        }
    }
}
