// Settings for the binary, read from the environment (and a `.env` file when present)
use std::path::PathBuf;
use std::time::Duration;

use derivative::Derivative;
use tracing::Level;

#[derive(Derivative, Debug, Clone, PartialEq)]
#[derivative(Default)]
pub struct Config {
    #[derivative(Default(value = "PathBuf::from(\"database.db\")"))]
    pub db_path: PathBuf,
    #[derivative(Default(value = "PathBuf::from(\"todo.log\")"))]
    pub log_file: PathBuf,
    #[derivative(Default(value = "Level::INFO"))]
    pub log_level: Level,
    // How long a toast stays on screen
    #[derivative(Default(value = "Duration::from_millis(3000)"))]
    pub toast_duration: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    // Unset or unparseable values fall back to the defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(path) = lookup("TODO_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("TODO_LOG_FILE") {
            config.log_file = PathBuf::from(path);
        }
        if let Some(level) = lookup("TODO_LOG_LEVEL").and_then(|raw| raw.parse().ok()) {
            config.log_level = level;
        }
        if let Some(millis) = lookup("TODO_TOAST_MS").and_then(|raw| raw.parse().ok()) {
            config.toast_duration = Duration::from_millis(millis);
        }

        config
    }
}
