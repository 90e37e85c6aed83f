use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tui.toml";

/// Process-wide presentation settings handed to the shell at startup:
/// theme and hint-bar visibility live here, not in any screen state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote document-store endpoint; `None` runs on the in-memory store.
    pub store_url: Option<String>,
    pub username: String,
    /// "dark" or "light".
    pub theme: String,
    /// Show the shortcut hint bar.
    pub sidebar: bool,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_url: None,
            username: "testuser".to_string(),
            theme: "dark".to_string(),
            sidebar: true,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "bilancio_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override store endpoint (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    store_url: Option<String>,
    /// Override username.
    #[arg(long)]
    username: Option<String>,
    /// Override theme ("dark" or "light").
    #[arg(long)]
    theme: Option<String>,
    /// Override log level.
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("BILANCIO_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(store_url) = args.store_url {
        settings.store_url = Some(store_url);
    }
    if let Some(username) = args.username {
        settings.username = username;
    }
    if let Some(theme) = args.theme {
        settings.theme = theme;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    Ok(settings)
}
