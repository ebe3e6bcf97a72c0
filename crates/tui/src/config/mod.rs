use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tui.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// API root, ending with `/api/`.
    pub base_url: String,
    /// Where the CSV export is written.
    pub export_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/api/".to_string(),
            export_path: "expenses.csv".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "expense_tracker_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:5000/api/).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the CSV export destination.
    #[arg(long)]
    export_path: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut settings = from_sources(config_path)?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(export_path) = args.export_path {
        settings.export_path = export_path;
    }

    settings.base_url = with_trailing_slash(settings.base_url);
    Ok(settings)
}

fn from_sources(config_path: &str) -> Result<AppConfig> {
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("EXPENSE_TRACKER_TUI"));
    Ok(builder.build()?.try_deserialize()?)
}

/// `Url::join` drops the last segment of a base without a trailing slash.
fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
