//! Settings of the server process.
//!
//! Sources, lowest priority first: built-in defaults, `settings.toml` (or the
//! file named by `EXPENSE_TRACKER_CONFIG`), `EXPENSE_TRACKER__SECTION__KEY`
//! environment variables, then `PORT` and `DATABASE_URL`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub database: Database,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let file = std::env::var("EXPENSE_TRACKER_CONFIG").unwrap_or_else(|_| "settings".to_string());
        Self::load(
            &file,
            std::env::var("PORT").ok(),
            std::env::var("DATABASE_URL").ok(),
        )
    }

    fn load(
        file: &str,
        port: Option<String>,
        database_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("database.url", "sqlite:./expenses.db?mode=rwc")?
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("EXPENSE_TRACKER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override_option("server.port", port)?
            .set_override_option("database.url", database_url)?
            .build()?;

        settings.try_deserialize()
    }
}
