//! Handles settings for the application.
//!
//! Values are read, in increasing priority, from built-in defaults, an
//! optional `settings.toml` in the working directory, `FLIPBOOK__*`
//! environment variables (`FLIPBOOK__SERVER__PORT=8080`) and finally the
//! plain `PORT` and `DATABASE_URL` variables set by most hosting platforms.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    /// Path of a SQLite file, created when missing.
    Sqlite(String),
    /// Full connection url.
    Url(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("./flipbook.db".to_string())
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
            Database::Url(url) => url.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub api_prefix: String,
    #[serde(default)]
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.port", 5000)?
            .set_default("server.api_prefix", "/api")?
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("FLIPBOOK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = settings.try_deserialize()?;
        settings.apply_platform_env(
            std::env::var("PORT").ok().as_deref(),
            std::env::var("DATABASE_URL").ok(),
        )?;
        Ok(settings)
    }

    fn apply_platform_env(
        &mut self,
        port: Option<&str>,
        database_url: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(port) = port {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Message(format!("invalid PORT: {port}")))?;
        }
        if let Some(url) = database_url.filter(|url| !url.trim().is_empty()) {
            self.server.database = Database::Url(url);
        }
        Ok(())
    }
}
