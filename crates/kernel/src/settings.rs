use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "SHELF_ENV";
const CONFIG_DIR_ENV: &str = "SHELF_CONFIG_DIR";
const ENV_PREFIX: &str = "SHELF";
const PORT_ENV: &str = "PORT";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    /// Parse an environment name. `development` is accepted as an alias for `local`.
    pub fn parse(name: &str) -> anyhow::Result<Self> {
        match name {
            "local" | "development" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay,
    /// `SHELF_*` variables and finally `PORT`.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .map(|cwd| cwd.join("config"))
                .context("unable to resolve current directory")?,
        };

        Self::load_from(&config_dir, &environment)
    }

    /// Load configuration from an explicit config directory and environment name.
    pub fn load_from(config_dir: &Path, environment: &str) -> anyhow::Result<Self> {
        let environment = Environment::parse(environment)?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment.as_str()));

        let cfg = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var(PORT_ENV).ok())
            .with_context(|| "failed to apply PORT override")?
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // The selected environment wins over anything a file may claim.
        settings.environment = environment;

        Ok(settings)
    }

    /// Whether error responses may carry internal failure details.
    pub fn expose_error_details(&self) -> bool {
        self.server
            .expose_error_details
            .unwrap_or(self.environment == Environment::Local)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "ServerSettings::default_body_limit_bytes")]
    pub body_limit_bytes: usize,
    #[serde(default)]
    pub expose_error_details: Option<bool>,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        3000
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }

    fn default_body_limit_bytes() -> usize {
        10 * 1024 * 1024
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
            body_limit_bytes: Self::default_body_limit_bytes(),
            expose_error_details: None,
        }
    }
}

/// Where the per-resource collection files live.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "StorageSettings::default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "StorageSettings::default_books_file")]
    pub books_file: String,
    #[serde(default = "StorageSettings::default_authors_file")]
    pub authors_file: String,
    #[serde(default = "StorageSettings::default_categories_file")]
    pub categories_file: String,
}

impl StorageSettings {
    fn default_data_dir() -> PathBuf {
        PathBuf::from("data")
    }

    fn default_books_file() -> String {
        "books.json".to_string()
    }

    fn default_authors_file() -> String {
        "authors.json".to_string()
    }

    fn default_categories_file() -> String {
        "categories.json".to_string()
    }

    pub fn books_path(&self) -> PathBuf {
        self.data_dir.join(&self.books_file)
    }

    pub fn authors_path(&self) -> PathBuf {
        self.data_dir.join(&self.authors_file)
    }

    pub fn categories_path(&self) -> PathBuf {
        self.data_dir.join(&self.categories_file)
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            books_file: Self::default_books_file(),
            authors_file: Self::default_authors_file(),
            categories_file: Self::default_categories_file(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// Fallback `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
