//! Handles the configuration of the console.
//!
//! this module is responsible for parsing the Distro.toml file, layering environment variables and
//! cli overrides on top of it.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use std::{path::PathBuf, str::FromStr, time::Duration};

use crate::session::AdminContext;

pub static DEFAULT_CONFIG: &str = include_str!("../Distro.toml");

#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    /// How to reach the backend, and who we are to it.
    #[serde(default)]
    pub client: ClientSettings,
    /// Settings for the relation pickers.
    #[serde(default)]
    pub search: SearchSettings,
    /// Settings for the TUI
    #[serde(default)]
    pub tui: TuiSettings,
}

impl Settings {
    /// Load settings from the config file, environment variables, and CLI arguments.
    ///
    /// The config file is located at the path specified by the `--config` flag.
    ///
    /// The environment variables are prefixed with `DISTRO_`, and use `__` to separate sections,
    /// e.g. `DISTRO_CLIENT__TOKEN`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the config file is not found or if the config file is
    /// invalid.
    #[inline]
    pub fn init(
        config: PathBuf,
        base_url: Option<String>,
        log_level: Option<log::LevelFilter>,
    ) -> Result<Self, ConfigError> {
        Self::init_with_env(config, environment(), base_url, log_level)
    }

    fn init_with_env(
        config: PathBuf,
        environment: Environment,
        base_url: Option<String>,
        log_level: Option<log::LevelFilter>,
    ) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from(config))
            .add_source(environment)
            .build()?;

        let mut settings: Self = s.try_deserialize()?;

        if let Some(base_url) = base_url {
            settings.client.base_url = base_url;
        }

        if let Some(log_level) = log_level {
            settings.client.log_level = log_level;
        }

        Ok(settings)
    }

    /// Get the (default) path to the config file.
    /// If the config file does not exist at this path, it will be created with the default config.
    ///
    /// See [`crate::get_config_dir`] for more information about where this default path is located.
    ///
    /// # Errors
    ///
    /// This function will return an error if the system config directory (e.g., `~/.config` on linux) could not be found, or if the config file was missing and could not be created.
    #[inline]
    pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
        match crate::get_config_dir() {
            Ok(config_dir) => {
                if !config_dir.exists() {
                    std::fs::create_dir_all(&config_dir)?;
                }
                let config_file = config_dir.join("Distro.toml");

                if !config_file.exists() {
                    std::fs::write(&config_file, DEFAULT_CONFIG)?;
                }

                Ok(config_file)
            }
            Err(e) => {
                log::error!("{e}");
                Err(std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()))
            }
        }
    }

    /// The context the console will run in.
    #[must_use]
    pub fn context(&self) -> AdminContext {
        AdminContext {
            base_url: self.client.base_url.clone(),
            token: self.client.token.clone().filter(|t| !t.is_empty()),
            user_id: self.client.user_id.clone().filter(|id| !id.is_empty()).map(|id| {
                id.parse::<u64>()
                    .map_or_else(|_| crate::entity::Id::Text(id), crate::entity::Id::Number)
            }),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ClientSettings {
    /// The root every endpoint is resolved against.
    /// Default is "http://localhost:8080".
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token sent with every request, if set.
    ///
    /// May also point at a file holding the token, with `token_file`.
    #[serde(default)]
    pub token: Option<String>,
    /// A file to read the token from, `~` is expanded.
    /// Ignored if `token` is set.
    #[serde(default)]
    pub token_file: Option<PathBuf>,
    /// The id of the signed-in user, needed to change their password.
    #[serde(default)]
    pub user_id: Option<String>,
    /// What level of logging to use.
    /// Default is "info".
    #[serde(default = "default_log_level")]
    #[serde(deserialize_with = "de_log_level")]
    pub log_level: log::LevelFilter,
}

impl ClientSettings {
    /// Fill in the token from `token_file` if it wasn't given directly.
    ///
    /// # Errors
    ///
    /// Fails if the token file is set but can't be read.
    pub fn resolve_token(&mut self) -> Result<(), std::io::Error> {
        if self.token.as_ref().is_some_and(|t| !t.is_empty()) {
            return Ok(());
        }
        if let Some(path) = &self.token_file {
            let path = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
            let token = std::fs::read_to_string(path)?;
            self.token = Some(token.trim().to_string());
        }
        Ok(())
    }
}

/// `DISTRO_` followed by the key path, with sections separated by `__`.
fn environment() -> Environment {
    Environment::with_prefix("DISTRO")
        .prefix_separator("_")
        .separator("__")
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn de_log_level<'de, D>(deserializer: D) -> Result<log::LevelFilter, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(log::LevelFilter::from_str(&s).unwrap_or_else(|_| default_log_level()))
}

const fn default_log_level() -> log::LevelFilter {
    log::LevelFilter::Info
}

impl Default for ClientSettings {
    #[inline]
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            token_file: None,
            user_id: None,
            log_level: default_log_level(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct SearchSettings {
    /// How long to wait after the last keystroke before querying the backend, in milliseconds.
    /// Default is 300.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Whether free text may be committed as a new entity.
    /// Default is true.
    #[serde(default = "default_allow_create")]
    pub allow_create: bool,
}

impl SearchSettings {
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

const fn default_debounce_ms() -> u64 {
    300
}

const fn default_allow_create() -> bool {
    true
}

impl Default for SearchSettings {
    #[inline]
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            allow_create: default_allow_create(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct TuiSettings {
    /// How many rows a listing shows per page.
    /// Default is 20.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

const fn default_page_size() -> usize {
    20
}

impl Default for TuiSettings {
    #[inline]
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}
