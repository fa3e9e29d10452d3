use anyhow::{Context, Result};
use config::{Config, Environment, File, Map};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "n8n-setup.toml";

/// Connection settings for the target n8n instance
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct N8nConfig {
    /// URL scheme, `http` unless the instance sits behind TLS
    pub protocol: String,
    /// Hostname of the n8n instance
    pub host: String,
    /// Port of the n8n instance, kept verbatim so it can be templated into the URL
    pub port: String,
    /// Public API key (takes precedence over basic auth)
    pub api_key: Option<String>,
    /// Basic auth username
    pub basic_auth_user: Option<String>,
    /// Basic auth password
    pub basic_auth_password: Option<String>,
}

impl Default for N8nConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: "5678".to_string(),
            api_key: None,
            basic_auth_user: None,
            basic_auth_password: None,
        }
    }
}

/// How requests to n8n are authenticated. Resolved once at startup.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    ApiKey(String),
    Basic { username: String, password: String },
    Anonymous,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::ApiKey(_) => write!(f, "ApiKey(<redacted>)"),
            Credentials::Basic { username, .. } => {
                write!(f, "Basic {{ username: {username:?}, password: <redacted> }}")
            }
            Credentials::Anonymous => write!(f, "Anonymous"),
        }
    }
}

impl N8nConfig {
    /// Load configuration with precedence:
    /// 1. Default values
    /// 2. `n8n-setup.toml` in the working directory
    /// 3. Environment variables (prefixed with N8N_)
    pub fn load() -> Result<Self> {
        let file = Path::new(CONFIG_FILE);
        let file = file.exists().then_some(file);
        Self::load_from(file, None)
    }

    /// Load configuration from an explicit file and environment snapshot.
    ///
    /// `env` replaces the process environment when given, which keeps tests
    /// from racing on `std::env`.
    pub fn load_from(file: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("protocol", defaults.protocol)?
            .set_default("host", defaults.host)?
            .set_default("port", defaults.port)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        // No key separator: N8N_BASIC_AUTH_USER maps to `basic_auth_user`
        builder = builder.add_source(
            Environment::with_prefix("N8N")
                .ignore_empty(true)
                .source(env),
        );

        let config = builder
            .build()
            .context("Failed to assemble n8n configuration")?;

        let mut n8n_config: N8nConfig = config
            .try_deserialize()
            .context("Invalid n8n configuration")?;

        // A blank value in the config file counts as unset, same as the environment
        for value in [
            &mut n8n_config.api_key,
            &mut n8n_config.basic_auth_user,
            &mut n8n_config.basic_auth_password,
        ] {
            if value.as_deref().is_some_and(str::is_empty) {
                *value = None;
            }
        }

        Ok(n8n_config)
    }

    /// Load a `.env` file into the process environment.
    ///
    /// An explicit path must exist. Without one, `./.env` and then `../.env`
    /// are tried; the first that exists wins. Returns the file that was loaded.
    pub fn load_env_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
            tracing::info!(path = %path.display(), "Loaded environment variables from env file");
            return Ok(Some(path.to_path_buf()));
        }

        for candidate in [Path::new(".env"), Path::new("../.env")] {
            if candidate.exists() {
                dotenvy::from_path(candidate).with_context(|| {
                    format!("Failed to load env file {}", candidate.display())
                })?;
                tracing::info!(path = %candidate.display(), "Loaded environment variables from .env file");
                return Ok(Some(candidate.to_path_buf()));
            }
        }

        Ok(None)
    }

    /// Root URL of the n8n instance, e.g. `http://localhost:5678`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    /// Resolve which authentication scheme requests will use
    pub fn credentials(&self) -> Credentials {
        if let Some(key) = &self.api_key {
            return Credentials::ApiKey(key.clone());
        }

        match (&self.basic_auth_user, &self.basic_auth_password) {
            (Some(username), Some(password)) => Credentials::Basic {
                username: username.clone(),
                password: password.clone(),
            },
            _ => Credentials::Anonymous,
        }
    }
}
