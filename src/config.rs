//! Server configuration
//!
//! Configuration is read from an optional YAML file named by `WEBHOST_CONFIG`.
//! Any section left out of the file falls back to its defaults, and a couple of
//! environment variables override the most commonly changed values.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable naming the YAML configuration file.
pub const CONFIG_ENV: &str = "WEBHOST_CONFIG";
/// Environment variable overriding `server.port`.
pub const PORT_ENV: &str = "WEBHOST_PORT";
/// Environment variable overriding `website.root`.
pub const ROOT_ENV: &str = "WEBHOST_ROOT";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub website: WebsiteConfig,
    pub session: SessionConfig,
}

/// When an acceptor permit goes back to the pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermitRelease {
    /// Released as soon as a connection is accepted. Bounds outstanding accepts only.
    #[default]
    OnAccept,
    /// Held until the connection handler finishes. Bounds in-flight requests.
    OnCompletion,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub max_simultaneous_connections: usize,
    /// Also listen on every discovered local IPv4 address, not just loopback.
    pub bind_local_addresses: bool,
    pub permit_release: PermitRelease,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 80,
            max_simultaneous_connections: 20,
            bind_local_addresses: true,
            permit_release: PermitRelease::OnAccept,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebsiteConfig {
    pub root: PathBuf,
}

impl Default for WebsiteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./Website"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub expiration_secs: u64,
    /// Key under which each session stores its anti-forgery token.
    pub validation_token_name: String,
    /// Evict expired sessions every this many seconds. Disabled when absent.
    pub sweep_interval_secs: Option<u64>,
    /// Reject non-GET requests whose token parameter does not match the session.
    pub validate_tokens: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expiration_secs: 60,
            validation_token_name: "__CSRFToken__".to_string(),
            sweep_interval_secs: None,
            validate_tokens: false,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the process environment.
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match lookup(CONFIG_ENV) {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {}", path))?;
                Self::from_yaml_str(&text)?
            }
            None => Self::default(),
        };

        if let Some(port) = lookup(PORT_ENV) {
            cfg.server.port = port
                .parse()
                .with_context(|| format!("invalid {} value {:?}", PORT_ENV, port))?;
        }
        if let Some(root) = lookup(ROOT_ENV) {
            cfg.website.root = PathBuf::from(root);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("parsing YAML configuration")
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.max_simultaneous_connections == 0 {
            anyhow::bail!("server.max_simultaneous_connections must be at least 1");
        }
        if self.session.expiration_secs == 0 {
            anyhow::bail!("session.expiration_secs must be greater than 0");
        }
        if self.session.sweep_interval_secs == Some(0) {
            anyhow::bail!("session.sweep_interval_secs must be greater than 0");
        }
        Ok(())
    }
}
