use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7490;

/// Full gateway configuration: the Spacelift credentials plus the local
/// server binding. Loaded from a TOML file, then overridden from the
/// environment so secrets can stay out of the file entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub spacelift: SpaceliftConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpaceliftConfig {
    #[serde(default)]
    pub host_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

fn default_server_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_server_port() -> u16 {
    DEFAULT_PORT
}

impl SpaceliftConfig {
    /// GraphQL endpoint for the configured host. Hosts are normally bare
    /// (`mycorp.app.spacelift.io`); an explicit scheme is honored so local
    /// stand-ins are reachable over plain HTTP.
    pub fn api_url(&self) -> String {
        let base = self.host_url.trim_end_matches('/');
        if base.starts_with("http://") || base.starts_with("https://") {
            format!("{}/graphql", base)
        } else {
            format!("https://{}/graphql", base)
        }
    }
}

pub fn load(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match resolve_path(explicit) {
        Some(path) if path.exists() => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str::<Config>(&raw)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        Some(path) if explicit.is_some() => {
            bail!("config file {} does not exist", path.display());
        }
        _ => Config {
            spacelift: SpaceliftConfig::default(),
            server: ServerConfig::default(),
        },
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());
    validate(&config)?;
    Ok(config)
}

/// `--config` wins, then `$SPACEDOCK_CONFIG`, then the platform config dir.
fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var("SPACEDOCK_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("spacedock").join("spacedock.toml"))
}

fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(host_url) = lookup("SPACELIFT_HOST_URL") {
        config.spacelift.host_url = host_url;
    }
    if let Some(api_key) = lookup("SPACELIFT_API_KEY") {
        config.spacelift.api_key = api_key;
    }
    if let Some(api_secret) = lookup("SPACELIFT_API_SECRET") {
        config.spacelift.api_secret = api_secret;
    }
    if let Some(host) = lookup("SPACEDOCK_HOST") {
        config.server.host = host;
    }
    if let Some(port) = lookup("SPACEDOCK_PORT") {
        if let Ok(port) = port.parse() {
            config.server.port = port;
        }
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.spacelift.host_url.trim().is_empty() {
        bail!("spacelift.host_url is not configured (set it in spacedock.toml or SPACELIFT_HOST_URL)");
    }
    if config.spacelift.api_key.trim().is_empty() || config.spacelift.api_secret.trim().is_empty() {
        bail!("spacelift.api_key / spacelift.api_secret are not configured");
    }
    Url::parse(&config.spacelift.api_url())
        .with_context(|| format!("spacelift.host_url {:?} is not a valid host", config.spacelift.host_url))?;
    Ok(())
}
