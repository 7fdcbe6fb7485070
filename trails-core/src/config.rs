use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{model::Coordinates, provider::ProviderId};

pub const ENV_BACKEND_URL: &str = "TAIL_TRAILS_BACKEND_URL";
pub const ENV_BACKEND_ANON_KEY: &str = "TAIL_TRAILS_BACKEND_ANON_KEY";
pub const ENV_SITE_URL: &str = "TAIL_TRAILS_SITE_URL";
pub const ENV_HOST: &str = "TAIL_TRAILS_HOST";

/// Host substrings that mark a preview deployment; weather is mocked there.
pub const DEFAULT_PREVIEW_HOSTS: &[&str] = &["vusercontent.net", "v0.dev", "localhost"];

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the hosted auth/database backend.
    pub backend_url: Option<String>,

    /// Public (anon) API key of the backend.
    pub backend_anon_key: Option<String>,

    /// Public URL of the site, used for password reset links.
    pub site_url: Option<String>,

    /// Optional default weather provider id, e.g. "open-meteo" or "mock".
    pub default_provider: Option<String>,

    pub weather_timeout_secs: u64,

    /// Request timeout for the auth/database backend.
    pub backend_timeout_secs: u64,

    /// Hostname this instance is served from; compared against `preview_hosts`.
    pub host: Option<String>,

    /// Example TOML:
    /// preview_hosts = ["localhost", "staging.example"]
    pub preview_hosts: Vec<String>,

    pub default_location: Coordinates,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: None,
            backend_anon_key: None,
            site_url: None,
            default_provider: None,
            weather_timeout_secs: 10,
            backend_timeout_secs: 10,
            host: None,
            preview_hosts: DEFAULT_PREVIEW_HOSTS.iter().map(|s| s.to_string()).collect(),
            default_location: Coordinates::SYDNEY,
        }
    }
}

/// Which of the required public settings are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    pub backend_url: bool,
    pub backend_anon_key: bool,
    pub site_url: bool,
}

impl Diagnostics {
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (self.backend_url, ENV_BACKEND_URL),
            (self.backend_anon_key, ENV_BACKEND_ANON_KEY),
            (self.site_url, ENV_SITE_URL),
        ]
        .into_iter()
        .filter(|(present, _)| !present)
        .map(|(_, name)| name)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

impl Config {
    /// Return the default provider as a strongly-typed ProviderId.
    ///
    /// Unlike credentials, a missing default is not an error: Open-Meteo needs no key.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        match self.default_provider.as_deref() {
            Some(s) => ProviderId::try_from(s),
            None => Ok(ProviderId::OpenMeteo),
        }
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    /// Load config from disk and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env_overrides(|key| env::var(key).ok());
        Ok(cfg)
    }

    /// Load config from `path`, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "tail-trails", "tail-trails")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the local session state file.
    pub fn state_file_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        let dir = dirs.state_dir().unwrap_or_else(|| dirs.data_local_dir());
        Ok(dir.join("session.toml"))
    }

    /// Non-empty environment values win over the file.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_BACKEND_URL) {
            self.backend_url = Some(v);
        }
        if let Some(v) = get(ENV_BACKEND_ANON_KEY) {
            self.backend_anon_key = Some(v);
        }
        if let Some(v) = get(ENV_SITE_URL) {
            self.site_url = Some(v);
        }
        if let Some(v) = get(ENV_HOST) {
            self.host = Some(v);
        }
    }

    pub fn diagnostics(&self) -> Diagnostics {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());

        Diagnostics {
            backend_url: present(&self.backend_url),
            backend_anon_key: present(&self.backend_anon_key),
            site_url: present(&self.site_url),
        }
    }

    /// Backend URL and key, when both are configured.
    pub fn backend_credentials(&self) -> Result<(&str, &str)> {
        let url = self.backend_url.as_deref().filter(|s| !s.is_empty());
        let key = self.backend_anon_key.as_deref().filter(|s| !s.is_empty());

        match (url, key) {
            (Some(url), Some(key)) => Ok((url, key)),
            _ => Err(anyhow!(
                "No backend configured.\n\
                 Hint: run `tail-trails configure` \
                 or set {ENV_BACKEND_URL} and {ENV_BACKEND_ANON_KEY}."
            )),
        }
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }

    /// Whether the configured host is a preview deployment.
    pub fn is_preview(&self) -> bool {
        self.host.as_deref().is_some_and(|host| is_preview_host(host, &self.preview_hosts))
    }
}

/// Substring match against `preview_hosts`, plus the literal loopback address.
pub fn is_preview_host(host: &str, preview_hosts: &[String]) -> bool {
    host == "127.0.0.1" || preview_hosts.iter().any(|p| !p.is_empty() && host.contains(p.as_str()))
}
