use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use devteam_core::constants::RECONNECT_DELAY_MS;
use devteam_core::streaming::FeedEndpoint;
use devteam_core::{HistoryScope, SessionConfig};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const BASE_URL_ENV: &str = "DEVTEAM_BASE_URL";
pub const FEED_ENV: &str = "DEVTEAM_FEED";
pub const EVENTS_SOCKET_PATH: &str = "/ws/events";

/// CLI configuration that can be loaded from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    /// Backend HTTP root, e.g. `http://127.0.0.1:8000`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Event feed endpoint (`host:port`, `unix:/path` or `ws://host:port/path`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<String>,

    /// Retained events per session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_role: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconnect_delay_ms: Option<u64>,
}

impl CliConfig {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CliConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub feed: Option<String>,
}

/// Effective settings after layering flag > env > file > default.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub feed: Option<FeedEndpoint>,
    pub capacity: Option<usize>,
    pub human_role: Option<String>,
    pub reconnect_delay: Duration,
}

impl ResolvedConfig {
    pub fn resolve(
        file: CliConfig,
        overrides: ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let base_url = overrides
            .base_url
            .or_else(|| env(BASE_URL_ENV))
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let feed = overrides
            .feed
            .or_else(|| env(FEED_ENV))
            .or(file.feed)
            .map(|raw| {
                raw.parse::<FeedEndpoint>()
                    .map_err(anyhow::Error::msg)
                    .with_context(|| format!("Invalid feed endpoint: {}", raw))
            })
            .transpose()?
            .or_else(|| default_feed(&base_url));

        Ok(Self {
            base_url,
            feed,
            capacity: file.capacity,
            human_role: file.human_role,
            reconnect_delay: Duration::from_millis(
                file.reconnect_delay_ms.unwrap_or(RECONNECT_DELAY_MS),
            ),
        })
    }

    /// Resolve against the process environment.
    pub fn from_env(file: CliConfig, overrides: ConfigOverrides) -> Result<Self> {
        Self::resolve(file, overrides, |key| std::env::var(key).ok())
    }

    pub fn session_config(&self, scope: HistoryScope) -> SessionConfig {
        let mut config = SessionConfig::for_scope(scope);
        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if let Some(role) = &self.human_role {
            config.human_role = role.clone();
        }
        config
    }
}

/// The backend's own event socket, next to its HTTP root.
/// Only plain `http://` roots map onto a feed.
fn default_feed(base_url: &str) -> Option<FeedEndpoint> {
    let authority = base_url.strip_prefix("http://")?.trim_end_matches('/');
    format!("ws://{}{}", authority, EVENTS_SOCKET_PATH).parse().ok()
}
