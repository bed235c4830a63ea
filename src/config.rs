use std::time::Duration;

use tracing::debug;

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000/exec";
const DEFAULT_SHARE_URL: &str = "http://127.0.0.1:3000/play";
const DEFAULT_PLAYER_NAME: &str = "Guest";

/// Client configuration, passed explicitly to everything that talks to the backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full URL of the backend endpoint (the deployed script URL)
    pub endpoint: String,
    /// Display name used when creating or claiming a room
    pub player_name: String,
    /// Timeout for room listing and single-room reads
    pub list_timeout: Duration,
    /// Timeout for the topics request
    pub topics_timeout: Duration,
    /// Timeout for room updates and history writes
    pub write_timeout: Duration,
    /// How long a notice stays visible
    pub toast_ttl: Duration,
    /// Base URL used to build shareable room links
    pub share_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            list_timeout: Duration::from_secs(10),
            topics_timeout: Duration::from_secs(15),
            write_timeout: Duration::from_secs(15),
            toast_ttl: Duration::from_secs(5),
            share_base_url: DEFAULT_SHARE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Default configuration pointed at the given endpoint
    pub fn for_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Reads overrides from `ROOMLINK_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            endpoint: std::env::var("ROOMLINK_ENDPOINT").unwrap_or(defaults.endpoint),
            player_name: std::env::var("ROOMLINK_PLAYER").unwrap_or(defaults.player_name),
            list_timeout: secs_from_env("ROOMLINK_LIST_TIMEOUT_SECS").unwrap_or(defaults.list_timeout),
            topics_timeout: secs_from_env("ROOMLINK_TOPICS_TIMEOUT_SECS")
                .unwrap_or(defaults.topics_timeout),
            write_timeout: secs_from_env("ROOMLINK_WRITE_TIMEOUT_SECS")
                .unwrap_or(defaults.write_timeout),
            toast_ttl: secs_from_env("ROOMLINK_TOAST_TTL_SECS").unwrap_or(defaults.toast_ttl),
            share_base_url: std::env::var("ROOMLINK_SHARE_URL").unwrap_or(defaults.share_base_url),
        };

        debug!(
            endpoint = %config.endpoint,
            player_name = %config.player_name,
            list_timeout_secs = config.list_timeout.as_secs(),
            topics_timeout_secs = config.topics_timeout.as_secs(),
            "Loaded client configuration"
        );

        config
    }

    pub fn with_player_name(mut self, player_name: impl Into<String>) -> Self {
        self.player_name = player_name.into();
        self
    }

    /// Uses one timeout for every request kind
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.list_timeout = timeout;
        self.topics_timeout = timeout;
        self.write_timeout = timeout;
        self
    }
}

fn secs_from_env(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}
