use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AwakeError;

const DEFAULT_GATEWAY_URL: &str = "https://syftbox.net";
const DEFAULT_REQUEST_TIMEOUT: u64 = 15; // seconds
const DEFAULT_MAX_CONCURRENT_PINGS: usize = 25;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the SyftBox RPC gateway that relays pings
    pub gateway_url: String,

    /// Identity of the local node, used as the requester on outgoing pings
    pub user_email: Option<String>,

    /// Directory holding local state such as the known-peer list
    pub data_dir: PathBuf,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Upper bound on in-flight pings during a network scan
    pub max_concurrent_pings: usize,

    /// Whether to geolocate the local node when responding
    pub location_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AwakeError> {
        let gateway_url = env::var("SYFT_GATEWAY_URL")
            .unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let user_email = env::var("SYFT_USER_EMAIL").ok().filter(|s| !s.is_empty());

        let data_dir = match env::var("SYFT_DATA_DIR") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .ok_or_else(|| {
                    AwakeError::ConfigError(
                        "Could not determine home directory; set SYFT_DATA_DIR".to_string(),
                    )
                })?
                .join(".syft-awake"),
        };

        let request_timeout = env::var("REQUEST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let max_concurrent_pings = env::var("MAX_CONCURRENT_PINGS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_CONCURRENT_PINGS);

        let location_enabled = env::var("LOCATION_ENABLED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(true);

        Ok(Config {
            gateway_url,
            user_email,
            data_dir,
            request_timeout,
            max_concurrent_pings,
            location_enabled,
        })
    }

    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// The requester identity, or a configuration error naming the fix
    pub fn require_user_email(&self) -> Result<&str, AwakeError> {
        self.user_email.as_deref().ok_or_else(|| {
            AwakeError::ConfigError(
                "No local identity configured; set SYFT_USER_EMAIL".to_string(),
            )
        })
    }

    /// Path of the known-peer list file
    pub fn known_peers_path(&self) -> PathBuf {
        self.data_dir.join("known_peers.json")
    }
}
