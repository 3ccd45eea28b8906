use clap::{Parser, Subcommand};
use std::time::Duration;

use crate::config::Config;
use crate::models::Priority;

/// Command-line interface for the syft-awake probe utility
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "syft-awake",
    about = "Ping SyftBox network members to check who is awake",
    version
)]
pub struct Cli {
    /// Output results in JSON format
    #[clap(long, global = true)]
    pub json: bool,

    /// Timeout per peer in seconds (defaults to the configured REQUEST_TIMEOUT)
    #[clap(long, global = true)]
    pub timeout: Option<u64>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Ping a specific peer
    Ping {
        /// Peer email to ping
        peer: String,

        /// Message to send with the ping
        #[clap(short, long)]
        message: Option<String>,

        /// Priority level
        #[clap(long, value_enum, default_value_t = Priority::Normal)]
        priority: Priority,
    },

    /// Scan the network for awake peers
    Scan {
        /// Comma-separated list of peers to scan (defaults to known peers)
        #[clap(long)]
        peers: Option<String>,

        /// Message to send with the pings
        #[clap(short, long)]
        message: Option<String>,
    },

    /// Quick check whether peers are responding
    Check {
        /// Comma-separated list of peers to check
        peers: String,
    },

    /// Add a peer to the known-peer list
    AddPeer {
        /// Peer email to add
        peer: String,
    },

    /// Remove a peer from the known-peer list
    RemovePeer {
        /// Peer email to remove
        peer: String,
    },

    /// List all known peers
    ListPeers,

    /// Show which known peers are currently awake
    WhoAwake,
}

impl Cli {
    /// Per-peer timeout: the --timeout flag when given, the configured
    /// request timeout otherwise
    pub fn timeout(&self, config: &Config) -> Duration {
        self.timeout
            .map(Duration::from_secs)
            .unwrap_or_else(|| config.request_timeout())
    }
}

/// Split a comma-separated peer list into trimmed, non-empty entries
pub fn split_peer_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_with_timeout(secs: u64) -> Config {
        Config {
            gateway_url: "https://syftbox.net".to_string(),
            user_email: None,
            data_dir: PathBuf::from("/tmp"),
            request_timeout: secs,
            max_concurrent_pings: 25,
            location_enabled: true,
        }
    }

    #[test]
    fn timeout_flag_overrides_config() {
        let cli = Cli::try_parse_from(["syft-awake", "--timeout", "60", "list-peers"]).unwrap();
        assert_eq!(cli.timeout(&config_with_timeout(15)), Duration::from_secs(60));
    }

    #[test]
    fn timeout_defaults_to_configured_request_timeout() {
        let cli = Cli::try_parse_from(["syft-awake", "list-peers"]).unwrap();
        assert_eq!(cli.timeout, None);
        assert_eq!(cli.timeout(&config_with_timeout(45)), Duration::from_secs(45));
    }

    #[test]
    fn peer_list_splits_and_trims() {
        let peers = split_peer_list(" a@example.com, b@example.com ,,c@example.com");
        assert_eq!(
            peers,
            vec!["a@example.com", "b@example.com", "c@example.com"]
        );
    }

    #[test]
    fn empty_peer_list_yields_nothing() {
        assert!(split_peer_list("").is_empty());
        assert!(split_peer_list(" , ,").is_empty());
    }
}
