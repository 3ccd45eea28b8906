//! Network awakeness monitoring for SyftBox.
//!
//! Members of a SyftBox network ping each other to check who is online and
//! ready for interactive queries. The client side fans out pings with
//! per-peer timeouts and folds the outcomes into a
//! [`NetworkAwakenessSummary`]; delivery itself belongs to the external RPC
//! substrate behind the [`AwakeTransport`] trait. [`detect_country`] is the
//! best-effort geolocation hook a responder can use to tag its replies.

pub mod cli;
pub mod client;
pub mod config;
pub mod directory;
pub mod error;
pub mod location;
pub mod models;
pub mod transport;

pub use client::{get_awake_users, is_awake, ping_network, ping_peer};
pub use config::Config;
pub use directory::PeerDirectory;
pub use error::AwakeError;
pub use location::{detect_country, detect_local_country};
pub use models::{
    AwakeRequest, AwakeResponse, AwakeStatus, NetworkAwakenessSummary, Priority,
};
pub use transport::{AwakeTransport, HttpTransport};
