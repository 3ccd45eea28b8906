use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AwakeError;
use crate::models::validate_identity;

/// Local list of known network members.
///
/// This is a plain JSON file of peer identities, not a discovery service:
/// peers get on the list because the user put them there.
#[derive(Debug, Clone)]
pub struct PeerDirectory {
    path: PathBuf,
}

impl PeerDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PeerDirectory { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All known peers, sorted and deduplicated. A missing file reads as empty.
    pub fn known_peers(&self) -> Result<Vec<String>, AwakeError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.path)?;
        let peers: Vec<String> = serde_json::from_str(&raw)
            .map_err(|e| AwakeError::JsonError(format!("Corrupt peer list {}: {}", self.path.display(), e)))?;

        let unique: BTreeSet<String> = peers.into_iter().collect();
        Ok(unique.into_iter().collect())
    }

    /// Add a peer to the list. Returns false if it was already present.
    pub fn add_peer(&self, peer: &str) -> Result<bool, AwakeError> {
        validate_identity(peer)?;

        let mut peers = self.known_peers()?;
        if peers.iter().any(|p| p == peer) {
            return Ok(false);
        }
        peers.push(peer.to_string());
        peers.sort();
        self.write(&peers)?;

        tracing::info!("Added {} to known peers", peer);
        Ok(true)
    }

    /// Remove a peer from the list. Returns false if it was not present.
    pub fn remove_peer(&self, peer: &str) -> Result<bool, AwakeError> {
        let mut peers = self.known_peers()?;
        let before = peers.len();
        peers.retain(|p| p != peer);
        if peers.len() == before {
            return Ok(false);
        }
        self.write(&peers)?;

        tracing::info!("Removed {} from known peers", peer);
        Ok(true)
    }

    fn write(&self, peers: &[String]) -> Result<(), AwakeError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(peers)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
