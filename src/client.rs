use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::time;

use crate::directory::PeerDirectory;
use crate::error::AwakeError;
use crate::models::{
    AwakeRequest, AwakeResponse, AwakeStatus, NetworkAwakenessSummary, Priority,
};
use crate::transport::AwakeTransport;

/// Ping a single peer and wait up to `timeout` for its reply.
///
/// The measured round trip is stamped onto the reply as `response_time_ms`.
pub async fn ping_peer<T: AwakeTransport + ?Sized>(
    transport: &T,
    requester: &str,
    recipient: &str,
    message: &str,
    priority: Priority,
    timeout: Duration,
) -> Result<AwakeResponse, AwakeError> {
    crate::models::validate_identity(recipient)?;
    let request = AwakeRequest::new(requester, message, priority)?;

    let started = Instant::now();
    let result = time::timeout(timeout, transport.send_ping(recipient, &request)).await;

    match result {
        Ok(Ok(mut response)) => {
            response.response_time_ms = Some(started.elapsed().as_secs_f64() * 1000.0);
            tracing::debug!(
                "{} answered {} in {:.1}ms",
                recipient,
                response.status,
                response.response_time_ms.unwrap_or(0.0)
            );
            Ok(response)
        }
        Ok(Err(e)) => {
            tracing::debug!("Ping to {} failed: {}", recipient, e);
            Err(e)
        }
        Err(_) => {
            tracing::debug!("Ping to {} timed out after {:?}", recipient, timeout);
            Err(AwakeError::Timeout(recipient.to_string()))
        }
    }
}

/// Ping every recipient in parallel and fold the outcomes into a summary.
///
/// Each peer lands in exactly one bucket: a reply with status awake or busy
/// counts as awake (busy peers are online and responsive), any other reply
/// counts as sleeping, and an error or timeout counts as non-responsive.
/// Replies that carry a country code feed the per-country distribution.
pub async fn ping_network<T: AwakeTransport + ?Sized>(
    transport: &T,
    requester: &str,
    recipients: &[String],
    message: &str,
    timeout: Duration,
    max_concurrent: usize,
) -> Result<NetworkAwakenessSummary, AwakeError> {
    // Deduplicate up front so every peer can land in exactly one bucket
    let mut seen = HashSet::new();
    let peers: Vec<String> = recipients
        .iter()
        .filter(|p| seen.insert(p.as_str()))
        .cloned()
        .collect();

    if peers.is_empty() {
        return Err(AwakeError::ValidationError(
            "At least one peer is required for a network scan".to_string(),
        ));
    }

    tracing::info!(
        "Scanning {} peers with timeout {:?} and concurrency {}",
        peers.len(),
        timeout,
        max_concurrent
    );

    let started = Instant::now();
    let total_pinged = peers.len();

    let outcomes: Vec<(String, Result<AwakeResponse, AwakeError>)> = stream::iter(peers)
        .map(|peer| async move {
            let outcome =
                ping_peer(transport, requester, &peer, message, Priority::Normal, timeout).await;
            (peer, outcome)
        })
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    let mut awake_users = Vec::new();
    let mut sleeping_users = Vec::new();
    let mut non_responsive = Vec::new();
    let mut countries: HashMap<String, u32> = HashMap::new();

    for (peer, outcome) in outcomes {
        match outcome {
            Ok(response) => {
                if let Some(country) = response.country.as_deref() {
                    *countries.entry(country.to_string()).or_insert(0) += 1;
                }
                match response.status {
                    AwakeStatus::Awake | AwakeStatus::Busy => awake_users.push(peer),
                    _ => sleeping_users.push(peer),
                }
            }
            Err(_) => non_responsive.push(peer),
        }
    }

    // Deterministic listing order regardless of reply arrival
    awake_users.sort();
    sleeping_users.sort();
    non_responsive.sort();

    let summary = NetworkAwakenessSummary {
        total_pinged,
        awake_count: awake_users.len(),
        response_count: awake_users.len() + sleeping_users.len(),
        awake_users,
        sleeping_users,
        non_responsive,
        countries,
        scan_duration_ms: started.elapsed().as_secs_f64() * 1000.0,
        timestamp: Utc::now(),
    };

    tracing::info!(
        "Scan complete: {}/{} awake, {}/{} responsive in {:.1}ms",
        summary.awake_count,
        summary.total_pinged,
        summary.response_count,
        summary.total_pinged,
        summary.scan_duration_ms
    );

    Ok(summary)
}

/// Quick check: did the peer answer with an online status?
pub async fn is_awake<T: AwakeTransport + ?Sized>(
    transport: &T,
    requester: &str,
    recipient: &str,
    timeout: Duration,
) -> bool {
    match ping_peer(transport, requester, recipient, "ping", Priority::Normal, timeout).await {
        Ok(response) => matches!(response.status, AwakeStatus::Awake | AwakeStatus::Busy),
        Err(_) => false,
    }
}

/// Scan all known peers and return the ones that are awake, sorted
pub async fn get_awake_users<T: AwakeTransport + ?Sized>(
    transport: &T,
    requester: &str,
    directory: &PeerDirectory,
    timeout: Duration,
    max_concurrent: usize,
) -> Result<Vec<String>, AwakeError> {
    let peers = directory.known_peers()?;
    if peers.is_empty() {
        return Ok(Vec::new());
    }

    let summary = ping_network(
        transport,
        requester,
        &peers,
        "network scan",
        timeout,
        max_concurrent,
    )
    .await?;

    Ok(summary.awake_users)
}
