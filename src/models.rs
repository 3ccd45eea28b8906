use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::error::AwakeError;

/// Awakeness status reported by a responding peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwakeStatus {
    Awake,
    Sleeping,
    Busy,
    Unknown,
}

impl fmt::Display for AwakeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AwakeStatus::Awake => "awake",
            AwakeStatus::Sleeping => "sleeping",
            AwakeStatus::Busy => "busy",
            AwakeStatus::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Priority level attached to a ping request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
        };
        write!(f, "{}", s)
    }
}

/// A ping sent to a peer asking whether it is awake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwakeRequest {
    pub id: Uuid,
    pub requester: String,
    pub message: String,
    pub priority: Priority,
    pub timestamp: DateTime<Utc>,
}

impl AwakeRequest {
    /// Build a request, rejecting invalid requester identities
    pub fn new(
        requester: &str,
        message: &str,
        priority: Priority,
    ) -> Result<Self, AwakeError> {
        validate_identity(requester)?;

        Ok(AwakeRequest {
            id: Uuid::new_v4(),
            requester: requester.to_string(),
            message: message.to_string(),
            priority,
            timestamp: Utc::now(),
        })
    }
}

/// A peer's reply to an awakeness ping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwakeResponse {
    pub responder: String,
    pub status: AwakeStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_workload")]
    pub workload: String,
    /// ISO 3166-1 alpha-2 country code of the responder, best-effort
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Round-trip time measured by the requester, filled in client-side
    #[serde(rename = "responseTimeMs", default)]
    pub response_time_ms: Option<f64>,
}

fn default_workload() -> String {
    "normal".to_string()
}

/// Aggregate result of a network scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkAwakenessSummary {
    #[serde(rename = "totalPinged")]
    pub total_pinged: usize,
    #[serde(rename = "awakeCount")]
    pub awake_count: usize,
    #[serde(rename = "responseCount")]
    pub response_count: usize,
    #[serde(rename = "awakeUsers")]
    pub awake_users: Vec<String>,
    #[serde(rename = "sleepingUsers")]
    pub sleeping_users: Vec<String>,
    #[serde(rename = "nonResponsive")]
    pub non_responsive: Vec<String>,
    /// Count of responding peers per ISO country code
    #[serde(default)]
    pub countries: HashMap<String, u32>,
    #[serde(rename = "scanDurationMs")]
    pub scan_duration_ms: f64,
    pub timestamp: DateTime<Utc>,
}

impl NetworkAwakenessSummary {
    /// Fraction of pinged peers that reported awake, 0.0 when nothing was pinged
    pub fn awakeness_ratio(&self) -> f64 {
        if self.total_pinged == 0 {
            return 0.0;
        }
        self.awake_count as f64 / self.total_pinged as f64
    }

    /// Fraction of pinged peers that responded at all, 0.0 when nothing was pinged
    pub fn response_ratio(&self) -> f64 {
        if self.total_pinged == 0 {
            return 0.0;
        }
        self.response_count as f64 / self.total_pinged as f64
    }
}

/// Validate a peer identity (email form used across the SyftBox network).
///
/// The raw string is validated as-is: identities end up in the peer list
/// file and in gateway URLs verbatim, so stray whitespace is rejected
/// rather than silently carried along.
pub fn validate_identity(identity: &str) -> Result<(), AwakeError> {
    if identity.is_empty() {
        return Err(AwakeError::ValidationError(
            "Peer identity must not be empty".to_string(),
        ));
    }

    if identity.chars().any(char::is_whitespace) {
        return Err(AwakeError::ValidationError(format!(
            "Peer identity must not contain whitespace: {:?}",
            identity
        )));
    }

    let mut parts = identity.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next();

    match domain {
        Some(domain)
            if !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.') =>
        {
            Ok(())
        }
        _ => Err(AwakeError::ValidationError(format!(
            "Invalid peer identity: {}",
            identity
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(
        total: usize,
        awake: Vec<&str>,
        sleeping: Vec<&str>,
        offline: Vec<&str>,
        countries: HashMap<String, u32>,
    ) -> NetworkAwakenessSummary {
        NetworkAwakenessSummary {
            total_pinged: total,
            awake_count: awake.len(),
            response_count: awake.len() + sleeping.len(),
            awake_users: awake.into_iter().map(String::from).collect(),
            sleeping_users: sleeping.into_iter().map(String::from).collect(),
            non_responsive: offline.into_iter().map(String::from).collect(),
            countries,
            scan_duration_ms: 1200.0,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn ratios_are_counts_over_total() {
        let s = summary(
            4,
            vec!["a@example.com", "b@example.com"],
            vec!["c@example.com"],
            vec!["d@example.com"],
            HashMap::new(),
        );
        assert_eq!(s.awakeness_ratio(), 0.5);
        assert_eq!(s.response_ratio(), 0.75);
    }

    #[test]
    fn ratios_guard_against_empty_scan() {
        let s = summary(0, vec![], vec![], vec![], HashMap::new());
        assert_eq!(s.awakeness_ratio(), 0.0);
        assert_eq!(s.response_ratio(), 0.0);
    }

    #[test]
    fn summary_serializes_country_distribution() {
        let mut countries = HashMap::new();
        countries.insert("US".to_string(), 2);
        countries.insert("GB".to_string(), 1);

        let s = summary(
            3,
            vec!["a@example.com", "b@example.com", "c@example.com"],
            vec![],
            vec![],
            countries.clone(),
        );

        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["countries"]["US"], 2);
        assert_eq!(json["countries"]["GB"], 1);
        assert_eq!(json["totalPinged"], 3);
    }

    #[test]
    fn summary_deserializes_without_countries() {
        let json = r#"{
            "totalPinged": 1,
            "awakeCount": 0,
            "responseCount": 0,
            "awakeUsers": [],
            "sleepingUsers": [],
            "nonResponsive": ["a@example.com"],
            "scanDurationMs": 500.0,
            "timestamp": "2024-01-01T00:00:00Z"
        }"#;
        let s: NetworkAwakenessSummary = serde_json::from_str(json).unwrap();
        assert!(s.countries.is_empty());
    }

    #[test]
    fn response_country_defaults_to_none() {
        let json = r#"{"responder": "a@example.com", "status": "awake"}"#;
        let r: AwakeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(r.country, None);
        assert_eq!(r.workload, "normal");
    }

    #[test]
    fn response_round_trips_country() {
        let json = r#"{"responder": "a@example.com", "status": "busy", "country": "DE"}"#;
        let r: AwakeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(r.country.as_deref(), Some("DE"));
        assert_eq!(r.status, AwakeStatus::Busy);

        let back = serde_json::to_value(&r).unwrap();
        assert_eq!(back["country"], "DE");
    }

    #[test]
    fn request_rejects_bad_identities() {
        for bad in ["", "no-at-sign", "@example.com", "user@", "user@nodot", "a@b@c.com"] {
            assert!(AwakeRequest::new(bad, "ping", Priority::Normal).is_err());
        }
    }

    #[test]
    fn identity_with_whitespace_is_rejected() {
        // Identities are stored and interpolated into URLs verbatim, so
        // padded or spaced input must fail instead of passing trimmed
        for bad in [" a@example.com", "a@example.com ", " a@example.com ", "a b@example.com"] {
            assert!(validate_identity(bad).is_err(), "{:?} should be invalid", bad);
        }
    }

    #[test]
    fn request_accepts_valid_identity() {
        let req = AwakeRequest::new("user@example.com", "ping", Priority::High).unwrap();
        assert_eq!(req.requester, "user@example.com");
        assert_eq!(req.priority, Priority::High);
    }
}
