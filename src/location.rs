use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::Config;
use crate::transport::create_http_client;

const COUNTRY_API_URL: &str = "https://api.country.is/";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Response from the country.is geolocation API
#[derive(Debug, Deserialize)]
struct CountryApiResponse {
    country: Option<String>,
}

/// Detect the country of the local node from its public IP address.
///
/// Returns an ISO 3166-1 alpha-2 code ("US", "GB", ...) or None. Lookup is
/// best-effort: any failure is logged and swallowed, never surfaced as an
/// error.
pub async fn detect_country(client: &Client, enabled: bool) -> Option<String> {
    detect_country_at(client, enabled, COUNTRY_API_URL).await
}

/// Detect the local country under the configured policy.
///
/// Honors `LOCATION_ENABLED`; responders call this when tagging replies.
pub async fn detect_local_country(config: &Config) -> Option<String> {
    if !config.location_enabled {
        tracing::debug!("Location detection is disabled");
        return None;
    }

    let client = match create_http_client(LOOKUP_TIMEOUT) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Could not build client for country detection: {}", e);
            return None;
        }
    };

    detect_country(&client, true).await
}

async fn detect_country_at(client: &Client, enabled: bool, api_url: &str) -> Option<String> {
    if !enabled {
        tracing::debug!("Location detection is disabled");
        return None;
    }

    let response = match client.get(api_url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!("Network error during country detection: {}", e);
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::warn!(
            "Country detection API returned status {}",
            response.status()
        );
        return None;
    }

    let parsed: CountryApiResponse = match response.json().await {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Invalid JSON response during country detection: {}", e);
            return None;
        }
    };

    match parsed.country {
        Some(code) if !code.is_empty() => {
            tracing::debug!("Detected country: {}", code);
            Some(code)
        }
        _ => {
            tracing::warn!("Country detection returned empty result");
            None
        }
    }
}
