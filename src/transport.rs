use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::AwakeError;
use crate::models::{AwakeRequest, AwakeResponse};

/// Send/receive primitive provided by the SyftBox RPC substrate.
///
/// Delivery, encryption and routing all happen on the other side of this
/// trait; the client code only hands over a request and waits for the
/// peer's reply.
#[async_trait]
pub trait AwakeTransport: Send + Sync {
    async fn send_ping(
        &self,
        recipient: &str,
        request: &AwakeRequest,
    ) -> Result<AwakeResponse, AwakeError>;
}

/// Transport that relays pings through an HTTP gateway into the substrate
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    gateway_url: String,
}

impl HttpTransport {
    pub fn new(gateway_url: &str, timeout: Duration) -> Result<Self, AwakeError> {
        Ok(HttpTransport {
            client: create_http_client(timeout)?,
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
        })
    }

    fn ping_url(&self, recipient: &str) -> String {
        format!("{}/rpc/{}/awake", self.gateway_url, recipient)
    }
}

#[async_trait]
impl AwakeTransport for HttpTransport {
    async fn send_ping(
        &self,
        recipient: &str,
        request: &AwakeRequest,
    ) -> Result<AwakeResponse, AwakeError> {
        let url = self.ping_url(recipient);
        tracing::debug!("Sending awake ping to {} via {}", recipient, url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| AwakeError::TransportError(format!("Ping to {} failed: {}", recipient, e)))?;

        if !response.status().is_success() {
            return Err(AwakeError::TransportError(format!(
                "Gateway returned status {} for {}",
                response.status(),
                recipient
            )));
        }

        let reply: AwakeResponse = response
            .json()
            .await
            .map_err(|e| AwakeError::JsonError(format!("Invalid reply from {}: {}", recipient, e)))?;

        Ok(reply)
    }
}

/// Create an HTTP client with appropriate configuration for pinging peers
pub fn create_http_client(timeout: Duration) -> Result<Client, AwakeError> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("syft-awake/", env!("CARGO_PKG_VERSION")))
        // Connection timeout separate from request timeout
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(5)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| AwakeError::RequestError(format!("Failed to create HTTP client: {}", e)))?;

    Ok(client)
}
