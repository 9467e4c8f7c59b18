//! etcd health probing over the client HTTP API.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::etcd::EtcdError;
use crate::resilience::Backoff;

/// Per-request timeout for health checks.
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// PEM material for etcd client certificate authentication.
#[derive(Clone)]
pub struct EtcdClientTls {
    pub cert_pem: Vec<u8>,
    pub key_pem: Vec<u8>,
    pub ca_pem: Vec<u8>,
}

impl std::fmt::Debug for EtcdClientTls {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // never print key material
        f.debug_struct("EtcdClientTls")
            .field("cert_bytes", &self.cert_pem.len())
            .field("ca_bytes", &self.ca_pem.len())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    health: String,
}

/// Interpret a `/health` response body.
pub fn parse_health(body: &[u8]) -> Result<(), EtcdError> {
    let body: HealthResponse = serde_json::from_slice(body)?;
    if body.health != "true" {
        return Err(EtcdError::Unhealthy(format!("health={}", body.health)));
    }
    Ok(())
}

/// Polls `<endpoint>/health`.
#[derive(Debug, Clone)]
pub struct EtcdHealthChecker {
    client: reqwest::Client,
    health_url: Url,
}

impl EtcdHealthChecker {
    pub fn new(endpoint: &Url, tls: Option<&EtcdClientTls>) -> Result<Self, EtcdError> {
        let health_url = endpoint.join("/health")?;

        let mut builder = reqwest::Client::builder()
            .timeout(CHECK_TIMEOUT)
            .no_proxy();

        if let Some(tls) = tls {
            let mut pem = tls.cert_pem.clone();
            pem.extend_from_slice(&tls.key_pem);
            let identity = reqwest::Identity::from_pem(&pem).map_err(EtcdError::Client)?;
            let ca = reqwest::Certificate::from_pem(&tls.ca_pem).map_err(EtcdError::Client)?;
            builder = builder.identity(identity).add_root_certificate(ca);
        }

        let client = builder.build().map_err(EtcdError::Client)?;
        Ok(Self { client, health_url })
    }

    pub fn health_url(&self) -> &Url {
        &self.health_url
    }

    /// Single health check.
    pub async fn check(&self) -> Result<(), EtcdError> {
        let res = self
            .client
            .get(self.health_url.clone())
            .send()
            .await
            .map_err(EtcdError::Request)?;

        let status = res.status();
        if !status.is_success() {
            return Err(EtcdError::Unhealthy(format!("status {}", status)));
        }

        let body = res.bytes().await.map_err(EtcdError::Request)?;
        parse_health(&body)
    }

    /// Check up to `attempts` times, sleeping per `backoff` between failures.
    pub async fn wait_until_healthy(&self, backoff: &Backoff, attempts: u32) -> Result<(), EtcdError> {
        let mut last = String::from("no health check attempted");

        for attempt in 1..=attempts {
            match self.check().await {
                Ok(()) => {
                    tracing::info!(url = %self.health_url, attempt, "etcd is healthy");
                    return Ok(());
                }
                Err(e) => {
                    tracing::debug!(url = %self.health_url, attempt, error = %e, "etcd not healthy yet");
                    last = e.to_string();
                }
            }
            if attempt < attempts {
                tokio::time::sleep(backoff.delay(attempt)).await;
            }
        }

        Err(EtcdError::NotReady { attempts, last })
    }
}
