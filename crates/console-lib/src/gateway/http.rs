//! HTTP adapter for the backend gateway
//!
//! Thin reqwest client over the backend's REST API. Non-2xx responses are
//! mapped to the backend's `{ "error": ... }` body when present, falling
//! back to the HTTP status.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{BackendGateway, HistoryBucket};
use crate::error::GatewayError;
use crate::models::{
    Agent, AgentConfig, AgentSettingsPatch, AvailableOptions, DecisionFeed, Instance,
    MetricsSnapshot, PriceHistoryPoint, PricingSnapshot, SwitchAck, SwitchCommand, SystemHealth,
};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error body shape used by the backend for failed requests.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// HTTP implementation of [`BackendGateway`].
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// Create a gateway against the given base URL with default settings.
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        HttpGatewayBuilder::new().base_url(base_url).build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn join(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(path)
            .map_err(|e| GatewayError::new(format!("invalid request path {path}: {e}")))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let url = self.join(path)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GatewayError::new(format!("request failed: {e}")))?;
        Self::parse(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let url = self.join(path)?;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::new(format!("request failed: {e}")))?;
        Self::parse(response).await
    }

    /// Mutating call whose acknowledgement body we do not interpret.
    async fn post_ack<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), GatewayError> {
        self.post::<serde_json::Value, B>(path, body).await.map(|_| ())
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| format!("API error ({status})"));
            return Err(GatewayError::new(message));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::new(format!("failed to parse response: {e}")))
    }
}

#[async_trait]
impl BackendGateway for HttpGateway {
    async fn pricing(&self, instance_id: &str) -> Result<PricingSnapshot, GatewayError> {
        self.get(&format!("api/client/instances/{instance_id}/pricing"))
            .await
    }

    async fn metrics(&self, instance_id: &str) -> Result<MetricsSnapshot, GatewayError> {
        self.get(&format!("api/client/instances/{instance_id}/metrics"))
            .await
    }

    async fn available_options(
        &self,
        instance_id: &str,
    ) -> Result<AvailableOptions, GatewayError> {
        self.get(&format!(
            "api/client/instances/{instance_id}/available-options"
        ))
        .await
    }

    async fn price_history(
        &self,
        instance_id: &str,
        lookback_days: u32,
        bucket: HistoryBucket,
    ) -> Result<Vec<PriceHistoryPoint>, GatewayError> {
        self.get(&format!(
            "api/client/instances/{instance_id}/price-history?days={lookback_days}&interval={}",
            bucket.as_str()
        ))
        .await
    }

    async fn force_switch(
        &self,
        instance_id: &str,
        command: &SwitchCommand,
    ) -> Result<SwitchAck, GatewayError> {
        self.post(
            &format!("api/client/instances/{instance_id}/force-switch"),
            command,
        )
        .await
    }

    async fn instances(&self, client_id: &str) -> Result<Vec<Instance>, GatewayError> {
        self.get(&format!("api/client/{client_id}/instances")).await
    }

    async fn agents(&self, client_id: &str) -> Result<Vec<Agent>, GatewayError> {
        self.get(&format!("api/client/{client_id}/agents")).await
    }

    async fn toggle_agent_enabled(
        &self,
        agent_id: &str,
        enabled: bool,
    ) -> Result<(), GatewayError> {
        self.post_ack(
            &format!("api/client/agents/{agent_id}/toggle-enabled"),
            &serde_json::json!({ "enabled": enabled }),
        )
        .await
    }

    async fn update_agent_settings(
        &self,
        agent_id: &str,
        patch: &AgentSettingsPatch,
    ) -> Result<(), GatewayError> {
        self.post_ack(&format!("api/client/agents/{agent_id}/settings"), patch)
            .await
    }

    async fn update_agent_config(
        &self,
        agent_id: &str,
        config: &AgentConfig,
    ) -> Result<(), GatewayError> {
        self.post_ack(&format!("api/client/agents/{agent_id}/config"), config)
            .await
    }

    async fn agent_decisions(&self, client_id: &str) -> Result<DecisionFeed, GatewayError> {
        self.get(&format!("api/client/{client_id}/agents/decisions"))
            .await
    }

    async fn system_health(&self) -> Result<SystemHealth, GatewayError> {
        self.get("api/admin/system-health").await
    }
}

/// Builder for [`HttpGateway`].
pub struct HttpGatewayBuilder {
    base_url: Option<String>,
    request_timeout: Duration,
}

impl HttpGatewayBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<HttpGateway, GatewayError> {
        let base_url = self
            .base_url
            .ok_or_else(|| GatewayError::new("base_url is required"))?;
        // Url::join treats a path-bearing base without a trailing slash as a
        // file and would drop its last segment.
        let normalized = if base_url.ends_with('/') {
            base_url
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| GatewayError::new(format!("invalid API URL: {e}")))?;

        let client = Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| GatewayError::new(format!("failed to create HTTP client: {e}")))?;

        Ok(HttpGateway { client, base_url })
    }
}

impl Default for HttpGatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}
