use crate::domain::model::{Delivery, WebhookTarget};
use crate::domain::ports::{ConfigProvider, LeadTransport};
use crate::utils::error::{LeadError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// POSTs lead payloads as JSON to a webhook, or to the relay's `/api/submit`.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    target: WebhookTarget,
}

impl WebhookClient {
    pub fn new(target: WebhookTarget, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, target })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(config.webhook_target().clone(), config.request_timeout())
    }

    pub fn target(&self) -> &WebhookTarget {
        &self.target
    }
}

#[async_trait]
impl LeadTransport for WebhookClient {
    async fn deliver(&self, payload: &serde_json::Value) -> Result<Delivery> {
        let url = match &self.target {
            WebhookTarget::Demo => return Ok(Delivery::Demo),
            WebhookTarget::Live(url) => url,
        };

        tracing::debug!("POST {}", url);
        // `json` sets `Content-Type: application/json`.
        let response = self.client.post(url.clone()).json(payload).send().await?;
        let status = response.status();
        tracing::debug!("Webhook response status: {}", status);

        if !status.is_success() {
            return Err(LeadError::UpstreamError {
                status: status.as_u16(),
            });
        }

        Ok(Delivery::Delivered {
            status: status.as_u16(),
        })
    }
}
