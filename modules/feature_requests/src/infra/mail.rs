use async_trait::async_trait;
use serde_json::json;
use url::Url;

use crate::contract::FeatureRequest;
use crate::domain::mailer::Mailer;

/// Webhook-backed mailer: posts a small JSON payload to a configured mail
/// relay endpoint. Delivery status is whatever the relay answers; anything
/// non-2xx is an error for the caller to log.
pub struct HttpMailer {
    client: reqwest::Client,
    webhook_url: Url,
    notify_to: Option<String>,
}

impl HttpMailer {
    pub fn new(webhook_url: Url, notify_to: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url,
            notify_to,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn notify_new_request(&self, request: &FeatureRequest) -> anyhow::Result<()> {
        let payload = json!({
            "to": self.notify_to,
            "subject": "New feature request",
            "body": request.description,
            "replyTo": request.submitter_email,
            "requestId": request.id,
        });

        let resp = self
            .client
            .post(self.webhook_url.clone())
            .json(&payload)
            .send()
            .await?;
        resp.error_for_status()?;
        Ok(())
    }
}
