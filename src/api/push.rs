use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{api::ApiUrls, app_error::AppError};

/// One token-addressed send, as accepted by the push relay.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    pub token: String,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Best-effort remote send; a rejected send surfaces as an error.
    async fn send(&self, message: PushMessage) -> Result<()>;
}

pub struct PushServiceClient {
    client: Client,
    base_url: String,
}

impl PushServiceClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: ApiUrls::get_push_service_url(),
        }
    }
}

#[async_trait]
impl PushGateway for PushServiceClient {
    async fn send(&self, message: PushMessage) -> Result<()> {
        let res = self
            .client
            .post(format!("{}/send", self.base_url))
            .json(&message)
            .send()
            .await
            .map_err(|_| AppError::ServiceUnreachable("PushService".into()))?;

        res.error_for_status().context("Push send was rejected")?;
        Ok(())
    }
}
