use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    api::ApiUrls,
    app_error::{AppError, StdResponse},
    models::{Booking, Chat, Doctor, Patient},
};

/// Read side of the hosted document store.
///
/// Absent documents come back as `None`; only transport and decode problems
/// are errors.
#[async_trait]
pub trait ClinicStore: Send + Sync {
    /// All bookings whose civil `date` equals the given `YYYY-MM-DD` string.
    async fn bookings_on(&self, date: &str) -> Result<Vec<Booking>>;
    async fn doctor(&self, id: &str) -> Result<Option<Doctor>>;
    async fn patient(&self, id: &str) -> Result<Option<Patient>>;
    async fn chat(&self, id: &str) -> Result<Option<Chat>>;
}

pub struct StoreServiceClient {
    client: Client,
    base_url: String,
}

impl StoreServiceClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: ApiUrls::get_store_service_url(),
        }
    }

    async fn fetch_optional<T: DeserializeOwned>(&self, path: String) -> Result<Option<T>> {
        let res: StdResponse<T, String> = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .send()
            .await
            .map_err(|_| AppError::ServiceUnreachable("StoreService".into()))?
            .json()
            .await
            .context("Failed to parse JSON")?;

        Ok(res.data)
    }
}

#[async_trait]
impl ClinicStore for StoreServiceClient {
    async fn bookings_on(&self, date: &str) -> Result<Vec<Booking>> {
        let bookings: StdResponse<Vec<Booking>, String> = self
            .client
            .get(format!("{}/bookings", self.base_url))
            .query(&[("date", date)])
            .send()
            .await
            .map_err(|_| AppError::ServiceUnreachable("StoreService".into()))?
            .json()
            .await
            .context("Failed to parse JSON")?;

        Ok(bookings.data.unwrap_or_default())
    }

    async fn doctor(&self, id: &str) -> Result<Option<Doctor>> {
        self.fetch_optional(format!("doctors/{id}")).await
    }

    async fn patient(&self, id: &str) -> Result<Option<Patient>> {
        self.fetch_optional(format!("patients/{id}")).await
    }

    async fn chat(&self, id: &str) -> Result<Option<Chat>> {
        self.fetch_optional(format!("chats/{id}")).await
    }
}
