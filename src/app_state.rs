use std::sync::Arc;

use reqwest::Client;

use crate::{
    api::{
        push::{PushGateway, PushServiceClient},
        store::{ClinicStore, StoreServiceClient},
    },
    config::AppConfig,
};

/// Shared handles cloned into every handler and job invocation.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ClinicStore>,
    pub push: Arc<dyn PushGateway>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let http_client = Client::new();
        Self {
            store: Arc::new(StoreServiceClient::new(http_client.clone())),
            push: Arc::new(PushServiceClient::new(http_client)),
            config,
        }
    }
}
