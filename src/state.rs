// src/state.rs
use std::sync::Arc;

use crate::config::Config;
use crate::services::webhook::WebhookClient;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub webhook: WebhookClient,
}

impl AppState {
    pub fn new(config: Config) -> reqwest::Result<Self> {
        let webhook = WebhookClient::new(config.upstream_timeout)?;
        Ok(Self { config, webhook })
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}
