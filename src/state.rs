use std::sync::Arc;

use crate::{config::AppConfig, store::Base, webhooks::WebhookSender};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub base: Base,
    pub webhooks: Arc<dyn WebhookSender>,
}

impl AppState {
    pub fn new(config: AppConfig, base: Base, webhooks: Arc<dyn WebhookSender>) -> Self {
        Self {
            config: Arc::new(config),
            base,
            webhooks,
        }
    }
}
