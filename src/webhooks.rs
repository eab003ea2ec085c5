use std::fmt;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::AppConfig;
use crate::error::WebhookError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormType {
    JobApplication,
    ResumePool,
    CandidateRequest,
    CandidateReferral,
    CompanyReferral,
}

impl FormType {
    pub const ALL: [FormType; 5] = [
        FormType::JobApplication,
        FormType::ResumePool,
        FormType::CandidateRequest,
        FormType::CandidateReferral,
        FormType::CompanyReferral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::JobApplication => "jobApplication",
            FormType::ResumePool => "resumePool",
            FormType::CandidateRequest => "candidateRequest",
            FormType::CandidateReferral => "candidateReferral",
            FormType::CompanyReferral => "companyReferral",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|form_type| form_type.as_str() == raw)
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait WebhookSender: Send + Sync + 'static {
    /// POSTs `payload` as JSON; anything but a 2xx answer is an error.
    async fn post_json(&self, url: &str, payload: &Value) -> Result<(), WebhookError>;
}

pub struct HttpWebhookSender {
    client: Client,
}

impl HttpWebhookSender {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .context("failed to build webhook HTTP client")?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl WebhookSender for HttpWebhookSender {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<(), WebhookError> {
        let response = self.client.post(url).json(payload).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, %body, "webhook rejected payload");
            Err(WebhookError::Status(status))
        }
    }
}
