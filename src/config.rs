use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::webhooks::FormType;

pub const DEFAULT_AIRTABLE_API_URL: &str = "https://api.airtable.com/v0";

#[derive(Clone, Debug)]
pub struct TableNames {
    pub jobs: String,
    pub candidate_referrals: String,
    pub candidate_requests: String,
    pub company_referrals: String,
    pub resume_pool: String,
    pub job_applications: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            jobs: "Jobs".to_string(),
            candidate_referrals: "Candidate Referrals".to_string(),
            candidate_requests: "Candidate Requests".to_string(),
            company_referrals: "Company Referrals".to_string(),
            resume_pool: "Resume Pool".to_string(),
            job_applications: "Job Applications".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct WebhookUrls {
    pub job_application: Option<String>,
    pub resume_pool: Option<String>,
    pub candidate_request: Option<String>,
    pub candidate_referral: Option<String>,
    pub company_referral: Option<String>,
}

impl WebhookUrls {
    pub fn for_form(&self, form_type: FormType) -> Option<&str> {
        let url = match form_type {
            FormType::JobApplication => &self.job_application,
            FormType::ResumePool => &self.resume_pool,
            FormType::CandidateRequest => &self.candidate_request,
            FormType::CandidateReferral => &self.candidate_referral,
            FormType::CompanyReferral => &self.company_referral,
        };
        url.as_deref()
    }

    pub fn configured_count(&self) -> usize {
        FormType::ALL
            .iter()
            .filter(|form_type| self.for_form(**form_type).is_some())
            .count()
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub airtable_api_key: String,
    pub airtable_base_id: String,
    pub airtable_api_url: String,
    pub tables: TableNames,
    pub webhooks: WebhookUrls,
    pub server_host: String,
    pub server_port: u16,
    pub cors_allowed_origin: Option<String>,
    pub http_timeout: Option<Duration>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let airtable_api_key = var_with_public_fallback("AIRTABLE_API_KEY")
            .ok_or_else(|| anyhow!("AIRTABLE_API_KEY must be set"))?;
        let airtable_base_id = var_with_public_fallback("AIRTABLE_BASE_ID")
            .ok_or_else(|| anyhow!("AIRTABLE_BASE_ID must be set"))?;
        let airtable_api_url = non_empty_var("AIRTABLE_API_URL")
            .unwrap_or_else(|| DEFAULT_AIRTABLE_API_URL.to_string());

        let defaults = TableNames::default();
        let tables = TableNames {
            jobs: non_empty_var("AIRTABLE_JOBS_TABLE").unwrap_or(defaults.jobs),
            candidate_referrals: non_empty_var("AIRTABLE_CANDIDATE_REFERRALS_TABLE")
                .unwrap_or(defaults.candidate_referrals),
            candidate_requests: non_empty_var("AIRTABLE_CANDIDATE_REQUESTS_TABLE")
                .unwrap_or(defaults.candidate_requests),
            company_referrals: non_empty_var("AIRTABLE_COMPANY_REFERRALS_TABLE")
                .unwrap_or(defaults.company_referrals),
            resume_pool: non_empty_var("AIRTABLE_RESUME_POOL_TABLE")
                .unwrap_or(defaults.resume_pool),
            job_applications: non_empty_var("AIRTABLE_JOB_APPLICATIONS_TABLE")
                .unwrap_or(defaults.job_applications),
        };

        let webhooks = WebhookUrls {
            job_application: non_empty_var("WEBHOOK_JOB_APPLICATION_URL"),
            resume_pool: non_empty_var("WEBHOOK_RESUME_POOL_URL"),
            candidate_request: non_empty_var("WEBHOOK_CANDIDATE_REQUEST_URL"),
            candidate_referral: non_empty_var("WEBHOOK_CANDIDATE_REFERRAL_URL"),
            company_referral: non_empty_var("WEBHOOK_COMPANY_REFERRAL_URL"),
        };

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("SERVER_PORT must be a valid u16")?;
        let cors_allowed_origin = non_empty_var("CORS_ALLOWED_ORIGIN");
        let http_timeout = non_empty_var("HTTP_TIMEOUT_SECS")
            .map(|value| value.parse::<u64>())
            .transpose()
            .context("HTTP_TIMEOUT_SECS must be an integer")?
            .map(Duration::from_secs);

        Ok(Self {
            airtable_api_key,
            airtable_base_id,
            airtable_api_url,
            tables,
            webhooks,
            server_host,
            server_port,
            cors_allowed_origin,
            http_timeout,
        })
    }

    pub fn redacted_api_key(&self) -> String {
        redact_secret(&self.airtable_api_key)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Server-side name first, then the `PUBLIC_`-prefixed variant shared with the browser build.
fn var_with_public_fallback(name: &str) -> Option<String> {
    non_empty_var(name).or_else(|| non_empty_var(&format!("PUBLIC_{name}")))
}

fn redact_secret(raw: &str) -> String {
    let prefix: String = raw.chars().take(4).collect();
    if raw.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("{prefix}…****")
    }
}
