use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde::Serialize;
use serde_json::Value;
use staffing_backend::config::{AppConfig, TableNames, WebhookUrls};
use staffing_backend::error::{StoreError, WebhookError};
use staffing_backend::routes;
use staffing_backend::state::AppState;
use staffing_backend::store::{Base, Fields, Record, RecordStore, SelectQuery};
use staffing_backend::webhooks::WebhookSender;
use tokio::sync::Mutex;
use tower::util::ServiceExt;

#[allow(dead_code)]
#[derive(Clone, Debug)]
pub struct CreateCall {
    pub table: String,
    pub fields: Fields,
}

#[allow(dead_code)]
#[derive(Clone, Debug)]
pub struct SelectCall {
    pub table: String,
    pub query: SelectQuery,
}

/// In-memory record store that understands the id-lookup formula and counts calls.
#[derive(Default)]
pub struct FakeStore {
    tables: Mutex<HashMap<String, Vec<Record>>>,
    creates: Mutex<Vec<CreateCall>>,
    selects: Mutex<Vec<SelectCall>>,
    failing: Mutex<bool>,
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn select(&self, table: &str, query: &SelectQuery) -> Result<Vec<Record>, StoreError> {
        self.selects.lock().await.push(SelectCall {
            table: table.to_string(),
            query: query.clone(),
        });
        if *self.failing.lock().await {
            return Err(unavailable());
        }

        let guard = self.tables.lock().await;
        let rows = guard.get(table).cloned().unwrap_or_default();
        let wanted = query.filter_by_formula.as_deref().and_then(first_literal);
        let mut matched: Vec<Record> = rows
            .into_iter()
            .filter(|record| match &wanted {
                Some(id) => {
                    record.id == *id
                        || record.fields.get("Job ID").and_then(Value::as_str) == Some(id.as_str())
                }
                None => true,
            })
            .collect();
        if let Some(max) = query.max_records {
            matched.truncate(max);
        }
        Ok(matched)
    }

    async fn create(&self, table: &str, fields: Fields) -> Result<Record, StoreError> {
        if *self.failing.lock().await {
            return Err(unavailable());
        }
        let mut creates = self.creates.lock().await;
        creates.push(CreateCall {
            table: table.to_string(),
            fields: fields.clone(),
        });
        Ok(Record {
            id: format!("recNew{}", creates.len()),
            created_time: None,
            fields,
        })
    }
}

#[allow(dead_code)]
impl FakeStore {
    pub async fn seed(&self, table: &str, id: &str, fields: Value) {
        let fields = match fields {
            Value::Object(map) => map,
            other => panic!("seed fields must be an object, got {other}"),
        };
        self.tables
            .lock()
            .await
            .entry(table.to_string())
            .or_default()
            .push(Record {
                id: id.to_string(),
                created_time: None,
                fields,
            });
    }

    pub async fn set_failing(&self, failing: bool) {
        *self.failing.lock().await = failing;
    }

    pub async fn creates(&self) -> Vec<CreateCall> {
        self.creates.lock().await.clone()
    }

    pub async fn selects(&self) -> Vec<SelectCall> {
        self.selects.lock().await.clone()
    }
}

fn unavailable() -> StoreError {
    StoreError::Status {
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        body: "upstream unavailable".to_string(),
    }
}

fn first_literal(formula: &str) -> Option<String> {
    let start = formula.find('\'')? + 1;
    let rest = &formula[start..];
    let end = rest.find('\'')?;
    Some(rest[..end].to_string())
}

#[allow(dead_code)]
#[derive(Clone, Debug)]
pub struct WebhookCall {
    pub url: String,
    pub payload: Value,
}

#[derive(Default)]
pub struct FakeWebhooks {
    calls: Mutex<Vec<WebhookCall>>,
    reject_with: Mutex<Option<reqwest::StatusCode>>,
}

#[async_trait]
impl WebhookSender for FakeWebhooks {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<(), WebhookError> {
        self.calls.lock().await.push(WebhookCall {
            url: url.to_string(),
            payload: payload.clone(),
        });
        match *self.reject_with.lock().await {
            Some(status) => Err(WebhookError::Status(status)),
            None => Ok(()),
        }
    }
}

#[allow(dead_code)]
impl FakeWebhooks {
    pub async fn reject_with(&self, status: reqwest::StatusCode) {
        *self.reject_with.lock().await = Some(status);
    }

    pub async fn calls(&self) -> Vec<WebhookCall> {
        self.calls.lock().await.clone()
    }
}

#[allow(dead_code)]
pub const JOB_APPLICATION_HOOK: &str = "https://hooks.example.com/job-application";
#[allow(dead_code)]
pub const RESUME_POOL_HOOK: &str = "https://hooks.example.com/resume-pool";

pub struct TestApp {
    router: Router,
    store: Arc<FakeStore>,
    webhooks: Arc<FakeWebhooks>,
}

impl TestApp {
    pub fn new() -> Self {
        let tables = TableNames::default();
        let config = AppConfig {
            airtable_api_key: "test-key".to_string(),
            airtable_base_id: "appTest".to_string(),
            airtable_api_url: "http://127.0.0.1:9/v0".to_string(),
            tables: tables.clone(),
            webhooks: WebhookUrls {
                job_application: Some(JOB_APPLICATION_HOOK.to_string()),
                resume_pool: Some(RESUME_POOL_HOOK.to_string()),
                candidate_request: Some("https://hooks.example.com/candidate-request".to_string()),
                candidate_referral: Some(
                    "https://hooks.example.com/candidate-referral".to_string(),
                ),
                company_referral: None,
            },
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            cors_allowed_origin: None,
            http_timeout: None,
        };

        let store = Arc::new(FakeStore::default());
        let webhooks = Arc::new(FakeWebhooks::default());
        let store_for_base: Arc<dyn RecordStore> = store.clone();
        let webhooks_for_state: Arc<dyn WebhookSender> = webhooks.clone();
        let base = Base::new(store_for_base, tables);
        let state = AppState::new(config, base, webhooks_for_state);
        let router = routes::create_router(state);

        Self {
            router,
            store,
            webhooks,
        }
    }

    #[allow(dead_code)]
    pub fn store(&self) -> Arc<FakeStore> {
        self.store.clone()
    }

    #[allow(dead_code)]
    pub fn webhooks(&self) -> Arc<FakeWebhooks> {
        self.webhooks.clone()
    }

    #[allow(dead_code)]
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<hyper::Response<Body>> {
        let body = serde_json::to_vec(payload)?;
        self.post_raw(path, body).await
    }

    #[allow(dead_code)]
    pub async fn post_raw(&self, path: &str, body: Vec<u8>) -> Result<hyper::Response<Body>> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body))?;
        Ok(self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }

    #[allow(dead_code)]
    pub async fn get(&self, path: &str) -> Result<hyper::Response<Body>> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())?;
        Ok(self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }
}

pub async fn body_to_vec(body: Body) -> Result<Vec<u8>> {
    let collected = body
        .collect()
        .await
        .map_err(|err| anyhow!("failed to read response body: {err}"))?;
    Ok(collected.to_bytes().to_vec())
}

/// Status plus parsed JSON body.
#[allow(dead_code)]
pub async fn read_json(response: hyper::Response<Body>) -> Result<(StatusCode, Value)> {
    let status = response.status();
    let body = body_to_vec(response.into_body()).await?;
    let value = serde_json::from_slice(&body)
        .map_err(|err| anyhow!("body was not JSON ({err}): {}", String::from_utf8_lossy(&body)))?;
    Ok((status, value))
}
