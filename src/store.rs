use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;
use url::Url;

use crate::config::{AppConfig, TableNames};
use crate::error::StoreError;

pub type Fields = Map<String, Value>;

const PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub fields: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectQuery {
    pub filter_by_formula: Option<String>,
    pub max_records: Option<usize>,
}

impl SelectQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filtered(formula: impl Into<String>) -> Self {
        Self {
            filter_by_formula: Some(formula.into()),
            max_records: None,
        }
    }

    pub fn max_records(mut self, max: usize) -> Self {
        self.max_records = Some(max);
        self
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    async fn select(&self, table: &str, query: &SelectQuery) -> Result<Vec<Record>, StoreError>;

    async fn create(&self, table: &str, fields: Fields) -> Result<Record, StoreError>;
}

#[derive(Clone)]
pub struct Base {
    store: Arc<dyn RecordStore>,
    tables: TableNames,
}

impl Base {
    pub fn new(store: Arc<dyn RecordStore>, tables: TableNames) -> Self {
        Self { store, tables }
    }

    pub fn table<'a>(&'a self, name: &'a str) -> TableHandle<'a> {
        TableHandle {
            store: self.store.as_ref(),
            name,
        }
    }

    pub fn jobs(&self) -> TableHandle<'_> {
        self.table(&self.tables.jobs)
    }

    pub fn candidate_referrals(&self) -> TableHandle<'_> {
        self.table(&self.tables.candidate_referrals)
    }

    pub fn candidate_requests(&self) -> TableHandle<'_> {
        self.table(&self.tables.candidate_requests)
    }

    pub fn company_referrals(&self) -> TableHandle<'_> {
        self.table(&self.tables.company_referrals)
    }

    pub fn resume_pool(&self) -> TableHandle<'_> {
        self.table(&self.tables.resume_pool)
    }

    pub fn job_applications(&self) -> TableHandle<'_> {
        self.table(&self.tables.job_applications)
    }
}

pub struct TableHandle<'a> {
    store: &'a dyn RecordStore,
    name: &'a str,
}

impl TableHandle<'_> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub async fn select(&self, query: &SelectQuery) -> Result<Vec<Record>, StoreError> {
        self.store.select(self.name, query).await
    }

    pub async fn select_all(&self) -> Result<Vec<Record>, StoreError> {
        self.select(&SelectQuery::all()).await
    }

    pub async fn create(&self, fields: Fields) -> Result<Record, StoreError> {
        self.store.create(self.name, fields).await
    }
}

pub fn formula_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    records: Vec<Record>,
    #[serde(default)]
    offset: Option<String>,
}

pub struct AirtableStore {
    client: Client,
    api_url: Url,
    base_id: String,
    api_key: String,
}

impl AirtableStore {
    pub fn new(
        client: Client,
        api_url: &str,
        base_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            client,
            api_url: Url::parse(api_url)?,
            base_id: base_id.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("failed to build HTTP client")?;
        Self::new(
            client,
            &config.airtable_api_url,
            config.airtable_base_id.clone(),
            config.airtable_api_key.clone(),
        )
        .context("AIRTABLE_API_URL must be a valid URL")
    }

    fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(&self.base_id)
            .push(table);
        Ok(url)
    }
}

#[async_trait]
impl RecordStore for AirtableStore {
    async fn select(&self, table: &str, query: &SelectQuery) -> Result<Vec<Record>, StoreError> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut url = self.table_url(table)?;
            {
                let mut pairs = url.query_pairs_mut();
                pairs.append_pair("pageSize", &PAGE_SIZE.to_string());
                if let Some(formula) = &query.filter_by_formula {
                    pairs.append_pair("filterByFormula", formula);
                }
                if let Some(max) = query.max_records {
                    pairs.append_pair("maxRecords", &max.to_string());
                }
                if let Some(offset) = &offset {
                    pairs.append_pair("offset", offset);
                }
            }

            let response = self
                .client
                .get(url)
                .bearer_auth(&self.api_key)
                .send()
                .await?;
            let page: ListResponse = decode(response).await?;
            debug!(table, fetched = page.records.len(), "loaded record page");
            records.extend(page.records);

            if let Some(max) = query.max_records {
                if records.len() >= max {
                    records.truncate(max);
                    break;
                }
            }

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(records)
    }

    async fn create(&self, table: &str, fields: Fields) -> Result<Record, StoreError> {
        let url = self.table_url(table)?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&json!({ "fields": fields, "typecast": true }))
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(StoreError::Status { status, body });
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| StoreError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> AirtableStore {
        AirtableStore::new(Client::new(), DEFAULT_API, "appBase123", "key").unwrap()
    }

    const DEFAULT_API: &str = "https://api.airtable.com/v0";

    #[test]
    fn formula_string_escapes_quotes_and_backslashes() {
        assert_eq!(formula_string("JOB-1"), "'JOB-1'");
        assert_eq!(formula_string("O'Brien"), "'O\\'Brien'");
        assert_eq!(formula_string("a\\b"), "'a\\\\b'");
    }

    #[test]
    fn table_url_encodes_table_names() {
        let url = store().table_url("Candidate Referrals").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.airtable.com/v0/appBase123/Candidate%20Referrals"
        );
    }

    #[test]
    fn table_url_tolerates_trailing_slash() {
        let store =
            AirtableStore::new(Client::new(), "https://proxy.local/v0/", "appX", "key").unwrap();
        assert_eq!(
            store.table_url("Jobs").unwrap().as_str(),
            "https://proxy.local/v0/appX/Jobs"
        );
    }

    #[test]
    fn rejects_invalid_api_url() {
        assert!(AirtableStore::new(Client::new(), "not a url", "appX", "key").is_err());
    }

    #[test]
    fn record_defaults_missing_fields() {
        let record: Record = serde_json::from_value(json!({ "id": "rec1" })).unwrap();
        assert_eq!(record.id, "rec1");
        assert!(record.fields.is_empty());
        assert_eq!(record.created_time, None);
    }

    #[test]
    fn select_query_builders() {
        let query = SelectQuery::filtered("{Job ID} = 'X'").max_records(1);
        assert_eq!(query.filter_by_formula.as_deref(), Some("{Job ID} = 'X'"));
        assert_eq!(query.max_records, Some(1));
        assert_eq!(SelectQuery::all(), SelectQuery::default());
    }
}
