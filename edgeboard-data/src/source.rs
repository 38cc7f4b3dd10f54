//! Record sources feeding dashboard widgets.

use crate::{config::BoardConfig, error::SourceError};
use async_trait::async_trait;
use edgeboard_pipeline::Record;
use parking_lot::RwLock;
use reqwest::Client;
use smol_str::SmolStr;
use std::{sync::Arc, time::Duration};
use tracing::debug;
use url::Url;

/// Supplies a complete snapshot of records for a widget.
///
/// Every successful fetch returns the full data set, which replaces the
/// widget's previous snapshot wholesale.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<Vec<Record>, SourceError>;
}

/// Serves a fixed snapshot. Used for offline boards and tests.
#[derive(Debug)]
pub struct StaticSource {
    name: SmolStr,
    records: RwLock<Arc<Vec<Record>>>,
}

impl StaticSource {
    pub fn new(name: impl Into<SmolStr>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            records: RwLock::new(Arc::new(records)),
        }
    }

    /// Replace the snapshot served by subsequent fetches.
    pub fn replace(&self, records: Vec<Record>) {
        *self.records.write() = Arc::new(records);
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<Record>, SourceError> {
        let records = Arc::clone(&self.records.read());
        Ok(records.as_ref().clone())
    }
}

/// Fetches a JSON array of flat records over HTTP.
///
/// The body may be a bare array or an object with the array under `data`.
/// Elements that are not JSON objects are skipped, as are non-scalar members
/// of an object (see [`Record::from_json`]).
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: Url,
}

impl HttpSource {
    /// Create a source for `url` with the given request timeout.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    /// Create from a [`BoardConfig`]; fails if no `source_url` is configured.
    pub fn from_config(config: &BoardConfig) -> Result<Self, SourceError> {
        let raw = config
            .source_url
            .as_deref()
            .ok_or_else(|| SourceError::Config("EDGEBOARD_SOURCE_URL not set".into()))?;
        let url = Url::parse(raw)
            .map_err(|e| SourceError::Config(format!("invalid source url {raw}: {e}")))?;

        Self::new(url, config.request_timeout())
    }

    /// Create from environment variables (see [`BoardConfig::from_env`]).
    pub fn from_env() -> Result<Self, SourceError> {
        Self::from_config(&BoardConfig::from_env())
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl RecordSource for HttpSource {
    fn name(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch(&self) -> Result<Vec<Record>, SourceError> {
        debug!(url = %self.url, "Fetching records");

        let response = self.client.get(self.url.clone()).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse records: {}", e)))?;

        let records = parse_records(body)?;
        debug!(url = %self.url, count = records.len(), "Fetched records");

        Ok(records)
    }
}

/// Decode a feed body into records, skipping elements that are not objects.
pub fn parse_records(body: serde_json::Value) -> Result<Vec<Record>, SourceError> {
    let items = match body {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut object) => match object.remove("data") {
            Some(serde_json::Value::Array(items)) => items,
            _ => {
                return Err(SourceError::Parse(
                    "expected an array of records or an object with a data array".into(),
                ));
            }
        },
        other => {
            return Err(SourceError::Parse(format!(
                "expected an array of records, got {}",
                json_kind(&other)
            )));
        }
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let record = Record::from_json(item, index.to_string());
            if record.is_none() {
                debug!(index, "Skipping non-object record");
            }
            record
        })
        .collect())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
