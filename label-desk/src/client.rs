//! HTTP client for the label store.

use std::future::Future;
use std::time::Duration;

use label_core::{LabelFields, Record, RecordId};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("label store unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("label {0} not found")]
    NotFound(RecordId),
    #[error("label store answered {status}: {message}")]
    Status { status: u16, message: String },
}

/// Anything the refresh loop can pull the current record list from.
pub trait RecordSource: Send + Sync + 'static {
    fn fetch_records(&self) -> impl Future<Output = Result<Vec<Record>, ClientError>> + Send;
}

#[derive(Deserialize)]
struct Added {
    id: RecordId,
}

#[derive(Deserialize)]
struct Imported {
    #[serde(alias = "etiquetas")]
    labels: Vec<Record>,
}

#[derive(Debug, Clone)]
pub struct StoreClient {
    base: String,
    http: reqwest::Client,
}

impl StoreClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn list(&self) -> Result<Vec<Record>, ClientError> {
        let resp = self.http.get(self.url("/labels")).send().await?;
        let records: Vec<Record> = check(resp, None).await?.json().await?;
        debug!(count = records.len(), "fetched labels");
        Ok(records)
    }

    pub async fn create(&self, fields: &LabelFields) -> Result<RecordId, ClientError> {
        let resp = self
            .http
            .post(self.url("/add-label"))
            .json(fields)
            .send()
            .await?;
        let added: Added = check(resp, None).await?.json().await?;
        Ok(added.id)
    }

    pub async fn update(&self, id: RecordId, fields: &LabelFields) -> Result<(), ClientError> {
        let resp = self
            .http
            .put(self.url(&format!("/edit/{id}")))
            .json(fields)
            .send()
            .await?;
        check(resp, Some(id)).await?;
        Ok(())
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), ClientError> {
        let resp = self
            .http
            .delete(self.url(&format!("/delete/{id}")))
            .send()
            .await?;
        check(resp, Some(id)).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), ClientError> {
        let resp = self.http.delete(self.url("/clear")).send().await?;
        check(resp, None).await?;
        Ok(())
    }

    pub async fn import(&self, candidates: &[LabelFields]) -> Result<Vec<Record>, ClientError> {
        let resp = self
            .http
            .post(self.url("/import-labels"))
            .json(candidates)
            .send()
            .await?;
        let imported: Imported = check(resp, None).await?.json().await?;
        Ok(imported.labels)
    }
}

impl RecordSource for StoreClient {
    fn fetch_records(&self) -> impl Future<Output = Result<Vec<Record>, ClientError>> + Send {
        self.list()
    }
}

async fn check(resp: Response, id: Option<RecordId>) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
        return Err(ClientError::NotFound(id));
    }
    let message = resp.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
