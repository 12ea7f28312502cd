use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, Response, Url};
use std::time::Duration;

use super::{Mirror, MirrorError, RemoteInsert, RemoteRow};
use crate::config::RemoteConfig;
use crate::models::Transaction;

const TABLE: &str = "transacoes";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Mirror backed by a PostgREST-style table endpoint.
pub(crate) struct RestMirror {
    client: reqwest::Client,
    table_url: Url,
    key: String,
}

impl RestMirror {
    pub(crate) fn new(config: &RemoteConfig) -> Result<Self, MirrorError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let table_url = table_url(&config.endpoint)?;
        Ok(Self {
            client,
            table_url,
            key: config.key.clone(),
        })
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", self.key.as_str())
            .header(header::AUTHORIZATION, format!("Bearer {}", self.key))
    }
}

pub(crate) fn table_url(endpoint: &str) -> Result<Url, MirrorError> {
    let base = endpoint.trim_end_matches('/');
    Url::parse(&format!("{base}/rest/v1/{TABLE}"))
        .map_err(|_| MirrorError::InvalidUrl(endpoint.to_string()))
}

pub(crate) fn select_url(table: &Url) -> Url {
    let mut url = table.clone();
    url.query_pairs_mut()
        .append_pair("select", "*")
        .append_pair("order", "data.desc");
    url
}

pub(crate) fn delete_url(table: &Url, id: i64) -> Url {
    let mut url = table.clone();
    url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
    url
}

async fn ensure_success(response: Response) -> Result<Response, MirrorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(MirrorError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl Mirror for RestMirror {
    async fn select_all(&self) -> Result<Vec<Transaction>, MirrorError> {
        let response = self
            .request(Method::GET, select_url(&self.table_url))
            .send()
            .await?;
        let rows: Vec<RemoteRow> = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| MirrorError::Malformed(e.to_string()))?;
        rows.into_iter().map(RemoteRow::normalize).collect()
    }

    async fn insert_one(&self, txn: &Transaction) -> Result<(), MirrorError> {
        let response = self
            .request(Method::POST, self.table_url.clone())
            .header("Prefer", "return=minimal")
            .json(&[RemoteInsert::from(txn)])
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), MirrorError> {
        let response = self
            .request(Method::DELETE, delete_url(&self.table_url, id))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}
