// src/store/http.rs

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ErrorResponse, StoreError};
use crate::store::{Fields, RecordStore, WireQuery};

/// Gateway to the hosted record store over HTTP. Every request carries the
/// session's bearer token; responses arrive in a `{"data": ...}` envelope.
pub struct HttpStore {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope {
    data: Value,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/tables/{}", self.base_url, table)
    }

    fn record_url(&self, table: &str, id: &str) -> String {
        format!("{}/tables/{}/{}", self.base_url, table, id)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<Value, StoreError> {
        let resp = req.bearer_auth(&self.api_token).send().await?;
        let status = resp.status();

        if status.is_success() {
            let envelope: DataEnvelope = resp.json().await?;
            return Ok(envelope.data);
        }

        match status {
            StatusCode::UNAUTHORIZED => Err(StoreError::Unauthorized),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound),
            _ => match resp.json::<ErrorResponse>().await {
                Ok(body) => Err(StoreError::Api {
                    code: body.error.code,
                    message: body.error.message,
                }),
                Err(_) => Err(StoreError::api(
                    "HTTP_ERROR",
                    format!("store returned {status}"),
                )),
            },
        }
    }
}

fn into_fields(value: Value) -> Result<Fields, StoreError> {
    match value {
        Value::Object(fields) => Ok(fields),
        _ => Err(StoreError::Envelope("expected a record object")),
    }
}

#[async_trait]
impl RecordStore for HttpStore {
    async fn fetch_records(
        &self,
        table: &str,
        query: &WireQuery,
    ) -> Result<Vec<Fields>, StoreError> {
        let url = format!("{}/query", self.table_url(table));
        let data = self.send(self.http.post(url).json(query)).await?;
        match data {
            Value::Array(items) => items.into_iter().map(into_fields).collect(),
            _ => Err(StoreError::Envelope("expected an array of records")),
        }
    }

    async fn get_record(&self, table: &str, id: &str) -> Result<Fields, StoreError> {
        let data = self.send(self.http.get(self.record_url(table, id))).await?;
        into_fields(data)
    }

    async fn create_record(&self, table: &str, fields: Fields) -> Result<Fields, StoreError> {
        let data = self
            .send(
                self.http
                    .post(self.table_url(table))
                    .json(&Value::Object(fields)),
            )
            .await?;
        into_fields(data)
    }

    async fn update_record(
        &self,
        table: &str,
        id: &str,
        fields: Fields,
    ) -> Result<Fields, StoreError> {
        let data = self
            .send(
                self.http
                    .patch(self.record_url(table, id))
                    .json(&Value::Object(fields)),
            )
            .await?;
        into_fields(data)
    }

    async fn delete_record(&self, table: &str, id: &str) -> Result<bool, StoreError> {
        let data = self
            .send(self.http.delete(self.record_url(table, id)))
            .await?;
        match data {
            Value::Bool(deleted) => Ok(deleted),
            _ => Err(StoreError::Envelope("expected a boolean delete result")),
        }
    }
}
