use async_trait::async_trait;
use billed_core::{Bill, BillSubmission};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};

use crate::{BillStore, ServiceError};

/// Async HTTP client implementation of BillStore.
/// Connects to a running bills API.
pub struct HttpBillStore {
    base_url: String,
    client: Client,
    api_key: Option<String>,
}

impl HttpBillStore {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
            api_key: None,
        }
    }

    pub fn with_api_key(base_url: &str, key: String) -> Self {
        Self {
            api_key: Some(key),
            ..Self::new(base_url)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("Authorization", format!("Bearer {key}")),
            None => builder,
        }
    }

    /// Multipart body for a submission. The client picks the content type
    /// so the boundary is set correctly.
    fn multipart(submission: &BillSubmission) -> Result<Form, ServiceError> {
        let file = submission.file();
        let part = Part::bytes(file.data.to_vec())
            .file_name(file.name.clone())
            .mime_str(submission.receipt_kind().mime_type())
            .map_err(|e| ServiceError::InvalidInput(format!("file part: {e}")))?;
        let form = submission
            .text_fields()
            .into_iter()
            .fold(Form::new().part("file", part), |form, (key, value)| {
                form.text(key, value)
            });
        Ok(form)
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Internal(format!("json decode: {e}")))
    } else {
        Err(parse_error_with_status(status, resp).await)
    }
}

async fn parse_error_with_status(status: StatusCode, resp: reqwest::Response) -> ServiceError {
    let body = resp.text().await.unwrap_or_default();
    let msg = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"].as_str().map(String::from))
        .unwrap_or(body);

    match status {
        StatusCode::NOT_FOUND => ServiceError::NotFound(msg),
        StatusCode::BAD_REQUEST => ServiceError::InvalidInput(msg),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceError::Unauthorized(msg),
        _ => ServiceError::Internal(msg),
    }
}

#[async_trait]
impl BillStore for HttpBillStore {
    async fn create(&self, submission: &BillSubmission) -> Result<Bill, ServiceError> {
        let form = Self::multipart(submission)?;
        let builder = self
            .client
            .post(format!("{}/bills", self.base_url))
            .multipart(form);
        let resp = self
            .with_auth(builder)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(format!("connection failed: {e}")))?;
        handle_response(resp).await
    }

    async fn list(&self) -> Result<Vec<Bill>, ServiceError> {
        let builder = self.client.get(format!("{}/bills", self.base_url));
        let resp = self
            .with_auth(builder)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(format!("connection failed: {e}")))?;
        handle_response(resp).await
    }
}
