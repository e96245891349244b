//! HTTP client for the backend presign endpoint.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::time::Duration;
use url::Url;

use crate::config::BackendConfig;
use crate::http::request::MediaKey;
use crate::presign::types::{parse_presign_body, PresignError, PresignResult};
use crate::resilience::with_timeout;
use crate::signing::WorkerCredentials;

/// Path of the presign endpoint below the configured base URL.
pub const PRESIGN_PATH: &str = "/api/v1/file/presign-url";

pub const X_WORKER_TIMESTAMP: &str = "X-Worker-Timestamp";
pub const X_WORKER_SIGNATURE: &str = "X-Worker-Signature";
pub const X_WORKER_ID: &str = "X-Worker-Id";

/// Characters left as-is by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Exchanges a signed media key for a presigned origin URL.
#[async_trait]
pub trait Presigner: Send + Sync {
    async fn presign(
        &self,
        key: &MediaKey,
        credentials: &WorkerCredentials,
    ) -> Result<PresignResult, PresignError>;
}

/// Build `{endpoint}/api/v1/file/presign-url?key={key}`.
pub fn presign_url(endpoint: &str, key: &str) -> Result<Url, PresignError> {
    let raw = format!(
        "{}{}?key={}",
        endpoint.trim_end_matches('/'),
        PRESIGN_PATH,
        utf8_percent_encode(key, URI_COMPONENT)
    );
    Url::parse(&raw).map_err(|e| PresignError::InvalidEndpoint(format!("{}: {}", endpoint, e)))
}

/// `reqwest`-backed [`Presigner`].
#[derive(Debug, Clone)]
pub struct PresignClient {
    http: reqwest::Client,
    endpoint: String,
    worker_id: String,
    timeout: Duration,
}

impl PresignClient {
    pub fn new(config: &BackendConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: reqwest::Client, config: &BackendConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint.clone(),
            worker_id: config.worker_id.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[async_trait]
impl Presigner for PresignClient {
    async fn presign(
        &self,
        key: &MediaKey,
        credentials: &WorkerCredentials,
    ) -> Result<PresignResult, PresignError> {
        let url = presign_url(&self.endpoint, key.as_str())?;

        tracing::debug!(
            key = %key,
            timestamp = %credentials.timestamp,
            "Requesting presigned URL"
        );

        let exchange = async {
            let response = self
                .http
                .get(url)
                .header(X_WORKER_TIMESTAMP, credentials.timestamp.as_str())
                .header(X_WORKER_SIGNATURE, credentials.signature.as_str())
                .header(X_WORKER_ID, self.worker_id.as_str())
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(PresignError::UnexpectedStatus(status));
            }

            let body = response.bytes().await?;
            parse_presign_body(&body)
        };

        with_timeout(self.timeout, exchange)
            .await
            .map_err(|t| PresignError::Timeout(t.after))?
    }
}
