//! Range-aware GET against presigned origin URLs.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use futures_util::StreamExt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::cache::EdgeCacheMode;
use crate::config::OriginConfig;
use crate::resilience::with_timeout;

/// Most origin error-body bytes quoted back to the client.
pub const ERROR_BODY_LIMIT: usize = 4096;

/// What to ask the origin for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginRequest {
    /// Client `Range` header, forwarded verbatim.
    pub range: Option<HeaderValue>,
    pub edge_cache: EdgeCacheMode,
}

/// Origin answer with the body still unread.
#[derive(Debug)]
pub struct OriginResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Body,
}

impl OriginResponse {
    /// Up to `limit` bytes of the body as lossy UTF-8. Read errors end the text early.
    pub async fn text_lossy(self, limit: usize) -> String {
        let mut stream = self.body.into_data_stream();
        let mut buf = Vec::new();

        while buf.len() < limit {
            match stream.next().await {
                Some(Ok(chunk)) => {
                    let take = chunk.len().min(limit - buf.len());
                    buf.extend_from_slice(&chunk[..take]);
                }
                Some(Err(e)) => {
                    tracing::debug!(error = %e, "Origin error body truncated");
                    break;
                }
                None => break,
            }
        }

        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Errors that can occur before origin response headers arrive.
#[derive(Debug, Error)]
pub enum OriginError {
    /// The presigned URL is stripped so it never reaches logs or clients.
    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    #[error("origin did not respond within {0:?}")]
    Timeout(Duration),
}

/// Performs the origin GET for the pipeline.
#[async_trait]
pub trait OriginFetcher: Send + Sync {
    async fn fetch(&self, url: &Url, request: OriginRequest) -> Result<OriginResponse, OriginError>;
}

/// `reqwest`-backed fetcher.
///
/// There is no cache inside this transport, so [`EdgeCacheMode::Bypass`] is
/// expressed to any intermediary as `Cache-Control: no-cache` on the outbound
/// request, and [`EdgeCacheMode::CacheFor`] leaves the request untouched.
#[derive(Debug, Clone)]
pub struct HttpOriginFetcher {
    http: reqwest::Client,
    response_timeout: Duration,
}

impl HttpOriginFetcher {
    pub fn new(config: &OriginConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .build()?;

        Ok(Self::with_client(
            http,
            Duration::from_secs(config.response_timeout_secs),
        ))
    }

    pub fn with_client(http: reqwest::Client, response_timeout: Duration) -> Self {
        Self {
            http,
            response_timeout,
        }
    }
}

#[async_trait]
impl OriginFetcher for HttpOriginFetcher {
    async fn fetch(&self, url: &Url, request: OriginRequest) -> Result<OriginResponse, OriginError> {
        let mut builder = self.http.get(url.clone());
        if let Some(range) = request.range {
            builder = builder.header(header::RANGE, range);
        }
        if request.edge_cache == EdgeCacheMode::Bypass {
            builder = builder.header(header::CACHE_CONTROL, "no-cache");
        }

        tracing::debug!(
            host = url.host_str().unwrap_or(""),
            edge_cache = ?request.edge_cache,
            "Fetching from origin"
        );

        let response = with_timeout(self.response_timeout, builder.send())
            .await
            .map_err(|t| OriginError::Timeout(t.after))?
            .map_err(|e| OriginError::Transport(e.without_url()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = Body::from_stream(response.bytes_stream());

        Ok(OriginResponse {
            status,
            headers,
            body,
        })
    }
}
