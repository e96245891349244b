//! The per-request state machine.
//!
//! # Responsibilities
//! - Turn an `EdgeRequest` into a streamed origin response or a terminal `EdgeError`
//! - Own the signer, presigner, fetcher and cache policy for the process lifetime
//! - Record presign latency and origin fetch outcomes
//!
//! # Design Decisions
//! - Collaborators sit behind `Arc<dyn ...>` so tests swap in fakes
//! - The key is validated before any signing or network call
//! - Origin error bodies are read only up to `ERROR_BODY_LIMIT`

use axum::response::Response;
use std::sync::Arc;
use std::time::Instant;

use crate::cache::{CachePolicyEngine, FetchKind};
use crate::config::EdgeConfig;
use crate::http::error::EdgeError;
use crate::http::request::{parse_media_key, EdgeRequest};
use crate::http::response::filter_forward_headers;
use crate::observability::metrics;
use crate::origin::{
    HttpOriginFetcher, OriginFetcher, OriginRequest, OriginResponse, ERROR_BODY_LIMIT,
};
use crate::presign::{PresignClient, Presigner};
use crate::signing::RequestSigner;

/// Classify → sign → presign → fetch → filter → cache policy → respond.
pub struct EdgePipeline {
    path_prefix: String,
    signer: RequestSigner,
    presigner: Arc<dyn Presigner>,
    fetcher: Arc<dyn OriginFetcher>,
    policy: CachePolicyEngine,
}

impl EdgePipeline {
    /// Pipeline talking to the configured backend and origins over HTTP.
    pub fn from_config(config: &EdgeConfig) -> Result<Self, reqwest::Error> {
        let presigner = Arc::new(PresignClient::new(&config.backend)?);
        let fetcher = Arc::new(HttpOriginFetcher::new(&config.origin)?);
        Ok(Self::new(config, presigner, fetcher))
    }

    pub fn new(
        config: &EdgeConfig,
        presigner: Arc<dyn Presigner>,
        fetcher: Arc<dyn OriginFetcher>,
    ) -> Self {
        Self {
            path_prefix: config.routing.path_prefix.clone(),
            signer: RequestSigner::new(config.backend.worker_secret.clone()),
            presigner,
            fetcher,
            policy: CachePolicyEngine::from_config(&config.cache),
        }
    }

    /// Serve one media request.
    ///
    /// Full fetches with a non-2xx origin status become
    /// [`EdgeError::OriginStatus`]; range fetches pass any origin status
    /// through with the range cache policy. The body is never buffered on
    /// success.
    pub async fn handle(&self, request: &EdgeRequest) -> Result<Response, EdgeError> {
        let key = parse_media_key(&request.path, &self.path_prefix)?;

        let credentials = self.signer.credentials(key.as_str());

        let started = Instant::now();
        let presigned = match self.presigner.presign(&key, &credentials).await {
            Ok(presigned) => {
                metrics::record_presign("ok", started);
                presigned
            }
            Err(e) => {
                metrics::record_presign(e.kind(), started);
                tracing::warn!(
                    request_id = %request.request_id,
                    key = %key,
                    kind = e.kind(),
                    error = %e,
                    "Presign failed"
                );
                return Err(e.into());
            }
        };

        let kind = request.kind();
        let policy = self.policy.policy_for(kind);

        tracing::debug!(
            request_id = %request.request_id,
            key = %key,
            kind = %kind,
            origin_host = presigned.url.host_str().unwrap_or(""),
            expires = ?presigned.expires,
            "Presigned URL obtained"
        );

        let origin = self
            .fetcher
            .fetch(
                &presigned.url,
                OriginRequest {
                    range: request.range.clone(),
                    edge_cache: policy.edge_cache,
                },
            )
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    request_id = %request.request_id,
                    key = %key,
                    error = %e,
                    "Origin fetch failed"
                );
            })?;

        metrics::record_origin_fetch(kind.as_str(), origin.status.as_u16());

        if kind == FetchKind::Full && !origin.status.is_success() {
            let status = origin.status;
            let body = origin.text_lossy(ERROR_BODY_LIMIT).await;
            tracing::warn!(
                request_id = %request.request_id,
                key = %key,
                status = %status,
                "Origin returned error for full fetch"
            );
            return Err(EdgeError::OriginStatus { status, body });
        }

        let OriginResponse {
            status,
            headers,
            body,
        } = origin;
        let headers = policy.apply(filter_forward_headers(&headers));

        let mut response = Response::new(body);
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}
