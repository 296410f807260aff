//! Request handlers.
//!
//! The submission pipeline runs in a fixed order:
//! access gate → rate check → body parse → validation → pull request →
//! rate record → response. Only a created pull request consumes quota.

use std::net::SocketAddr;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, Request};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::github::PullRequestResult;
use crate::http::response::{ApiError, ResponseFormatter};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::{client_identity, Admission};
use crate::submission::{SubmissionRequest, ValidationError};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness probe. Does not touch the repository host.
pub async fn health() -> impl IntoResponse {
    Json(HealthStatus {
        status: "operational",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Entry point for every request not matched by another route.
pub async fn submit(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();
    let origin = parts
        .headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok());
    let formatter = ResponseFormatter::new(&state.gate, origin);

    match state.gate.admit(&parts.method, origin) {
        Ok(Admission::Preflight { origin }) => {
            metrics::record_request("preflight", start);
            return formatter.preflight(state.gate.preflight_headers(&origin));
        }
        Ok(Admission::Submit { .. }) => {}
        Err(err) => {
            tracing::warn!(error = %err, "Request rejected by access gate");
            return reject(&formatter, err.into(), start);
        }
    }

    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_identity(&parts.headers, peer, state.client_ip_header.as_deref());

    match process(&state, &client, body).await {
        Ok(pr) => {
            tracing::info!(
                client = %client,
                pull_request = pr.number,
                url = %pr.url,
                "Suggestion accepted"
            );
            metrics::record_pull_request_created();
            metrics::record_request("created", start);
            formatter.success(pr)
        }
        Err(err) => {
            log_failure(&client, &err);
            reject(&formatter, err, start)
        }
    }
}

async fn process(state: &AppState, client: &str, body: Body) -> Result<PullRequestResult, ApiError> {
    if state.limiter.check(client).await {
        return Err(ApiError::RateLimited);
    }

    let bytes = axum::body::to_bytes(body, state.max_body_size)
        .await
        .map_err(|_| ValidationError::InvalidBody)?;
    let raw: SubmissionRequest =
        serde_json::from_slice(&bytes).map_err(|_| ValidationError::InvalidBody)?;

    let submission = state.validator.validate(raw)?;
    let pr = state.orchestrator.create_change(&submission).await?;

    state.limiter.record(client).await;
    Ok(pr)
}

fn log_failure(client: &str, err: &ApiError) {
    match err {
        ApiError::RateLimited => {
            metrics::record_rate_limited();
            tracing::warn!(client = %client, "Rate limit exceeded");
        }
        ApiError::Validation(e) => {
            tracing::info!(client = %client, reason = e.reason(), "Submission rejected");
        }
        ApiError::Upstream(e) => {
            metrics::record_upstream_failure(e.step.as_str());
            tracing::error!(
                client = %client,
                step = %e.step,
                branch = e.branch.as_deref().unwrap_or("-"),
                orphaned = e.orphaned_branch().is_some(),
                error = %e.source,
                "Pull request creation failed"
            );
        }
        ApiError::MethodNotAllowed | ApiError::OriginForbidden => {}
    }
}

fn reject(formatter: &ResponseFormatter, err: ApiError, start: Instant) -> Response {
    metrics::record_request(err.outcome(), start);
    formatter.error(err)
}
