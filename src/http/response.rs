//! Outcome → HTTP response mapping.
//!
//! # Responsibilities
//! - Map every pipeline outcome to a status code and JSON body
//! - Attach `Access-Control-Allow-Origin` only for allow-listed origins
//! - Keep upstream detail out of response bodies
//!
//! # Design Decisions
//! - Status codes are decided here and nowhere else
//! - Error bodies are always `{"error": "<message>"}`

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::github::PullRequestResult;
use crate::orchestrator::UpstreamError;
use crate::security::{AccessGate, GateError};
use crate::submission::ValidationError;

/// Every way a submission request can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Origin not allowed")]
    OriginForbidden,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// Display is deliberately generic; the source carries the detail.
    #[error("Internal server error. Please try again later.")]
    Upstream(#[from] UpstreamError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::OriginForbidden => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "method-not-allowed",
            Self::OriginForbidden => "origin-forbidden",
            Self::Validation(e) => e.reason(),
            Self::RateLimited => "rate-limited",
            Self::Upstream(_) => "upstream-failure",
        }
    }
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::MethodNotAllowed(_) => Self::MethodNotAllowed,
            GateError::OriginForbidden(_) => Self::OriginForbidden,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Body of a successful submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionAccepted {
    pub success: bool,
    pub pull_request_number: u64,
    pub pull_request_url: String,
}

impl From<PullRequestResult> for SubmissionAccepted {
    fn from(pr: PullRequestResult) -> Self {
        Self {
            success: true,
            pull_request_number: pr.number,
            pull_request_url: pr.url,
        }
    }
}

/// Builds responses for one request, echoing its origin only if allow-listed.
#[derive(Debug, Clone)]
pub struct ResponseFormatter {
    cors_origin: Option<HeaderValue>,
}

impl ResponseFormatter {
    pub fn new(gate: &AccessGate, origin: Option<&str>) -> Self {
        let cors_origin = gate
            .cors_origin(origin)
            .and_then(|o| HeaderValue::from_str(o).ok());
        Self { cors_origin }
    }

    pub fn success(&self, pr: PullRequestResult) -> Response {
        self.finish((StatusCode::OK, Json(SubmissionAccepted::from(pr))).into_response())
    }

    pub fn error(&self, err: ApiError) -> Response {
        self.finish(err.into_response())
    }

    /// Empty 204 carrying the gate's preflight headers.
    pub fn preflight(&self, headers: HeaderMap) -> Response {
        (StatusCode::NO_CONTENT, headers).into_response()
    }

    fn finish(&self, mut response: Response) -> Response {
        if let Some(origin) = &self.cors_origin {
            let headers = response.headers_mut();
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
            headers.insert(header::VARY, HeaderValue::from_static("Origin"));
        }
        response
    }
}
