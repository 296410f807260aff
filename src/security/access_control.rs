//! Method and origin gating for the submission endpoint.

use std::collections::HashSet;

use axum::http::{header, HeaderMap, HeaderValue, Method};
use thiserror::Error;

use crate::config::CorsConfig;

/// Methods advertised in preflight responses.
pub const ALLOWED_METHODS: &str = "POST, OPTIONS";

/// Request headers advertised in preflight responses.
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// Why the gate turned a request away.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("method {0} not allowed")]
    MethodNotAllowed(Method),

    #[error("origin {0:?} not allowed")]
    OriginForbidden(Option<String>),
}

/// What the gate decided for an admitted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// OPTIONS from an allowed origin: answer with preflight headers and stop.
    Preflight { origin: String },
    /// POST from an allowed origin: run the submission pipeline.
    Submit { origin: String },
}

/// Allow-list backed access gate.
#[derive(Debug, Clone)]
pub struct AccessGate {
    allowed_origins: HashSet<String>,
    max_age_secs: u64,
}

impl AccessGate {
    pub fn new(config: &CorsConfig) -> Self {
        let allowed_origins = config
            .allowed_origins
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect::<HashSet<_>>();

        if allowed_origins.is_empty() {
            tracing::warn!("Origin allow-list is empty, every submission will be rejected");
        }

        Self {
            allowed_origins,
            max_age_secs: config.max_age_secs,
        }
    }

    /// Exact-match lookup; a missing origin is never allowed.
    pub fn is_allowed_origin(&self, origin: Option<&str>) -> bool {
        origin.is_some_and(|o| self.allowed_origins.contains(o))
    }

    /// The origin to echo in `Access-Control-Allow-Origin`, if any.
    pub fn cors_origin<'a>(&self, origin: Option<&'a str>) -> Option<&'a str> {
        origin.filter(|o| self.allowed_origins.contains(*o))
    }

    /// Decide on a request from its method and `Origin` header.
    ///
    /// OPTIONS is checked first, then the method, then the origin.
    pub fn admit(&self, method: &Method, origin: Option<&str>) -> Result<Admission, GateError> {
        let preflight = *method == Method::OPTIONS;
        if !preflight && *method != Method::POST {
            return Err(GateError::MethodNotAllowed(method.clone()));
        }

        let origin = match self.cors_origin(origin) {
            Some(o) => o.to_string(),
            None => return Err(GateError::OriginForbidden(origin.map(String::from))),
        };

        if preflight {
            Ok(Admission::Preflight { origin })
        } else {
            Ok(Admission::Submit { origin })
        }
    }

    /// Headers of a successful preflight answer.
    pub fn preflight_headers(&self, origin: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(origin) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from(self.max_age_secs));
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "https://docs.example.org";

    fn gate() -> AccessGate {
        AccessGate::new(&CorsConfig {
            allowed_origins: vec![format!(" {} ", SITE), String::new()],
            max_age_secs: 600,
        })
    }

    #[test]
    fn test_post_from_allowed_origin() {
        assert_eq!(
            gate().admit(&Method::POST, Some(SITE)),
            Ok(Admission::Submit { origin: SITE.to_string() })
        );
    }

    #[test]
    fn test_preflight() {
        assert_eq!(
            gate().admit(&Method::OPTIONS, Some(SITE)),
            Ok(Admission::Preflight { origin: SITE.to_string() })
        );
        assert_eq!(
            gate().admit(&Method::OPTIONS, Some("https://evil.example")),
            Err(GateError::OriginForbidden(Some("https://evil.example".to_string())))
        );
    }

    #[test]
    fn test_other_methods_rejected_before_origin() {
        assert_eq!(
            gate().admit(&Method::GET, None),
            Err(GateError::MethodNotAllowed(Method::GET))
        );
        assert_eq!(
            gate().admit(&Method::PUT, Some(SITE)),
            Err(GateError::MethodNotAllowed(Method::PUT))
        );
    }

    #[test]
    fn test_missing_or_unlisted_origin() {
        assert_eq!(gate().admit(&Method::POST, None), Err(GateError::OriginForbidden(None)));
        assert!(!gate().is_allowed_origin(Some("https://docs.example.org/")));
        assert!(!gate().is_allowed_origin(Some("")));
    }

    #[test]
    fn test_preflight_headers() {
        let headers = gate().preflight_headers(SITE);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], SITE);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], ALLOWED_HEADERS);
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "600");
    }

    #[test]
    fn test_cors_origin_never_echoes_unlisted() {
        assert_eq!(gate().cors_origin(Some(SITE)), Some(SITE));
        assert_eq!(gate().cors_origin(Some("https://other.example")), None);
        assert_eq!(gate().cors_origin(None), None);
    }
}
