//! Client identity extraction.
//!
//! # Responsibilities
//! - Derive the rate-limit identity of a caller from its connection
//! - Optionally trust one forwarding header set by the fronting proxy
//!
//! # Design Decisions
//! - Forwarding headers are ignored unless explicitly configured
//! - For list-valued headers (X-Forwarded-For) the first hop is the client

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Identity used when neither a trusted header nor a peer address is known.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Resolve the client identity for rate limiting.
pub fn client_identity(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trusted_header: Option<&str>,
) -> String {
    let forwarded = trusted_header
        .and_then(|name| headers.get(name))
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    match (forwarded, peer) {
        (Some(ip), _) => ip.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => UNKNOWN_CLIENT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("10.0.0.7:54321".parse().unwrap())
    }

    #[test]
    fn test_peer_address_by_default() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", HeaderValue::from_static("203.0.113.9"));
        assert_eq!(client_identity(&headers, peer(), None), "10.0.0.7");
    }

    #[test]
    fn test_trusted_header() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", HeaderValue::from_static("203.0.113.9"));
        assert_eq!(
            client_identity(&headers, peer(), Some("CF-Connecting-IP")),
            "203.0.113.9"
        );
    }

    #[test]
    fn test_forwarded_for_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static(" 198.51.100.4 , 10.0.0.1"),
        );
        assert_eq!(
            client_identity(&headers, peer(), Some("X-Forwarded-For")),
            "198.51.100.4"
        );
    }

    #[test]
    fn test_fallbacks() {
        let headers = HeaderMap::new();
        assert_eq!(client_identity(&headers, peer(), Some("CF-Connecting-IP")), "10.0.0.7");
        assert_eq!(client_identity(&headers, None, None), UNKNOWN_CLIENT);
    }
}
