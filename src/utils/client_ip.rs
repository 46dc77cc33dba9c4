//! Client information extraction from HTTP request headers.

use axum::http::{HeaderMap, HeaderName};
use std::net::SocketAddr;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Determines the client IP address of a request.
///
/// When `behind_proxy` is `true`, the first entry of `X-Forwarded-For` is
/// used, then `X-Real-IP`, falling back to the socket peer address. Otherwise
/// proxy headers are ignored.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// let peer: SocketAddr = "10.0.0.1:5000".parse().unwrap();
/// assert_eq!(extract_client_ip(&headers, peer, true), "203.0.113.7");
/// assert_eq!(extract_client_ip(&headers, peer, false), "10.0.0.1");
/// ```
pub fn extract_client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        let forwarded = headers
            .get(X_FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded {
            return ip.to_string();
        }

        let real_ip = headers
            .get(X_REAL_IP)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = real_ip {
            return ip.to_string();
        }
    }

    peer.ip().to_string()
}

/// Returns a header value as a string, or an empty string if it is missing
/// or not valid UTF-8.
pub fn header_or_empty(headers: &HeaderMap, name: HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
