//! Helpers for reading proxy-aware request metadata.

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use http::{Extensions, HeaderMap, header::HOST, uri::Authority};

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Host name the request was addressed to, without port, falling back to `default` when the
/// header is missing.
pub fn request_host(headers: &HeaderMap, default: &str) -> String {
    headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(|host| match host.parse::<Authority>() {
            Ok(authority) => authority.host().to_string(),
            Err(_) => host.to_string(),
        })
        .unwrap_or_else(|| default.to_string())
}

/// Client IP: first `X-Forwarded-For` entry, else the peer address of the connection.
pub fn client_ip(headers: &HeaderMap, extensions: &Extensions) -> Option<String> {
    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());
    match forwarded {
        Some(ip) => Some(ip.to_string()),
        None => extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string()),
    }
}
