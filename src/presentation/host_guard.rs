// Host header validation for non-debug deployments
use crate::infrastructure::http_response::error_response;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Reject requests whose Host is not allowed. Debug mode lets everything through.
pub async fn require_allowed_host(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if state.settings.debug {
        return next.run(request).await;
    }

    let host = request_host(&request).to_string();
    if host_allowed(&host, &state.settings.allowed_hosts) {
        next.run(request).await
    } else {
        tracing::warn!("Rejected request for disallowed host {:?}", host);
        error_response(StatusCode::BAD_REQUEST, "Invalid Host header")
    }
}

/// Host header, or the URI authority for HTTP/2 requests that carry `:authority` instead.
fn request_host(request: &Request) -> &str {
    request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| request.uri().authority().map(|a| a.as_str()))
        .unwrap_or_default()
}

/// `*` allows any host; `.example.com` allows the domain and its subdomains.
pub fn host_allowed(host: &str, allowed: &[String]) -> bool {
    let host = strip_port(host).to_ascii_lowercase();
    if host.is_empty() {
        return false;
    }

    allowed.iter().any(|pattern| {
        let pattern = pattern.to_ascii_lowercase();
        if pattern == "*" {
            true
        } else if let Some(domain) = pattern.strip_prefix('.') {
            host == domain || host.ends_with(&pattern)
        } else {
            host == pattern
        }
    })
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        // IPv6 literal
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}
