// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Username subdomain routing.
//!
//! `alice.example.com/` is served as `/public/alice`. The rewrite must wrap
//! the whole router, because `Router::layer` runs after route matching.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, uri::PathAndQuery, Uri},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Subdomains that never name a user.
pub const RESERVED_SUBDOMAINS: [&str; 12] = [
    "www", "app", "api", "admin", "mail", "ftp", "blog", "shop", "store", "dev", "staging", "test",
];

/// Extract the username from a `Host` value, if it is a user subdomain.
///
/// Only a single label directly under `root_domain` qualifies, and reserved
/// names are skipped. Ports and letter case are ignored.
pub fn username_from_host(host: &str, root_domain: &str) -> Option<String> {
    let host = host.split(':').next().unwrap_or_default().to_ascii_lowercase();
    let root = root_domain.to_ascii_lowercase();

    let label = host.strip_suffix(&root)?.strip_suffix('.')?;
    if label.is_empty() || label.contains('.') || RESERVED_SUBDOMAINS.contains(&label) {
        return None;
    }
    Some(label.to_string())
}

/// Paths served as-is regardless of host.
fn is_passthrough_path(path: &str) -> bool {
    path.starts_with("/api/") || path == "/health" || path.starts_with("/public/") || path.contains('.')
}

/// Rewrite requests on a user subdomain to `/public/{username}`.
pub async fn rewrite_subdomain(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_passthrough_path(request.uri().path()) {
        return next.run(request).await;
    }

    let username = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| request.uri().host())
        .and_then(|host| username_from_host(host, &state.config.root_domain));

    if let Some(username) = username {
        match rewritten_uri(request.uri(), &username) {
            Some(uri) => {
                tracing::debug!(username = %username, uri = %uri, "Rewriting subdomain request");
                *request.uri_mut() = uri;
            }
            None => tracing::warn!(username = %username, "Could not rewrite subdomain request"),
        }
    }

    next.run(request).await
}

/// Same URI with the path replaced by `/public/{username}`, query preserved.
fn rewritten_uri(original: &Uri, username: &str) -> Option<Uri> {
    let path_and_query = match original.query() {
        Some(query) => format!("/public/{username}?{query}"),
        None => format!("/public/{username}"),
    };
    let path_and_query: PathAndQuery = path_and_query.parse().ok()?;

    let mut parts = original.clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    Uri::from_parts(parts).ok()
}
