use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use tracing::warn;

/// Host a route group must be served from, e.g. the login endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpectedHost(String);

impl ExpectedHost {
    /// Accepts a bare host or a URL; the scheme is dropped.
    pub fn new(endpoint: &str) -> Self {
        let host = endpoint
            .strip_prefix("https://")
            .or_else(|| endpoint.strip_prefix("http://"))
            .unwrap_or(endpoint);
        Self(host.trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Host the client addressed: the `Host` header, else the URI authority.
pub fn request_host(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| req.uri().authority().map(|authority| authority.as_str()))
}

/// Rejects requests addressed to any other host with `400 Bad Request`.
pub async fn host_checker(
    State(expected): State<ExpectedHost>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let host = request_host(&req).unwrap_or_default();
    if !host.eq_ignore_ascii_case(expected.as_str()) {
        warn!("Request for host '{}' rejected, expected '{}'", host, expected.as_str());
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_host_strips_scheme() {
        assert_eq!(ExpectedHost::new("http://login.test.example.com").as_str(), "login.test.example.com");
        assert_eq!(ExpectedHost::new("https://login.fider.io/").as_str(), "login.fider.io");
        assert_eq!(ExpectedHost::new("login.fider.io:3000").as_str(), "login.fider.io:3000");
    }
}
