//! Forwarded-header resolution for requests arriving through a proxy.
//!
//! The service runs behind load balancers that record the original client in
//! `X-Forwarded-For`, `X-Forwarded-Proto` and `X-Forwarded-Host`. The
//! middleware parses them once and stores a [`ForwardedInfo`] extension for
//! handlers and request logging.

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
pub const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// Client-facing view of a request as seen before the proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardedInfo {
    /// Originating client address (first `X-Forwarded-For` entry)
    pub client_ip: Option<String>,
    /// `http` or `https` as seen by the client
    pub scheme: Option<String>,
    /// Host the client addressed, falling back to `Host`
    pub host: Option<String>,
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim).filter(|v| !v.is_empty())
}

/// First entry of a comma-separated forwarding header.
fn first_entry(value: &str) -> Option<String> {
    value.split(',').map(str::trim).find(|s| !s.is_empty()).map(str::to_string)
}

impl ForwardedInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let client_ip = header_str(headers, X_FORWARDED_FOR).and_then(first_entry);
        let scheme = header_str(headers, X_FORWARDED_PROTO)
            .and_then(first_entry)
            .map(|s| s.to_ascii_lowercase());
        let host = header_str(headers, X_FORWARDED_HOST)
            .and_then(first_entry)
            .or_else(|| header_str(headers, header::HOST.as_str()).map(str::to_string));

        Self { client_ip, scheme, host }
    }
}

/// Attach [`ForwardedInfo`] to every request.
pub async fn forwarded_headers(mut request: Request, next: Next) -> Response {
    let info = ForwardedInfo::from_headers(request.headers());
    request.extensions_mut().insert(info);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarded_for_takes_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, "203.0.113.7, 10.0.0.1, 10.0.0.2".parse().unwrap());
        headers.insert(X_FORWARDED_PROTO, "HTTPS".parse().unwrap());
        headers.insert(X_FORWARDED_HOST, "api.example.com".parse().unwrap());

        let info = ForwardedInfo::from_headers(&headers);
        assert_eq!(info.client_ip.as_deref(), Some("203.0.113.7"));
        assert_eq!(info.scheme.as_deref(), Some("https"));
        assert_eq!(info.host.as_deref(), Some("api.example.com"));
    }

    #[test]
    fn test_host_falls_back_to_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "internal:8080".parse().unwrap());

        let info = ForwardedInfo::from_headers(&headers);
        assert_eq!(info.client_ip, None);
        assert_eq!(info.scheme, None);
        assert_eq!(info.host.as_deref(), Some("internal:8080"));
    }

    #[test]
    fn test_empty_headers_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, " , ".parse().unwrap());

        assert_eq!(ForwardedInfo::from_headers(&headers), ForwardedInfo::default());
    }
}
