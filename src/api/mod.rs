// API module entry
// Exact-path dispatch over the fixed route table

mod handlers;
mod response;
mod routes;
mod types;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::logger::{self, AccessLogEntry};

/// Dispatch one request to its route handler.
///
/// Only the path component of the request target picks the route; method,
/// query string, fragment, headers, and request body never influence the
/// outcome. The body is dropped unread. Unmatched paths get the fixed
/// not-found response.
#[allow(clippy::unused_async)]
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let target = req
        .uri()
        .path_and_query()
        .map_or(req.uri().path(), |pq| pq.as_str());

    let response = match routes::resolve(target) {
        Some(rule) => (rule.handler)(),
        None => handlers::not_found(),
    };

    if state.config.access_log {
        let entry = access_entry(&req, peer_addr, &response, started);
        logger::log_access(&entry, state.config.access_log_format);
    }

    Ok(response)
}

fn access_entry<B>(
    req: &Request<B>,
    peer_addr: SocketAddr,
    response: &Response<Full<Bytes>>,
    started: Instant,
) -> AccessLogEntry {
    AccessLogEntry {
        remote_addr: peer_addr.to_string(),
        time: chrono::Local::now(),
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        query: req.uri().query().map(ToString::to_string),
        http_version: version_label(req.version()),
        status: response.status().as_u16(),
        body_bytes: body_len(response),
        referer: header_value(req, "referer"),
        user_agent: header_value(req, "user-agent"),
        request_time_us: elapsed_micros(started),
    }
}

fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_11 => "1.1",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "?",
    }
}

fn header_value<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}

fn body_len(response: &Response<Full<Bytes>>) -> usize {
    use hyper::body::Body as _;
    let exact = response.body().size_hint().exact().unwrap_or(0);
    usize::try_from(exact).unwrap_or(usize::MAX)
}

fn elapsed_micros(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use hyper::{Method, StatusCode};
    use serde_json::{json, Value};

    fn state() -> Arc<AppState> {
        let config = Config {
            access_log: false,
            ..Config::default()
        };
        Arc::new(AppState::new(config))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:49152".parse().unwrap()
    }

    async fn dispatch(
        method: Method,
        target: &str,
        payload: &'static [u8],
    ) -> (StatusCode, String, Value) {
        let req = Request::builder()
            .method(method)
            .uri(target)
            .body(Full::new(Bytes::from_static(payload)))
            .unwrap();

        let response = handle_request(req, peer(), state()).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get("Content-Type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        (status, content_type, body)
    }

    #[tokio::test]
    async fn test_root_returns_service_banner() {
        let (status, content_type, body) = dispatch(Method::GET, "/", b"").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/json");
        assert_eq!(
            body,
            json!({"message": "Performance Report Analyzer is running on Vercel!"})
        );
    }

    #[tokio::test]
    async fn test_analyze_acknowledges_any_payload() {
        let (status, _, body) =
            dispatch(Method::POST, "/api/analyze", b"\x00\x01 not a jtl file").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"summary": "Demo mode: file received", "issues": []})
        );
    }

    #[tokio::test]
    async fn test_analyze_ignores_method_and_query() {
        for method in [Method::GET, Method::PUT, Method::DELETE, Method::HEAD] {
            let (status, _, body) =
                dispatch(method, "/api/analyze?file=report.jtl&tool=jmeter", b"").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(
                body,
                json!({"summary": "Demo mode: file received", "issues": []})
            );
        }
    }

    #[tokio::test]
    async fn test_root_with_query_routes_to_banner() {
        let (status, _, body) = dispatch(Method::GET, "/?debug=1", b"").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"message": "Performance Report Analyzer is running on Vercel!"})
        );
    }

    #[tokio::test]
    async fn test_unknown_paths_return_not_found() {
        for target in ["/missing", "/api", "/api/analyze/extra", "/api/analyze/"] {
            let (status, content_type, body) = dispatch(Method::GET, target, b"").await;
            assert_eq!(status, StatusCode::NOT_FOUND, "target: {target}");
            assert_eq!(content_type, "application/json");
            assert_eq!(body, json!({"error": "Not found"}));
        }
    }

    #[tokio::test]
    async fn test_method_does_not_rescue_unknown_path() {
        let (status, _, body) = dispatch(Method::POST, "/analyze", b"{}").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Not found"}));
    }

    #[test]
    fn test_access_entry_captures_request_line_fields() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/analyze?x=1")
            .header("user-agent", "curl/8.0")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let response = handlers::analyze_receipt();

        let entry = access_entry(&req, peer(), &response, Instant::now());
        assert_eq!(entry.remote_addr, "127.0.0.1:49152");
        assert_eq!(entry.method, "POST");
        assert_eq!(entry.path, "/api/analyze");
        assert_eq!(entry.query.as_deref(), Some("x=1"));
        assert_eq!(entry.status, 200);
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(entry.referer, None);
        assert!(entry.body_bytes > 0);
    }
}
