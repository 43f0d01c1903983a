// Route handlers module
// Every handler returns one canned JSON payload.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::response::json_response;
use super::types::{AnalyzeReceipt, ApiError, ServiceStatus};

/// Service banner served at `/`.
pub fn service_status() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &ServiceStatus {
            message: "Performance Report Analyzer is running on Vercel!",
        },
    )
}

/// Demo-mode acknowledgement served at `/api/analyze`.
///
/// The real parser and rule engine run in the upstream deployment; this
/// endpoint only confirms receipt and never touches the uploaded bytes.
pub fn analyze_receipt() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &AnalyzeReceipt {
            summary: "Demo mode: file received",
            issues: Vec::new(),
        },
    )
}

/// Fallback for paths outside the route table.
pub fn not_found() -> Response<Full<Bytes>> {
    json_response(StatusCode::NOT_FOUND, &ApiError { error: "Not found" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_analyze_receipt_reports_no_issues() {
        let response = analyze_receipt();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["summary"], "Demo mode: file received");
        assert_eq!(value["issues"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let response = not_found();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"error":"Not found"}"#);
    }
}
