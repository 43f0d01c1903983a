// API response body types

use serde::Serialize;

/// Body served at `/`: confirms the service is up.
#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub message: &'static str,
}

/// Body served at `/api/analyze`.
///
/// The endpoint runs in demo mode: the upload is acknowledged but never
/// read, so `issues` is always empty. Kept as a list so clients see the
/// same shape a real analysis would produce.
#[derive(Debug, Serialize)]
pub struct AnalyzeReceipt {
    pub summary: &'static str,
    pub issues: Vec<serde_json::Value>,
}

/// Body for error responses.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: &'static str,
}
