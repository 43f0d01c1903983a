// API response utility functions module

use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Build a JSON response with the given status.
///
/// Bodies are serialized compactly, matching what clients of earlier
/// deployments already parse. A serialization failure degrades to a fixed
/// 500 so the connection always receives well-formed JSON.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "application/json")
                .body(Full::new(Bytes::from(
                    r#"{"error":"Internal server error"}"#,
                )))
                .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Error"))));
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build response: {e}"));
            Response::new(Full::new(Bytes::from("Error")))
        })
}
