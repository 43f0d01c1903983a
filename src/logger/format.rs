//! Access log format module
//!
//! Supports the usual access-line layouts:
//! - `common` (Common Log Format - CLF)
//! - `combined` (Apache/Nginx combined format)
//! - `json` (JSON structured logging)

use chrono::{DateTime, Local};
use serde::Deserialize;

/// Access log layout, selected by `SERVER_ACCESS_LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Common Log Format (CLF)
    #[default]
    Common,
    /// Common plus quoted referer and user-agent
    Combined,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    /// Lowercase name as it appears in the environment.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Combined => "combined",
            Self::Json => "json",
        }
    }
}

/// Access log entry containing all request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client address (IP:port)
    pub remote_addr: String,
    /// Request timestamp
    pub time: DateTime<Local>,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request URI path
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: &'static str,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
    /// Referer header
    pub referer: Option<String>,
    /// User-Agent header
    pub user_agent: Option<String>,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Render the entry in the given layout.
    pub fn render(&self, format: LogFormat) -> String {
        match format {
            LogFormat::Common => self.render_common(),
            LogFormat::Combined => self.render_combined(),
            LogFormat::Json => self.render_json(),
        }
    }

    /// Common Log Format (CLF)
    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn render_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    /// Combined format is the common format plus referer and user-agent.
    fn render_combined(&self) -> String {
        format!(
            "{} \"{}\" \"{}\"",
            self.render_common(),
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    /// JSON structured log format
    fn render_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Request line without the surrounding quotes:
    /// `$request_method $request_uri HTTP/$version`
    fn request_line(&self) -> String {
        let query = self
            .query
            .as_ref()
            .map(|q| format!("?{q}"))
            .unwrap_or_default();
        format!(
            "{} {}{} HTTP/{}",
            self.method, self.path, query, self.http_version
        )
    }
}
