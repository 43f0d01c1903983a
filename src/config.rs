//! Configuration module
//!
//! Configuration is assembled once at startup from environment variables
//! layered over built-in defaults. There is no config file and nothing is
//! reloaded at runtime.
//!
//! Two environment layers apply, later wins:
//! 1. `SERVER_*` prefixed variables (operator overrides)
//! 2. `PORT` (platform-assigned listen port)

use serde::Deserialize;
use std::net::SocketAddr;

use crate::logger::{self, LogFormat};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

type EnvVars = config::Map<String, String>;

/// Immutable server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bind address (`SERVER_HOST`)
    pub host: String,
    /// Listen port (`PORT`, `SERVER_PORT`)
    #[serde(deserialize_with = "de_port")]
    pub port: u16,
    /// Tokio worker threads (`SERVER_WORKERS`); runtime default when unset
    #[serde(default)]
    pub workers: Option<usize>,
    /// Whether to write access log lines (`SERVER_ACCESS_LOG`)
    pub access_log: bool,
    /// Access line layout (`SERVER_ACCESS_LOG_FORMAT`)
    pub access_log_format: LogFormat,
}

/// Deserialize a port through `i64` so out-of-range values are rejected
/// instead of wrapping.
fn de_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let port = i64::deserialize(deserializer)?;
    u16::try_from(port)
        .map_err(|_| serde::de::Error::custom(format!("port {port} out of range 0-65535")))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: None,
            access_log: true,
            access_log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Any unusable value (unparseable or out-of-range port, unknown log
    /// format) falls back to the built-in defaults rather than aborting
    /// startup, so the service still comes up on port 3000.
    pub fn load() -> Self {
        match Self::from_env(None, None) {
            Ok(config) => config,
            Err(e) => {
                logger::log_warning(&format!(
                    "Ignoring environment configuration ({e}); using defaults"
                ));
                Self::default()
            }
        }
    }

    /// Build configuration from explicit variable maps. A `None` map reads
    /// the corresponding variables from the process environment.
    fn from_env(
        server_vars: Option<EnvVars>,
        platform_vars: Option<EnvVars>,
    ) -> Result<Self, config::ConfigError> {
        // The platform layer carries exactly one variable. Collecting the
        // whole environment unprefixed would let unrelated variables (HOST,
        // USER, ...) leak into config fields.
        let platform_vars = platform_vars.unwrap_or_else(|| {
            std::env::var("PORT")
                .map(|port| EnvVars::from_iter([("PORT".to_owned(), port)]))
                .unwrap_or_default()
        });

        config::Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("access_log", true)?
            .set_default("access_log_format", LogFormat::default().name())?
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .source(server_vars)
                    .try_parsing(true),
            )
            .add_source(
                config::Environment::default()
                    .source(Some(platform_vars))
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Socket address to bind, combined from `host` and `port`.
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| format!("Invalid listen address {}:{} ({e})", self.host, self.port))
    }
}

/// Shared application state passed to every connection task.
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}
