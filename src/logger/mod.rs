//! Logger module
//!
//! Startup and access lines go to stdout, warnings and errors to stderr.
//! Access lines are rendered in the layout picked by `LogFormat`.

mod format;

pub use format::{AccessLogEntry, LogFormat};

use crate::config::Config;
use std::net::SocketAddr;

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    println!("======================================");
    println!("Performance Report Analyzer started");
    println!("Listening on: http://{addr}");
    if let Some(workers) = config.workers {
        println!("Worker threads: {workers}");
    }
    if config.access_log {
        println!("Access log format: {}", config.access_log_format.name());
    } else {
        println!("Access log: disabled");
    }
    println!("======================================\n");
}

/// Write one rendered access log line.
pub fn log_access(entry: &AccessLogEntry, format: LogFormat) {
    println!("{}", entry.render(format));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

pub fn log_shutdown_signal(signal: &str) {
    println!("\n[Shutdown] {signal} received, shutting down gracefully");
}

pub fn log_shutdown_draining() {
    println!("[Shutdown] Listener closed, draining in-flight connections");
}

pub fn log_shutdown_complete() {
    println!("[Shutdown] All connections finished, exiting");
}
