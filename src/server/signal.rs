// Signal handling module
//
// SIGTERM and SIGINT request a graceful shutdown: the accept loop stops,
// in-flight connections get a grace period to finish, then the process
// exits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Shutdown coordination shared between the signal task and the accept
/// loop.
#[derive(Clone, Default)]
pub struct ShutdownSignal {
    notify: Arc<Notify>,
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve once shutdown has been requested.
    pub async fn notified(&self) {
        if self.is_requested() {
            return;
        }
        self.notify.notified().await;
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Mark shutdown as requested and wake the accept loop.
    ///
    /// `notify_one` stores a permit when nothing is waiting yet, so a
    /// request is never lost to the gap between the flag check in
    /// `notified` and parking on the `Notify`.
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }
}

/// Listen for termination signals in a background task (Unix).
#[cfg(unix)]
pub fn start_signal_handler(shutdown: ShutdownSignal) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => logger::log_shutdown_signal("SIGTERM"),
            _ = sigint.recv() => logger::log_shutdown_signal("SIGINT"),
        }

        shutdown.request();
    });
}

/// Windows fallback, Ctrl+C only.
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: ShutdownSignal) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            logger::log_shutdown_signal("Ctrl+C");
            shutdown.request();
        }
    });
}
