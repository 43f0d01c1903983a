use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

mod api;
mod config;
mod logger;
mod server;

use crate::config::AppState;
use crate::server::ShutdownSignal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.workers {
        // Tokio requires at least one worker thread
        runtime_builder.worker_threads(workers.max(1));
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let listener = server::bind_listener(addr)?;

    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(AppState::new(cfg));
    let active_connections = Arc::new(AtomicUsize::new(0));

    let shutdown = ShutdownSignal::new();
    server::start_signal_handler(shutdown.clone());

    run_accept_loop(listener, &state, &active_connections, &shutdown).await;

    // The listener is dropped once the loop exits, so nothing new is
    // accepted while in-flight connections drain.
    drain_connections(&active_connections).await;
    Ok(())
}

/// Accept connections until shutdown is requested.
async fn run_accept_loop(
    listener: TcpListener,
    state: &Arc<AppState>,
    active_connections: &Arc<AtomicUsize>,
    shutdown: &ShutdownSignal,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        server::accept_connection(stream, peer_addr, state, active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                logger::log_shutdown_draining();
                break;
            }
        }
    }
}

/// Wait up to a fixed grace period for in-flight connections to finish.
async fn drain_connections(active_connections: &Arc<AtomicUsize>) {
    const GRACE: Duration = Duration::from_secs(5);
    let deadline = tokio::time::Instant::now() + GRACE;

    while active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown grace period elapsed with {} connection(s) still open",
                active_connections.load(Ordering::SeqCst)
            ));
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    logger::log_shutdown_complete();
}
