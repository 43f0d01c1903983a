// Connection handling module
// Serves HTTP/1.1 on accepted TCP connections.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::api;
use crate::config::AppState;
use crate::logger;

/// Register an accepted connection and serve it.
///
/// The counter is incremented before the serving task starts and
/// decremented when the task finishes, so shutdown can observe in-flight
/// work.
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    conn_counter.fetch_add(1, Ordering::SeqCst);
    handle_connection(stream, peer_addr, Arc::clone(state), Arc::clone(conn_counter));
}

/// Serve HTTP/1.1 with keep-alive on the connection in a spawned task.
///
/// Requests on the same connection are handled sequentially by hyper;
/// separate connections run on separate tasks, scheduled across the
/// runtime's worker threads.
fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(true);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| api::handle_request(req, peer_addr, Arc::clone(&state))),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
