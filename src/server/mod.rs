// Server module entry
// Listening socket lifecycle, connection serving, and shutdown signals.

pub mod connection;
pub mod listener;
pub mod signal;

pub use connection::accept_connection;
pub use listener::bind_listener;
pub use signal::{start_signal_handler, ShutdownSignal};
