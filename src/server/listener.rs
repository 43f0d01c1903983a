// Listener module
// Binds the TCP listening socket with explicit socket options.

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Bind a non-blocking TCP listener on `addr`.
///
/// `SO_REUSEADDR` lets the process rebind its port right after a restart
/// instead of waiting out sockets stuck in TIME_WAIT. `SO_REUSEPORT` is
/// not set, so a second instance binding the same address fails with
/// `AddrInUse` rather than sharing the port with the first.
pub fn bind_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    socket.set_reuse_address(true)?;

    // Tokio expects the socket to already be non-blocking
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
