//! Datagram transport to the race server.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::{UdpSocket, lookup_host};
use tracing::{debug, warn};

use crate::ClientError;

/// One request/response channel to the server.
///
/// `recv` returns `Ok(None)` when nothing arrives within `timeout`.
#[async_trait]
pub trait DatagramTransport: Send {
    async fn send(&mut self, payload: &[u8]) -> io::Result<()>;

    async fn recv(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<Option<usize>>;
}

/// UDP transport bound to an ephemeral local port.
///
/// The socket stays unconnected so that ICMP port-unreachable replies
/// while the server is still starting do not surface as receive errors.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    server: SocketAddr,
}

impl UdpTransport {
    /// Resolve `host:port` and bind a local socket of the matching family.
    pub async fn connect(host: &str, port: u16) -> Result<Self, ClientError> {
        let target = format!("{host}:{port}");
        let server = lookup_host(target.as_str())
            .await
            .map_err(|e| ClientError::Resolve(format!("{target}: {e}")))?
            .next()
            .ok_or_else(|| ClientError::Resolve(format!("{target}: no addresses")))?;

        let local: SocketAddr = if server.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let socket = UdpSocket::bind(local).await?;
        debug!(server = %server, local = ?socket.local_addr().ok(), "UDP transport ready");

        Ok(Self { socket, server })
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

#[async_trait]
impl DatagramTransport for UdpTransport {
    async fn send(&mut self, payload: &[u8]) -> io::Result<()> {
        self.socket.send_to(payload, self.server).await?;
        Ok(())
    }

    /// Datagrams from any address other than the server are dropped; the
    /// timeout covers the whole wait, not each datagram.
    async fn recv(&mut self, buf: &mut [u8], timeout: Duration) -> io::Result<Option<usize>> {
        let server = self.server;
        let socket = &self.socket;
        let wait_for_server = async {
            loop {
                let (len, from) = socket.recv_from(buf).await?;
                if from == server {
                    return Ok::<_, io::Error>(len);
                }
                warn!(%from, %server, len, "Dropping datagram from unknown peer");
            }
        };

        match tokio::time::timeout(timeout, wait_for_server).await {
            Ok(received) => received.map(Some),
            Err(_elapsed) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[tokio::test]
    async fn test_udp_round_trip_on_loopback() -> TestResult {
        let server = UdpSocket::bind("127.0.0.1:0").await?;
        let port = server.local_addr()?.port();

        let mut transport = UdpTransport::connect("127.0.0.1", port).await?;
        transport.send(b"ping").await?;

        let mut buf = [0u8; 16];
        let (len, from) = server.recv_from(&mut buf).await?;
        assert_eq!(buf.get(..len), Some(&b"ping"[..]));
        server.send_to(b"pong", from).await?;

        let received = transport.recv(&mut buf, Duration::from_secs(2)).await?;
        assert_eq!(received, Some(4));
        assert_eq!(buf.get(..4), Some(&b"pong"[..]));
        Ok(())
    }

    #[tokio::test]
    async fn test_datagrams_from_other_peers_are_dropped() -> TestResult {
        let server = UdpSocket::bind("127.0.0.1:0").await?;
        let stranger = UdpSocket::bind("127.0.0.1:0").await?;
        let port = server.local_addr()?.port();

        let mut transport = UdpTransport::connect("127.0.0.1", port).await?;
        transport.send(b"SCR(init 0)").await?;

        let mut buf = [0u8; 32];
        let (_, client) = server.recv_from(&mut buf).await?;
        stranger.send_to(b"***shutdown***", client).await?;
        server.send_to(b"***identified***", client).await?;

        let received = transport.recv(&mut buf, Duration::from_secs(2)).await?;
        assert_eq!(received, Some(16));
        assert_eq!(buf.get(..16), Some(&b"***identified***"[..]));

        stranger.send_to(b"***shutdown***", client).await?;
        let received = transport.recv(&mut buf, Duration::from_millis(100)).await?;
        assert_eq!(received, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_recv_times_out_quietly() -> TestResult {
        let server = UdpSocket::bind("127.0.0.1:0").await?;
        let port = server.local_addr()?.port();

        let mut transport = UdpTransport::connect("127.0.0.1", port).await?;
        let mut buf = [0u8; 16];
        let received = transport.recv(&mut buf, Duration::from_millis(50)).await?;
        assert_eq!(received, None);
        Ok(())
    }
}
