//! UDP endpoint for the SRCP datagram protocol.
//!
//! This module provides [`SrcpEndpoint`], the connectionless endpoint
//! legacy receiver-control clients talk to. One datagram carries one
//! message: inbound datagrams are `;`-separated control queries, outbound
//! datagrams are either replies (sent to the query's source address) or
//! change-only tuner snapshots (sent to the fixed fan-out address).
//!
//! Delivery is fire-and-forget -- SRCP has no acknowledgement protocol,
//! and a lost snapshot datagram is simply superseded by the next one.
//!
//! # Example
//!
//! ```no_run
//! use srcpbridge_transport::SrcpEndpoint;
//!
//! # async fn example() -> srcpbridge_core::Result<()> {
//! let endpoint = SrcpEndpoint::bind_port(8430).await?;
//!
//! let mut buf = [0u8; 2048];
//! let (n, src) = endpoint.recv_from(&mut buf).await?;
//! let query = String::from_utf8_lossy(&buf[..n]);
//! println!("{src} asked: {query}");
//! # Ok(())
//! # }
//! ```

use std::net::SocketAddr;

use tokio::net::UdpSocket;

use srcpbridge_core::error::{Error, Result};

/// Connectionless UDP endpoint for SRCP clients.
///
/// Wraps a [`tokio::net::UdpSocket`] with error mapping consistent with
/// the rest of the bridge. The endpoint owns no protocol state; it only
/// carries bytes for the translation engine.
#[derive(Debug)]
pub struct SrcpEndpoint {
    /// The underlying UDP socket.
    socket: UdpSocket,
    /// The local address the socket is bound to.
    local_addr: SocketAddr,
}

impl SrcpEndpoint {
    /// Bind to a local address.
    ///
    /// Use `"0.0.0.0:8430"` to serve the conventional SRCP port on all
    /// interfaces, or `"127.0.0.1:0"` for an ephemeral test socket.
    pub async fn bind(addr: &str) -> Result<Self> {
        tracing::debug!(addr = %addr, "Binding SRCP endpoint");

        let socket = UdpSocket::bind(addr).await.map_err(|e| {
            tracing::error!(addr = %addr, error = %e, "Failed to bind SRCP endpoint");
            Error::Io(e)
        })?;

        let local_addr = socket.local_addr().map_err(Error::Io)?;
        tracing::info!(local_addr = %local_addr, "SRCP endpoint ready");

        Ok(Self { socket, local_addr })
    }

    /// Bind to a specific port on all interfaces.
    ///
    /// Convenience method equivalent to `bind(&format!("0.0.0.0:{port}"))`.
    pub async fn bind_port(port: u16) -> Result<Self> {
        Self::bind(&format!("0.0.0.0:{port}")).await
    }

    /// Get the local address this endpoint is bound to.
    ///
    /// Useful when binding to port 0 to discover the assigned port.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Send one message as a single datagram to `addr`.
    ///
    /// UDP does not guarantee delivery or ordering, but each datagram is
    /// atomic -- it arrives in full or not at all. Callers treat failures
    /// as log-and-continue; nothing in the bridge retries a send.
    pub async fn send_to(&self, message: &str, addr: SocketAddr) -> Result<()> {
        tracing::trace!(
            local = %self.local_addr,
            remote = %addr,
            message = %message,
            "Sending datagram"
        );

        self.socket
            .send_to(message.as_bytes(), addr)
            .await
            .map_err(|e| {
                tracing::error!(
                    local = %self.local_addr,
                    remote = %addr,
                    error = %e,
                    "Failed to send datagram"
                );
                Error::Io(e)
            })?;

        Ok(())
    }

    /// Receive one datagram. Returns `(bytes_read, source_addr)`.
    ///
    /// Waits indefinitely; the caller multiplexes this against the feed
    /// in its select loop. The buffer should be large enough for a whole
    /// datagram -- control queries are short, 2048 bytes is generous.
    pub async fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr)> {
        let (n, src) = self.socket.recv_from(buf).await.map_err(|e| {
            tracing::error!(local = %self.local_addr, error = %e, "Failed to receive datagram");
            Error::Io(e)
        })?;

        tracing::trace!(
            local = %self.local_addr,
            remote = %src,
            bytes = n,
            "Received datagram"
        );

        Ok((n, src))
    }
}
