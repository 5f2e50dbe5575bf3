//! WebSocket client for the FM-DX webserver text feed.
//!
//! The webserver publishes tuner-state snapshots as JSON text frames on
//! its `/text` WebSocket endpoint and accepts short command tokens
//! (`T<kHz>`, `F<index>`, `W<hz>`) on the same connection. [`FeedClient`]
//! wraps the connection with the line discipline the bridge needs: text
//! frames in, command tokens out, everything else ignored.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use srcpbridge_core::error::{Error, Result};

/// Build the feed URL for a `host:port` webserver address.
///
/// The text feed always lives at the `/text` path.
pub fn feed_url(host_port: &str) -> String {
    format!("ws://{host_port}/text")
}

/// WebSocket connection to the webserver's text feed.
pub struct FeedClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    url: String,
}

impl FeedClient {
    /// Connect to the feed at `url` (see [`feed_url`]).
    ///
    /// Fails fast when the webserver is unreachable -- connection setup
    /// is the one place where an error is fatal to the bridge.
    pub async fn connect(url: &str) -> Result<Self> {
        tracing::debug!(url = %url, "Connecting to feed");

        let (stream, _response) = connect_async(url).await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Feed connection failed");
            Error::Transport(e.to_string())
        })?;

        tracing::info!(url = %url, "Feed connection established");

        Ok(Self {
            stream,
            url: url.to_string(),
        })
    }

    /// The URL this client is connected to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Receive the next text frame from the feed.
    ///
    /// Returns `Ok(None)` when the server closes the connection. Ping,
    /// pong, and binary frames are skipped; the underlying stream answers
    /// pings on its own.
    pub async fn next_text(&mut self) -> Result<Option<String>> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!(url = %self.url, "Feed connection closed");
                    return Ok(None);
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(Error::Transport(e.to_string())),
            }
        }
    }

    /// Send one command token to the feed.
    pub async fn send_command(&mut self, command: &str) -> Result<()> {
        tracing::trace!(url = %self.url, command = %command, "Forwarding command to feed");

        self.stream
            .send(Message::Text(command.to_string()))
            .await
            .map_err(|e| Error::Transport(e.to_string()))
    }
}
