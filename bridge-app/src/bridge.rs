//! The bridge run loop.
//!
//! One loop owns the translation engine and both transports. Each
//! inbound event -- a feed text frame or a control datagram -- is handled
//! to completion, including its outbound sends, before the next one is
//! polled. Both inbound streams mutate the same translation state, so
//! this serialization is what keeps the change-only diffing sound.
//!
//! Outbound sends are fire-and-forget: a failed datagram or feed send is
//! logged at warn level and the loop moves on. The loop ends only when
//! the feed connection closes.

use std::net::SocketAddr;

use tracing::{debug, warn};

use srcpbridge_core::error::Result;
use srcpbridge_core::TranslationEngine;
use srcpbridge_transport::{FeedClient, SrcpEndpoint};

/// Receive buffer for control datagrams. Queries are short; 2 KiB is
/// generous headroom.
const RECV_BUF: usize = 2048;

/// The assembled bridge: engine plus both transports.
pub struct Bridge {
    engine: TranslationEngine,
    feed: FeedClient,
    endpoint: SrcpEndpoint,
    /// Fixed fan-out address for snapshot datagrams. Query replies go to
    /// the query's source address instead.
    snapshot_dest: SocketAddr,
}

impl Bridge {
    /// Assemble a bridge from an engine and two connected transports.
    pub fn new(
        engine: TranslationEngine,
        feed: FeedClient,
        endpoint: SrcpEndpoint,
        snapshot_dest: SocketAddr,
    ) -> Self {
        Self {
            engine,
            feed,
            endpoint,
            snapshot_dest,
        }
    }

    /// Drive the bridge until the feed connection closes.
    pub async fn run(self) -> Result<()> {
        let Bridge {
            mut engine,
            mut feed,
            endpoint,
            snapshot_dest,
        } = self;

        let mut buf = [0u8; RECV_BUF];

        loop {
            tokio::select! {
                frame = feed.next_text() => {
                    let Some(text) = frame? else {
                        // Server went away; the bridge is done.
                        return Ok(());
                    };
                    match engine.handle_feed_message(&text) {
                        Ok(Some(message)) => {
                            debug!(message = %message, "Broadcasting snapshot");
                            if let Err(e) = endpoint.send_to(&message, snapshot_dest).await {
                                warn!(error = %e, "Snapshot broadcast failed");
                            }
                        }
                        Ok(None) => {}
                        Err(e) => warn!(error = %e, "Dropping feed frame"),
                    }
                }

                received = endpoint.recv_from(&mut buf) => {
                    let (n, src) = match received {
                        Ok(ok) => ok,
                        Err(e) => {
                            warn!(error = %e, "Datagram receive failed");
                            continue;
                        }
                    };
                    let payload = String::from_utf8_lossy(&buf[..n]).into_owned();
                    debug!(payload = %payload, source = %src, "Control datagram");

                    let outcome = engine.handle_datagram(&payload);
                    if let Some(reply) = outcome.reply {
                        if let Err(e) = endpoint.send_to(&reply, src).await {
                            warn!(error = %e, remote = %src, "Reply send failed");
                        }
                    }
                    for command in outcome.upstream {
                        if let Err(e) = feed.send_command(&command).await {
                            warn!(error = %e, command = %command, "Feed forward failed");
                        }
                    }
                }
            }
        }
    }
}
