//! The stateful translation engine.
//!
//! [`TranslationEngine`] composes the snapshot encoder, the command
//! translator, the bandwidth profile, and the translation state into the
//! two entry points the transport layer drives:
//!
//! - [`handle_feed_message`](TranslationEngine::handle_feed_message) for
//!   inbound feed text frames (feed -> datagram direction), and
//! - [`handle_datagram`](TranslationEngine::handle_datagram) for inbound
//!   control datagrams (datagram -> feed direction).
//!
//! The engine performs no I/O itself. The caller owns the sockets and is
//! responsible for serializing calls: one inbound event is handled to
//! completion, including its outbound sends, before the next one.

use tracing::debug;

use crate::command::{translate_datagram, CommandOutcome};
use crate::error::Result;
use crate::profile::ReceiverProfile;
use crate::snapshot::{encode_snapshot, TunerSnapshot};
use crate::state::TranslationState;

/// Stateful translator between the feed and datagram protocols.
#[derive(Debug)]
pub struct TranslationEngine {
    profile: ReceiverProfile,
    state: TranslationState,
}

impl TranslationEngine {
    /// Create an engine for the given receiver profile with fresh state.
    pub fn new(profile: ReceiverProfile) -> Self {
        Self {
            profile,
            state: TranslationState::new(),
        }
    }

    /// The receiver profile this engine was built with.
    pub fn profile(&self) -> ReceiverProfile {
        self.profile
    }

    /// Handle one inbound feed text frame.
    ///
    /// A frame byte-identical to the previous one is dropped before
    /// parsing -- the webserver re-broadcasts the full state on a timer,
    /// and replaying it must not produce datagram traffic. Returns the
    /// change-only datagram to broadcast, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Feed`](crate::Error::Feed) when the frame is not
    /// a valid snapshot document. Translation state is unchanged apart
    /// from the duplicate-frame record; the caller reports the error and
    /// moves on to the next frame.
    pub fn handle_feed_message(&mut self, raw: &str) -> Result<Option<String>> {
        if raw == self.state.last_feed_message {
            debug!("duplicate feed frame dropped");
            return Ok(None);
        }
        self.state.last_feed_message = raw.to_string();

        let snapshot: TunerSnapshot = serde_json::from_str(raw)?;
        Ok(encode_snapshot(&snapshot, &mut self.state, self.profile))
    }

    /// Handle one inbound control datagram.
    ///
    /// Returns the reply for the datagram's source address and the
    /// commands to forward to the feed, both optional and already
    /// de-duplicated.
    pub fn handle_datagram(&mut self, payload: &str) -> CommandOutcome {
        translate_datagram(payload, &mut self.state, self.profile)
    }
}
