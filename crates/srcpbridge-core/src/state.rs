//! The mutable last-sent/last-received record behind change-only output.
//!
//! [`TranslationState`] is the single mutable entity in the bridge. It is
//! owned exclusively by the engine and mutated only by the snapshot
//! encoder (feed -> datagram direction) and the command translator
//! (datagram -> feed direction), each to completion before the next
//! inbound event is handled.
//!
//! Invariant: every `last_*` field holds exactly what was last put on the
//! wire for that field (or decided for transmission), so a retried or
//! duplicate inbound message never produces duplicate outbound traffic.

/// Per-field memory of the last transmitted values.
///
/// `current_freq` / `current_bandwidth` track the tuner as the bridge
/// understands it right now; they answer `freq=?` / `bandwidth=?` queries.
/// They are distinct from `last_sent_*`: an inbound control command moves
/// `current_*` immediately, while `last_sent_*` only moves when a value is
/// actually broadcast, so the confirming feed snapshot still goes out to
/// datagram listeners.
#[derive(Debug, Default)]
pub struct TranslationState {
    /// Tuner frequency in hertz as last seen or commanded.
    pub current_freq: u64,
    /// IF bandwidth in hertz as last seen or commanded.
    pub current_bandwidth: u32,
    /// Frequency last broadcast in a snapshot datagram.
    pub last_sent_freq: Option<u64>,
    /// Bandwidth last broadcast in a snapshot datagram.
    pub last_sent_bandwidth: Option<u32>,
    /// RDS PI as received in the feed (broadcast uppercased).
    pub last_pi: String,
    /// Hex-encoded PS name as broadcast.
    pub last_ps: String,
    /// Hex-encoded radio text, first row (broadcast under key `rt1`).
    pub last_rt0: String,
    /// Hex-encoded radio text, second row (broadcast under key `rt2`).
    pub last_rt1: String,
    /// One-byte hex PTY as broadcast.
    pub last_pty: String,
    /// One-byte hex ECC as broadcast.
    pub last_ecc: String,
    /// Fixed-width hex AF list as broadcast. Always 50 chars once set.
    pub last_af: String,
    /// Last command forwarded to the feed, for de-duplication.
    pub last_upstream_command: String,
    /// Last raw feed message, byte-for-byte, for inbound de-duplication.
    pub last_feed_message: String,
}

impl TranslationState {
    /// Fresh state: all fields empty/zero. State is memory-only and
    /// resets on process start.
    pub fn new() -> Self {
        Self::default()
    }

    /// Upstream forwarding gate.
    ///
    /// Every command destined for the feed passes through here: a command
    /// equal to the last one forwarded is dropped, anything else is
    /// recorded and cleared for sending. Applies uniformly to frequency
    /// and bandwidth commands.
    pub fn gate_upstream(&mut self, command: &str) -> bool {
        if command == self.last_upstream_command {
            return false;
        }
        self.last_upstream_command = command.to_string();
        true
    }
}
