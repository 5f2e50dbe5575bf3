//! Datagram control-query translation.
//!
//! SRCP clients send `;`-separated `key=value` queries in a single
//! datagram. Each query is handled independently and in order: state
//! queries produce reply segments, set commands move the bridge's notion
//! of tuner state and are forwarded to the feed as short command tokens
//! (`T<kHz>` to tune, `F<index>`/`W<hz>` for bandwidth, depending on the
//! profile).
//!
//! Queries that do not parse are silently ignored -- legacy clients probe
//! with all sorts of keys and expect no error traffic back.

use tracing::error;

use crate::profile::{closest_bandwidth, ReceiverProfile};
use crate::state::TranslationState;

/// Result of translating one inbound datagram.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Reply to send back to the query's source address, if any segment
    /// was produced. Segments are joined with `;` in query order.
    pub reply: Option<String>,
    /// Commands to forward to the feed, already de-duplicated against
    /// the last forwarded command, in order.
    pub upstream: Vec<String>,
}

/// Translate one inbound datagram payload.
///
/// The payload is split on `;`, trimmed, and empty segments dropped;
/// every surviving segment is handled as an independent query against
/// the shared state.
pub fn translate_datagram(
    payload: &str,
    state: &mut TranslationState,
    profile: ReceiverProfile,
) -> CommandOutcome {
    let mut reply_segments = Vec::new();
    let mut upstream = Vec::new();

    for query in payload.split(';').map(str::trim).filter(|q| !q.is_empty()) {
        if query == "freq=?" {
            reply_segments.push(format!("freq={}", state.current_freq));
        } else if query == "bandwidth=?" {
            reply_segments.push(format!("bandwidth={}", state.current_bandwidth));
        } else if let Some(value) = query.strip_prefix("freq=") {
            let Ok(hz) = value.parse::<u64>() else {
                continue;
            };
            state.current_freq = hz;
            reply_segments.push(query.to_string());
            let command = format!("T{}", hz as f64 / 1000.0);
            if state.gate_upstream(&command) {
                upstream.push(command);
            }
        } else if let Some(value) = query.strip_prefix("bandwidth=") {
            let Ok(raw) = value.parse::<u32>() else {
                continue;
            };
            let requested = profile.resolve_bandwidth(raw);
            match closest_bandwidth(profile.bandwidth_table(), requested) {
                Some(hz) if hz != state.current_bandwidth => {
                    // Remember the superseded value as last-broadcast so
                    // the confirming feed snapshot goes out to listeners.
                    state.last_sent_bandwidth = Some(state.current_bandwidth);
                    state.current_bandwidth = hz;
                    let command = profile.bandwidth_command(hz);
                    if state.gate_upstream(&command) {
                        upstream.push(command);
                    }
                }
                Some(_) => {}
                None => {
                    error!(
                        requested,
                        profile = %profile,
                        "no supported bandwidth for request"
                    );
                }
            }
        }
        // Anything else: not a query we understand, not an error either.
    }

    CommandOutcome {
        reply: (!reply_segments.is_empty()).then(|| reply_segments.join(";")),
        upstream,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_state() -> TranslationState {
        let mut state = TranslationState::new();
        state.current_freq = 95_500_000;
        state.current_bandwidth = 97_000;
        state
    }

    // ---------------------------------------------------------------
    // State queries
    // ---------------------------------------------------------------

    #[test]
    fn freq_query_replies_current() {
        let mut state = engine_state();
        let out = translate_datagram("freq=?", &mut state, ReceiverProfile::Tef);
        assert_eq!(out.reply.as_deref(), Some("freq=95500000"));
        assert!(out.upstream.is_empty());
    }

    #[test]
    fn bandwidth_query_replies_current() {
        let mut state = engine_state();
        let out = translate_datagram("bandwidth=?", &mut state, ReceiverProfile::Tef);
        assert_eq!(out.reply.as_deref(), Some("bandwidth=97000"));
    }

    #[test]
    fn combined_queries_keep_order() {
        let mut state = engine_state();
        let out = translate_datagram("freq=?;bandwidth=?", &mut state, ReceiverProfile::Tef);
        assert_eq!(out.reply.as_deref(), Some("freq=95500000;bandwidth=97000"));
    }

    #[test]
    fn whitespace_and_empty_segments_are_dropped() {
        let mut state = engine_state();
        let out = translate_datagram("; freq=? ;;", &mut state, ReceiverProfile::Tef);
        assert_eq!(out.reply.as_deref(), Some("freq=95500000"));
    }

    // ---------------------------------------------------------------
    // Frequency set
    // ---------------------------------------------------------------

    #[test]
    fn freq_set_echoes_and_forwards_khz() {
        let mut state = engine_state();
        let out = translate_datagram("freq=98100000", &mut state, ReceiverProfile::Tef);
        assert_eq!(out.reply.as_deref(), Some("freq=98100000"));
        assert_eq!(out.upstream, vec!["T98100".to_string()]);
        assert_eq!(state.current_freq, 98_100_000);
        // The broadcast diff state is untouched until the feed confirms.
        assert_eq!(state.last_sent_freq, None);
    }

    #[test]
    fn freq_set_fractional_khz() {
        let mut state = engine_state();
        let out = translate_datagram("freq=98100500", &mut state, ReceiverProfile::Tef);
        assert_eq!(out.upstream, vec!["T98100.5".to_string()]);
    }

    #[test]
    fn freq_set_with_garbage_value_is_ignored() {
        let mut state = engine_state();
        let out = translate_datagram("freq=oops", &mut state, ReceiverProfile::Tef);
        assert_eq!(out.reply, None);
        assert!(out.upstream.is_empty());
        assert_eq!(state.current_freq, 95_500_000);
    }

    // ---------------------------------------------------------------
    // Bandwidth set
    // ---------------------------------------------------------------

    #[test]
    fn bandwidth_set_quantizes_and_forwards_tef() {
        let mut state = engine_state();
        let out = translate_datagram("bandwidth=150000", &mut state, ReceiverProfile::Tef);
        // 150_000 resolves to 151_000 (nearest of 133_000 / 151_000).
        assert_eq!(out.reply, None);
        assert_eq!(out.upstream, vec!["W151000".to_string()]);
        assert_eq!(state.current_bandwidth, 151_000);
        assert_eq!(state.last_sent_bandwidth, Some(97_000));
    }

    #[test]
    fn bandwidth_set_forwards_index_on_xdr() {
        let mut state = engine_state();
        let out = translate_datagram("bandwidth=120000", &mut state, ReceiverProfile::Xdr);
        // Closest XDR filter to 120 kHz is 125 kHz, position 5 -> F4.
        assert_eq!(out.upstream, vec!["F4".to_string()]);
        assert_eq!(state.current_bandwidth, 125_000);
    }

    #[test]
    fn bandwidth_set_index_encoding_on_xdr() {
        let mut state = engine_state();
        // Values below 16 are filter indices even from the datagram side.
        let out = translate_datagram("bandwidth=4", &mut state, ReceiverProfile::Xdr);
        assert_eq!(out.upstream, vec!["F4".to_string()]);
        assert_eq!(state.current_bandwidth, 125_000);
    }

    #[test]
    fn bandwidth_set_matching_current_is_a_noop() {
        let mut state = engine_state();
        let out = translate_datagram("bandwidth=97000", &mut state, ReceiverProfile::Tef);
        assert_eq!(out.reply, None);
        assert!(out.upstream.is_empty());
        assert_eq!(state.last_sent_bandwidth, None);
    }

    // ---------------------------------------------------------------
    // De-duplication and unknowns
    // ---------------------------------------------------------------

    #[test]
    fn repeated_freq_set_forwards_once() {
        let mut state = engine_state();
        let first = translate_datagram("freq=98100000", &mut state, ReceiverProfile::Tef);
        assert_eq!(first.upstream.len(), 1);
        let second = translate_datagram("freq=98100000", &mut state, ReceiverProfile::Tef);
        // The echo reply still goes out; the upstream command does not.
        assert_eq!(second.reply.as_deref(), Some("freq=98100000"));
        assert!(second.upstream.is_empty());
    }

    #[test]
    fn unknown_queries_are_silent() {
        let mut state = engine_state();
        let out = translate_datagram("volume=5;mode=fm", &mut state, ReceiverProfile::Tef);
        assert_eq!(out, CommandOutcome::default());
    }

    #[test]
    fn mixed_datagram_replies_and_forwards() {
        let mut state = engine_state();
        let out = translate_datagram(
            "freq=?;freq=98100000;bandwidth=150000",
            &mut state,
            ReceiverProfile::Tef,
        );
        // freq=? answers with the value before the set lands in the same
        // datagram -- queries are handled strictly in order.
        assert_eq!(
            out.reply.as_deref(),
            Some("freq=95500000;freq=98100000")
        );
        assert_eq!(
            out.upstream,
            vec!["T98100".to_string(), "W151000".to_string()]
        );
    }
}
