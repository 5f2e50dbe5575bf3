//! Inbound feed snapshot schema and change-only datagram encoding.
//!
//! The webserver feed delivers whole JSON documents describing current
//! tuner and RDS state. Every field is optional, and the server is loose
//! about number formatting -- `freq` and the signal level arrive as JSON
//! numbers or as quoted strings depending on the server version, so the
//! numeric fields deserialize tolerantly.
//!
//! [`encode_snapshot`] turns one decoded snapshot into at most one SRCP
//! datagram, emitting only the fields whose wire encoding differs from
//! what was last broadcast. The field order and hex casing below are part
//! of the wire format expected by legacy SRCP clients.

use serde::{Deserialize, Deserializer};

use crate::charset::{radiotext_to_hex, text_to_hex};
use crate::profile::ReceiverProfile;
use crate::state::TranslationState;

/// Source marker prefixed to every snapshot datagram.
pub const SOURCE_ID: &str = "FMDX-Webserver";

/// Fixed width of the hex-encoded alternate-frequency list.
const AF_HEX_LEN: usize = 50;

/// One decoded tuner-state snapshot from the feed.
///
/// Absent and present-but-zero fields are distinguished throughout; a
/// snapshot carrying `"freq": 0` is a real retune to 0 Hz, not a gap.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TunerSnapshot {
    /// Tuner frequency in MHz.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub freq: Option<f64>,
    /// IF bandwidth, hertz (TEF) or filter index (XDR, values below 16).
    #[serde(default, deserialize_with = "lenient_u32")]
    pub bw: Option<u32>,
    /// Signal level in dB. Preferred over `signal` when both are present.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sig: Option<f64>,
    /// Signal level in dB, older server versions.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub signal: Option<f64>,
    /// RDS PI code as a hex string. `"?"` means not yet decoded.
    #[serde(default)]
    pub pi: Option<String>,
    /// RDS PS name, plain text.
    #[serde(default)]
    pub ps: Option<String>,
    /// RDS alternate frequencies in kHz.
    #[serde(default)]
    pub af: Option<Vec<i64>>,
    /// RDS programme type code.
    #[serde(default)]
    pub pty: Option<u8>,
    /// RDS radio text, first row.
    #[serde(default)]
    pub rt0: Option<String>,
    /// RDS radio text, second row.
    #[serde(default)]
    pub rt1: Option<String>,
    /// RDS extended country code. Zero is treated as not decoded.
    #[serde(default)]
    pub ecc: Option<u8>,
}

/// Accept a JSON number or a numeric string; anything else becomes `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// As [`lenient_f64`], truncated to an unsigned integer.
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?.map(|n| n as u32))
}

/// Encode one snapshot into a change-only SRCP datagram.
///
/// Each field is diffed independently against `state` and appended only
/// if its wire encoding changed; `state` is updated for every field
/// actually emitted. Returns `None` when nothing beyond the fixed
/// `from=` marker would be sent.
///
/// A frequency change invalidates station identity: `last_pi`,
/// `last_pty`, and `last_ecc` are reset so those fields re-emit on the
/// next snapshot even if numerically unchanged.
pub fn encode_snapshot(
    snapshot: &TunerSnapshot,
    state: &mut TranslationState,
    profile: ReceiverProfile,
) -> Option<String> {
    let mut parts = vec![format!("from={SOURCE_ID}")];

    if let Some(mhz) = snapshot.freq {
        let hz = (mhz * 1_000_000.0).round() as u64;
        state.current_freq = hz;
        if state.last_sent_freq != Some(hz) {
            parts.push(format!("Freq={hz}"));
            state.last_sent_freq = Some(hz);
            // New frequency, new station: force PI/PTY/ECC to re-emit.
            state.last_pi.clear();
            state.last_pty.clear();
            state.last_ecc.clear();
        }
    }

    if let Some(raw) = snapshot.bw {
        let hz = profile.resolve_bandwidth(raw);
        state.current_bandwidth = hz;
        if state.last_sent_bandwidth != Some(hz) {
            parts.push(format!("bandwidth={hz}"));
            state.last_sent_bandwidth = Some(hz);
        }
    }

    // Signal level is live data, not diffed: every snapshot carries it.
    let level = snapshot.sig.or(snapshot.signal).unwrap_or(0.0);
    parts.push(format!("RcvLevel={}", level.round() as i64));

    if let Some(pi) = &snapshot.pi {
        if *pi != state.last_pi && pi != "?" {
            parts.push(format!("pi={}", pi.to_uppercase()));
            state.last_pi = pi.clone();
        }
    }

    let hex_ps = text_to_hex(snapshot.ps.as_deref().unwrap_or("")).to_ascii_uppercase();
    if hex_ps != state.last_ps {
        parts.push(format!("ps={hex_ps}"));
        state.last_ps = hex_ps;
    }

    if let Some(af) = &snapshot.af {
        let hex_af = encode_af(af);
        if hex_af != state.last_af {
            parts.push(format!("af={hex_af}"));
            state.last_af = hex_af;
        }
    }

    let hex_pty = format!("{:02x}", snapshot.pty.unwrap_or(0));
    if hex_pty != state.last_pty {
        parts.push(format!("pty={hex_pty}"));
        state.last_pty = hex_pty;
    }

    // Radio-text rows map to the off-by-one SRCP keys rt1/rt2; legacy
    // clients number the rows from one.
    let hex_rt0 = radiotext_to_hex(snapshot.rt0.as_deref().unwrap_or(""));
    if hex_rt0 != state.last_rt0 {
        parts.push(format!("rt1={hex_rt0}"));
        state.last_rt0 = hex_rt0;
    }

    let hex_rt1 = radiotext_to_hex(snapshot.rt1.as_deref().unwrap_or(""));
    if hex_rt1 != state.last_rt1 {
        parts.push(format!("rt2={hex_rt1}"));
        state.last_rt1 = hex_rt1;
    }

    if let Some(ecc) = snapshot.ecc.filter(|&e| e != 0) {
        let hex_ecc = format!("{ecc:02x}");
        if hex_ecc != state.last_ecc {
            parts.push(format!("ecc={hex_ecc}"));
            state.last_ecc = hex_ecc;
        }
    }

    if parts.len() == 1 {
        // Nothing beyond the marker: suppress the datagram entirely.
        return None;
    }

    Some(parts.join(";"))
}

/// Encode the AF list as a fixed-width hex string.
///
/// Each entry is reduced to its 100 kHz offset from 87.5 MHz and encoded
/// as one byte of hex, uppercased. The list is truncated at 25 entries
/// and zero-padded so the result is always exactly 50 characters.
fn encode_af(af: &[i64]) -> String {
    let mut out = String::with_capacity(AF_HEX_LEN);
    for &khz in af.iter().take(AF_HEX_LEN / 2) {
        out.push_str(&format!("{:02X}", (khz / 100 - 875) as u8));
    }
    while out.len() < AF_HEX_LEN {
        out.push_str("00");
    }
    out
}
