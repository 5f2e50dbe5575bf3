//! Receiver hardware profiles and bandwidth tables.
//!
//! Each supported receiver type is described by a [`ReceiverProfile`] that
//! selects a fixed table of IF filter bandwidths (in hertz) and the
//! command encoding the receiver's firmware expects for bandwidth changes.
//! The profile is selected once at startup and is immutable afterwards.
//!
//! | Profile | Filters | Bandwidth command | Inbound encoding      |
//! |---------|---------|-------------------|-----------------------|
//! | TEF     | 15 + 0  | `W<hz>` (direct)  | hertz                 |
//! | XDR     | 16 + 0  | `F<index>`        | table index below 16  |
//!
//! Both tables start with the sentinel value `0` (adaptive/auto filter).

use std::fmt;
use std::str::FromStr;

/// IF bandwidths supported by the TEF668x family, in hertz, ascending.
///
/// The leading `0` selects the adaptive filter.
pub const TEF_BANDWIDTHS: &[u32] = &[
    0, 56_000, 64_000, 72_000, 84_000, 97_000, 114_000, 133_000, 151_000, 184_000, 200_000,
    217_000, 236_000, 254_000, 287_000, 311_000,
];

/// IF bandwidths supported by the XDR-F1HD, in hertz, ascending.
pub const XDR_BANDWIDTHS: &[u32] = &[
    0, 55_000, 73_000, 90_000, 108_000, 125_000, 142_000, 159_000, 177_000, 194_000, 211_000,
    229_000, 246_000, 263_000, 281_000, 298_000, 309_000,
];

/// Inbound XDR bandwidth values below this limit are table indices,
/// not hertz. See [`ReceiverProfile::resolve_bandwidth`].
pub const XDR_INDEX_LIMIT: u32 = 16;

/// The receiver hardware behind the webserver feed.
///
/// Determines which bandwidth table is in effect and how bandwidth-change
/// commands are encoded on the feed side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiverProfile {
    /// TEF668x-based receivers (the FM-DX webserver default).
    Tef,
    /// Sony XDR-F1HD running the XDR-GTK modification.
    Xdr,
}

impl ReceiverProfile {
    /// The bandwidth table for this profile. Never empty.
    pub fn bandwidth_table(&self) -> &'static [u32] {
        match self {
            ReceiverProfile::Tef => TEF_BANDWIDTHS,
            ReceiverProfile::Xdr => XDR_BANDWIDTHS,
        }
    }

    /// Normalize a raw inbound bandwidth value to hertz.
    ///
    /// The XDR firmware reports the IF filter as a table index rather than
    /// a hertz value when it is below [`XDR_INDEX_LIMIT`]; the index is
    /// offset by one because of the leading `0` sentinel. This remap must
    /// run before any diffing or closest-match logic. TEF values are
    /// already in hertz and pass through unchanged.
    pub fn resolve_bandwidth(&self, raw: u32) -> u32 {
        match self {
            ReceiverProfile::Xdr if raw < XDR_INDEX_LIMIT => {
                XDR_BANDWIDTHS[(raw + 1) as usize]
            }
            _ => raw,
        }
    }

    /// Encode a bandwidth-change command for the feed side.
    ///
    /// `hz` must be an entry of this profile's table (use
    /// [`closest_bandwidth`] first). XDR expects the filter's zero-based
    /// position among the real filters (`F-1` selects the adaptive
    /// filter); TEF takes the value directly.
    pub fn bandwidth_command(&self, hz: u32) -> String {
        match self {
            ReceiverProfile::Xdr => {
                let pos = XDR_BANDWIDTHS.iter().position(|&bw| bw == hz).unwrap_or(0);
                format!("F{}", pos as i64 - 1)
            }
            ReceiverProfile::Tef => format!("W{hz}"),
        }
    }
}

impl fmt::Display for ReceiverProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReceiverProfile::Tef => "TEF",
            ReceiverProfile::Xdr => "XDR",
        };
        write!(f, "{s}")
    }
}

/// Error returned when a string cannot be parsed into a [`ReceiverProfile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProfileError(String);

impl fmt::Display for ParseProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown receiver profile: {}", self.0)
    }
}

impl std::error::Error for ParseProfileError {}

impl FromStr for ReceiverProfile {
    type Err = ParseProfileError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tef" | "t" => Ok(ReceiverProfile::Tef),
            "xdr" | "x" => Ok(ReceiverProfile::Xdr),
            _ => Err(ParseProfileError(s.to_string())),
        }
    }
}

/// Find the table entry closest to `requested`, minimizing the absolute
/// difference. Ties are broken by table order, so on an exact tie the
/// lower value wins. Returns `None` only for an empty table, which the
/// built-in profiles never produce.
pub fn closest_bandwidth(table: &[u32], requested: u32) -> Option<u32> {
    let mut best = None;
    let mut best_diff = u32::MAX;

    for &bw in table {
        let diff = bw.abs_diff(requested);
        if diff < best_diff {
            best_diff = diff;
            best = Some(bw);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---------------------------------------------------------------
    // Table invariants
    // ---------------------------------------------------------------

    #[test]
    fn tables_start_with_zero_sentinel() {
        assert_eq!(TEF_BANDWIDTHS[0], 0);
        assert_eq!(XDR_BANDWIDTHS[0], 0);
    }

    #[test]
    fn tables_are_ascending_and_unique() {
        for table in [TEF_BANDWIDTHS, XDR_BANDWIDTHS] {
            for pair in table.windows(2) {
                assert!(pair[0] < pair[1], "table not strictly ascending: {pair:?}");
            }
        }
    }

    #[test]
    fn xdr_table_covers_index_range() {
        // Every index below the limit must resolve through the table.
        assert!(XDR_BANDWIDTHS.len() > XDR_INDEX_LIMIT as usize);
    }

    // ---------------------------------------------------------------
    // Index remap
    // ---------------------------------------------------------------

    #[test]
    fn xdr_resolves_small_values_as_indices() {
        assert_eq!(ReceiverProfile::Xdr.resolve_bandwidth(0), 55_000);
        assert_eq!(ReceiverProfile::Xdr.resolve_bandwidth(4), 125_000);
        assert_eq!(ReceiverProfile::Xdr.resolve_bandwidth(15), 309_000);
    }

    #[test]
    fn xdr_passes_through_hertz_values() {
        assert_eq!(ReceiverProfile::Xdr.resolve_bandwidth(16), 16);
        assert_eq!(ReceiverProfile::Xdr.resolve_bandwidth(125_000), 125_000);
    }

    #[test]
    fn tef_never_remaps() {
        assert_eq!(ReceiverProfile::Tef.resolve_bandwidth(5), 5);
        assert_eq!(ReceiverProfile::Tef.resolve_bandwidth(97_000), 97_000);
    }

    // ---------------------------------------------------------------
    // Closest match
    // ---------------------------------------------------------------

    #[test]
    fn closest_exact_entry() {
        assert_eq!(closest_bandwidth(TEF_BANDWIDTHS, 97_000), Some(97_000));
    }

    #[test]
    fn closest_rounds_to_nearest() {
        // 150_000 sits between 133_000 and 151_000; 151_000 is nearer.
        assert_eq!(closest_bandwidth(TEF_BANDWIDTHS, 150_000), Some(151_000));
    }

    #[test]
    fn closest_tie_breaks_low() {
        // 142_000 is exactly between 133_000 and 151_000.
        assert_eq!(closest_bandwidth(TEF_BANDWIDTHS, 142_000), Some(133_000));
    }

    #[test]
    fn closest_clamps_above_table() {
        assert_eq!(closest_bandwidth(TEF_BANDWIDTHS, 1_000_000), Some(311_000));
    }

    #[test]
    fn closest_empty_table() {
        assert_eq!(closest_bandwidth(&[], 100_000), None);
    }

    // ---------------------------------------------------------------
    // Command encoding
    // ---------------------------------------------------------------

    #[test]
    fn tef_command_is_direct_value() {
        assert_eq!(ReceiverProfile::Tef.bandwidth_command(97_000), "W97000");
    }

    #[test]
    fn xdr_command_is_index() {
        // 55_000 is the first real filter -> F0.
        assert_eq!(ReceiverProfile::Xdr.bandwidth_command(55_000), "F0");
        assert_eq!(ReceiverProfile::Xdr.bandwidth_command(309_000), "F15");
    }

    #[test]
    fn xdr_command_for_adaptive_filter() {
        // The 0 sentinel sits before the first real filter.
        assert_eq!(ReceiverProfile::Xdr.bandwidth_command(0), "F-1");
    }

    // ---------------------------------------------------------------
    // Parsing and display
    // ---------------------------------------------------------------

    #[test]
    fn parse_profile_names() {
        assert_eq!("tef".parse::<ReceiverProfile>().unwrap(), ReceiverProfile::Tef);
        assert_eq!("TEF".parse::<ReceiverProfile>().unwrap(), ReceiverProfile::Tef);
        assert_eq!("x".parse::<ReceiverProfile>().unwrap(), ReceiverProfile::Xdr);
        assert_eq!("XDR".parse::<ReceiverProfile>().unwrap(), ReceiverProfile::Xdr);
    }

    #[test]
    fn parse_profile_rejects_unknown() {
        let err = "icom".parse::<ReceiverProfile>().unwrap_err();
        assert_eq!(err.to_string(), "unknown receiver profile: icom");
    }

    #[test]
    fn profile_display() {
        assert_eq!(ReceiverProfile::Tef.to_string(), "TEF");
        assert_eq!(ReceiverProfile::Xdr.to_string(), "XDR");
    }
}
