//! Radio-text character substitution and hex encoding.
//!
//! SRCP clients expect RDS radio text in the receiver's extended character
//! set, where a handful of Latin-1 accented letters live at different code
//! points than in Unicode. The substitution table below is part of the
//! wire format and must match the receiver firmware byte for byte.
//!
//! Characters outside the table pass through unchanged. Substitution is
//! applied to radio-text fields only; the PS name is hex-encoded as-is.

/// Latin-1 code point -> receiver extended-charset byte. 13 entries.
const SUBSTITUTIONS: [(char, u8); 13] = [
    ('\u{F6}', 0x97), // ö
    ('\u{E4}', 0x91), // ä
    ('\u{E5}', 0xF1), // å
    ('\u{D6}', 0xD7), // Ö
    ('\u{C4}', 0xD1), // Ä
    ('\u{C5}', 0xE1), // Å
    ('\u{FC}', 0x99), // ü
    ('\u{DC}', 0xD9), // Ü
    ('\u{F5}', 0x96), // ő
    ('\u{D5}', 0xE6), // Ő
    ('\u{E6}', 0xF2), // æ
    ('\u{C6}', 0xE2), // Æ
    ('\u{F8}', 0xE7), // ø
];

/// Map one character into the receiver's extended character set.
///
/// Returns the substituted code for the 13 remapped accented letters and
/// the character's own code point for everything else.
fn substitute(ch: char) -> u32 {
    SUBSTITUTIONS
        .iter()
        .find(|(from, _)| *from == ch)
        .map(|(_, to)| *to as u32)
        .unwrap_or(ch as u32)
}

/// Hex-encode a string, two lowercase digits per character code point.
pub fn text_to_hex(s: &str) -> String {
    s.chars().map(|ch| format!("{:02x}", ch as u32)).collect()
}

/// Hex-encode a radio-text string after charset substitution.
pub fn radiotext_to_hex(s: &str) -> String {
    s.chars().map(|ch| format!("{:02x}", substitute(ch))).collect()
}
