//! Input cleanup that runs before pattern matching: repairing malformed text
//! and normalizing line breaks.

use once_cell::sync::Lazy;
use regex::Regex;

/// Runs of three or more line breaks
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n{3,}").expect("Failed to compile newline collapse regex")
});

/// Decode UTF-16 code units, replacing every unpaired surrogate with U+FFFD
///
/// A high surrogate not followed by a low surrogate, and a low surrogate not
/// preceded by a high surrogate, each become one replacement character.
/// Total over any input; running it again on its own output changes nothing.
pub fn sanitize_utf16(units: &[u16]) -> String {
    char::decode_utf16(units.iter().copied())
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Decode raw bytes as UTF-8, replacing invalid sequences with U+FFFD
pub fn sanitize_bytes(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Trim every line and collapse runs of 3+ newlines down to exactly 2
pub fn normalize_newlines(input: &str) -> String {
    let trimmed = input
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");

    EXCESS_NEWLINES.replace_all(&trimmed, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_valid_utf16() {
        let units: Vec<u16> = "Hello 🌍!".encode_utf16().collect();
        assert_eq!(sanitize_utf16(&units), "Hello 🌍!");
    }

    #[test]
    fn test_sanitize_lone_high_surrogate() {
        let units = [0x0041, 0xD83C, 0x0042];
        assert_eq!(sanitize_utf16(&units), "A\u{FFFD}B");
    }

    #[test]
    fn test_sanitize_lone_low_surrogate() {
        let units = [0xDF0D, 0x0041];
        assert_eq!(sanitize_utf16(&units), "\u{FFFD}A");
    }

    #[test]
    fn test_sanitize_trailing_high_surrogate() {
        let units = [0x0041, 0xD83C];
        assert_eq!(sanitize_utf16(&units), "A\u{FFFD}");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let units = [0xD800, 0xD800, 0xDC00, 0xDC00, 0x0061];
        let once = sanitize_utf16(&units);
        let again: Vec<u16> = once.encode_utf16().collect();
        assert_eq!(sanitize_utf16(&again), once);
    }

    #[test]
    fn test_sanitize_invalid_bytes() {
        assert_eq!(sanitize_bytes(b"ok\xFFok"), "ok\u{FFFD}ok");
    }

    #[test]
    fn test_normalize_trims_lines() {
        assert_eq!(normalize_newlines("  hello  \n\tworld \r"), "hello\nworld");
    }

    #[test]
    fn test_normalize_collapses_newlines() {
        assert_eq!(normalize_newlines("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize_newlines("a\n \n  \n\nb"), "a\n\nb");
        assert_eq!(normalize_newlines("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let input = " one \n\n\n two\n \n\n\n\nthree  ";
        let once = normalize_newlines(input);
        assert_eq!(normalize_newlines(&once), once);
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_newlines(""), "");
        assert_eq!(normalize_newlines("   "), "");
    }
}
