/// Shorten an identifier to `first N...last M` characters
/// Always abbreviates, so short identifiers may repeat characters on both sides
pub fn short_display(identifier: &str, prefix_len: usize, suffix_len: usize) -> String {
    let char_count = identifier.chars().count();
    let head: String = identifier.chars().take(prefix_len).collect();
    let tail: String = identifier.chars().skip(char_count.saturating_sub(suffix_len)).collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_display() {
        assert_eq!(
            short_display("npub10elfcs4fr0l0r8af98jlmgdh9c8tcxjvz9qkw038js35mp4dma8qzvjptg", 8, 4),
            "npub10el...jptg"
        );
    }

    #[test]
    fn test_short_display_always_abbreviates() {
        assert_eq!(short_display("npub1xxxx", 8, 4), "npub1xxx...xxxx");
        assert_eq!(short_display("abcdefghijkl", 8, 4), "abcdefgh...ijkl");
        assert_eq!(short_display("abc", 8, 4), "abc...abc");
    }

    #[test]
    fn test_short_display_multibyte() {
        assert_eq!(short_display("ééééééééééééé", 2, 2), "éé...éé");
    }
}
