//! Read-only projections over an already parsed segment list.

use crate::config::ParserConfig;
use crate::utils::content_parser::{ContentParser, ContentSegment};
use crate::utils::format::short_display;
use crate::utils::nip19::Mention;

/// URLs of every image segment, in order
pub fn extract_images(segments: &[ContentSegment]) -> Vec<String> {
    segments
        .iter()
        .filter_map(|segment| match segment {
            ContentSegment::Image(url) => Some(url.clone()),
            _ => None,
        })
        .collect()
}

/// URLs of every video and YouTube segment, in order
pub fn extract_videos(segments: &[ContentSegment]) -> Vec<String> {
    segments
        .iter()
        .filter_map(|segment| match segment {
            ContentSegment::Video(url) | ContentSegment::YouTube { url, .. } => Some(url.clone()),
            _ => None,
        })
        .collect()
}

/// Targets of plain links and markdown links, in order
pub fn extract_urls(segments: &[ContentSegment]) -> Vec<String> {
    segments
        .iter()
        .filter_map(|segment| match segment {
            ContentSegment::Url(url) | ContentSegment::MarkdownLink { url, .. } => Some(url.clone()),
            _ => None,
        })
        .collect()
}

/// Hashtags without the leading `#`
pub fn extract_hashtags(segments: &[ContentSegment]) -> Vec<String> {
    segments
        .iter()
        .filter_map(|segment| match segment {
            ContentSegment::Hashtag(tag) => Some(tag.clone()),
            _ => None,
        })
        .collect()
}

/// Cashtag symbols without the leading `$`
pub fn extract_cashtags(segments: &[ContentSegment]) -> Vec<String> {
    segments
        .iter()
        .filter_map(|segment| match segment {
            ContentSegment::Cashtag(symbol) => Some(symbol.clone()),
            _ => None,
        })
        .collect()
}

pub fn extract_mentions(segments: &[ContentSegment]) -> Vec<Mention> {
    segments
        .iter()
        .filter_map(|segment| match segment {
            ContentSegment::Mention(mention) => Some(mention.clone()),
            _ => None,
        })
        .collect()
}

/// Indices of `#[N]` references
pub fn extract_legacy_mentions(segments: &[ContentSegment]) -> Vec<usize> {
    segments
        .iter()
        .filter_map(|segment| match segment {
            ContentSegment::LegacyMention(index) => Some(*index),
            _ => None,
        })
        .collect()
}

/// Reduce segments to readable text (notification previews, share text)
///
/// Mentions show as `@npub1abc...wxyz`, code keeps its body, emoji keep their
/// shortcode. Links, media, invoices and embeds are left out entirely.
pub fn to_plain_text(segments: &[ContentSegment]) -> String {
    let config = ParserConfig::default();
    to_plain_text_with(segments, config.mention_prefix_len, config.mention_suffix_len)
}

pub fn to_plain_text_with(
    segments: &[ContentSegment],
    mention_prefix_len: usize,
    mention_suffix_len: usize,
) -> String {
    let mut text = String::new();

    for segment in segments {
        match segment {
            ContentSegment::Text(t) => text.push_str(t),
            ContentSegment::Newline(count) => text.push_str(&"\n".repeat(*count)),
            ContentSegment::Mention(mention) => {
                text.push('@');
                text.push_str(&short_display(
                    &mention.identifier,
                    mention_prefix_len,
                    mention_suffix_len,
                ));
            }
            ContentSegment::LegacyMention(index) => text.push_str(&format!("#[{}]", index)),
            ContentSegment::Hashtag(tag) => {
                text.push('#');
                text.push_str(tag);
            }
            ContentSegment::Cashtag(symbol) => {
                text.push('$');
                text.push_str(symbol);
            }
            ContentSegment::InlineCode(code) | ContentSegment::CodeBlock { code, .. } => {
                text.push_str(code)
            }
            ContentSegment::CustomEmoji { name, .. } => text.push_str(&format!(":{}:", name)),
            ContentSegment::Url(_)
            | ContentSegment::Image(_)
            | ContentSegment::Video(_)
            | ContentSegment::YouTube { .. }
            | ContentSegment::MarkdownLink { .. }
            | ContentSegment::LightningInvoice(_) => {}
        }
    }

    text.trim().to_string()
}

impl ContentParser {
    /// [`to_plain_text`] using this parser's mention shortening lengths
    pub fn to_plain_text(&self, segments: &[ContentSegment]) -> String {
        to_plain_text_with(
            segments,
            self.config().mention_prefix_len,
            self.config().mention_suffix_len,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::content_parser::parse;
    use std::collections::HashMap;

    const NPUB: &str = "npub10elfcs4fr0l0r8af98jlmgdh9c8tcxjvz9qkw038js35mp4dma8qzvjptg";

    fn segments(content: &str) -> Vec<ContentSegment> {
        parse(content, &HashMap::new())
    }

    #[test]
    fn test_extract_images_in_order() {
        let parsed = segments("https://a.com/1.png text https://a.com/2.gif https://a.com/page");
        assert_eq!(extract_images(&parsed), vec!["https://a.com/1.png", "https://a.com/2.gif"]);
    }

    #[test]
    fn test_extract_videos_and_urls() {
        let parsed = segments(
            "https://a.com/clip.mp4 https://youtu.be/dQw4w9WgXcQ [docs](https://docs.rs) https://a.com",
        );
        assert_eq!(
            extract_videos(&parsed),
            vec!["https://a.com/clip.mp4", "https://youtu.be/dQw4w9WgXcQ"]
        );
        assert_eq!(extract_urls(&parsed), vec!["https://docs.rs", "https://a.com"]);
    }

    #[test]
    fn test_extract_tags() {
        let parsed = segments("#nostr $BTC #zaps $SATS #[0] #[3]");
        assert_eq!(extract_hashtags(&parsed), vec!["nostr", "zaps"]);
        assert_eq!(extract_cashtags(&parsed), vec!["BTC", "SATS"]);
        assert_eq!(extract_legacy_mentions(&parsed), vec![0, 3]);
    }

    #[test]
    fn test_extract_mentions() {
        let parsed = segments(&format!("hi nostr:{} and nostr:note1qqqq", NPUB));
        let mentions = extract_mentions(&parsed);
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].identifier, NPUB);
        assert_eq!(mentions[1].identifier, "note1qqqq");
    }

    #[test]
    fn test_plain_text_shortens_mentions() {
        let parsed = segments(&format!("Hello nostr:{} #nostr", NPUB));
        assert_eq!(to_plain_text(&parsed), "Hello @npub10el...jptg #nostr");
    }

    #[test]
    fn test_plain_text_short_identifier_still_abbreviated() {
        let parsed = segments("Hello nostr:npub1xxxx #nostr");
        assert_eq!(to_plain_text(&parsed), "Hello @npub1xxx...xxxx #nostr");
    }

    #[test]
    fn test_plain_text_drops_links_and_media() {
        let parsed = segments(
            "  look https://a.com/cat.png at [this](https://x.com) lnbc1qqqq https://youtu.be/dQw4w9WgXcQ",
        );
        assert_eq!(to_plain_text(&parsed), "look  at");
    }

    #[test]
    fn test_plain_text_keeps_code_and_emoji() {
        let parsed = segments("run `ls` :wave: #[1] $BTC\n```sh\necho hi\n```");
        assert_eq!(to_plain_text(&parsed), "run ls :wave: #[1] $BTC\necho hi");
    }

    #[test]
    fn test_plain_text_custom_lengths() {
        let parser = ContentParser::new(ParserConfig {
            mention_prefix_len: 4,
            mention_suffix_len: 2,
            ..ParserConfig::default()
        });
        let parsed = parser.parse(&format!("nostr:{}", NPUB), &HashMap::new());
        assert_eq!(parser.to_plain_text(&parsed), "@npub...tg");
    }
}
