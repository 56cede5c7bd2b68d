//! Rich-content segmentation for Nostr notes.
//!
//! [`parse`] turns raw note text into an ordered list of [`ContentSegment`]s
//! (text, links, media, `nostr:` mentions, hashtags, code, emoji, invoices...)
//! that a renderer can walk without re-inspecting the text. The segments
//! cover the newline-normalized input exactly, with no gaps or overlaps.
//!
//! ```
//! use std::collections::HashMap;
//! use nostrblue_content::{parse, ContentSegment};
//!
//! let segments = parse("$BTC #btc", &HashMap::new());
//! assert_eq!(
//!     segments,
//!     vec![
//!         ContentSegment::Cashtag("BTC".to_string()),
//!         ContentSegment::Text(" ".to_string()),
//!         ContentSegment::Hashtag("btc".to_string()),
//!     ]
//! );
//! ```
//!
//! Parsing is pure: no I/O, no global mutable state, and it never fails.

pub mod config;
pub mod utils;

pub use config::ParserConfig;
pub use utils::content_parser::{
    find_matches, parse, parse_bytes, parse_utf16, parse_with_decoder, resolve_overlaps, Capture,
    ContentParser, ContentSegment, MatchFamily, ParsedContent, PatternMatch, SpannedSegment,
};
pub use utils::mention_extractor::{create_mention_tags, extract_mentioned_pubkeys};
pub use utils::nip19::{
    classify_entity, parse_pubkey, DecodedEntity, EntityDecoder, EntityKind, Mention,
    Nip19Decoder,
};
pub use utils::segment_views::{
    extract_cashtags, extract_hashtags, extract_images, extract_legacy_mentions, extract_mentions,
    extract_urls, extract_videos, to_plain_text, to_plain_text_with,
};
pub use utils::text::{normalize_newlines, sanitize_bytes, sanitize_utf16};
pub use utils::url_classifier::{classify_url, extract_youtube_id, trim_trailing_punctuation, UrlClassifier};
