// Note content parsing
// sanitize -> normalize newlines -> match -> resolve overlaps -> build segments

pub mod text;
pub mod content_parser;
pub mod url_classifier;
pub mod nip19;
pub mod format;
pub mod segment_views;
pub mod mention_extractor;

pub use content_parser::{ContentParser, ContentSegment, ParsedContent, SpannedSegment};
pub use nip19::{classify_entity, EntityDecoder, EntityKind, Mention, Nip19Decoder};
pub use url_classifier::classify_url;
pub use format::short_display;
