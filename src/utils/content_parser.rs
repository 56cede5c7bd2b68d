use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ParserConfig;
use crate::utils::nip19::{classify_entity, EntityDecoder, Mention};
use crate::utils::text::{normalize_newlines, sanitize_bytes, sanitize_utf16};
use crate::utils::url_classifier::{trim_trailing_punctuation, UrlClassifier};

/// Represents the different kinds of segments a note decomposes into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ContentSegment {
    Text(String),
    /// 1 or 2 consecutive line breaks
    Newline(usize),
    Url(String),
    Image(String),
    Video(String),
    YouTube { url: String, video_id: String },
    MarkdownLink { text: String, url: String },
    Mention(Mention),
    /// `#[N]` reference into the event's tag list
    LegacyMention(usize),
    /// Tag body without the leading `#`
    Hashtag(String),
    /// Ticker symbol without the leading `$`
    Cashtag(String),
    InlineCode(String),
    CodeBlock { code: String, language: Option<String> },
    /// `:name:` shortcode, resolved when the caller's emoji table has it
    CustomEmoji { name: String, image_url: Option<String> },
    LightningInvoice(String),
}

impl ContentSegment {
    /// The exact source text this segment was parsed from
    ///
    /// Concatenating the raw text of every segment reproduces the normalized
    /// input.
    pub fn raw_text(&self) -> String {
        match self {
            ContentSegment::Text(text) => text.clone(),
            ContentSegment::Newline(count) => "\n".repeat(*count),
            ContentSegment::Url(url)
            | ContentSegment::Image(url)
            | ContentSegment::Video(url)
            | ContentSegment::YouTube { url, .. } => url.clone(),
            ContentSegment::MarkdownLink { text, url } => format!("[{}]({})", text, url),
            ContentSegment::Mention(mention) => format!("nostr:{}", mention.identifier),
            ContentSegment::LegacyMention(index) => format!("#[{}]", index),
            ContentSegment::Hashtag(tag) => format!("#{}", tag),
            ContentSegment::Cashtag(symbol) => format!("${}", symbol),
            ContentSegment::InlineCode(code) => format!("`{}`", code),
            ContentSegment::CodeBlock { code, language } => {
                format!("```{}\n{}```", language.as_deref().unwrap_or(""), code)
            }
            ContentSegment::CustomEmoji { name, .. } => format!(":{}:", name),
            ContentSegment::LightningInvoice(invoice) => invoice.clone(),
        }
    }

    /// Short name of the variant, for logs and diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            ContentSegment::Text(_) => "text",
            ContentSegment::Newline(_) => "newline",
            ContentSegment::Url(_) => "url",
            ContentSegment::Image(_) => "image",
            ContentSegment::Video(_) => "video",
            ContentSegment::YouTube { .. } => "youtube",
            ContentSegment::MarkdownLink { .. } => "markdown_link",
            ContentSegment::Mention(_) => "mention",
            ContentSegment::LegacyMention(_) => "legacy_mention",
            ContentSegment::Hashtag(_) => "hashtag",
            ContentSegment::Cashtag(_) => "cashtag",
            ContentSegment::InlineCode(_) => "inline_code",
            ContentSegment::CodeBlock { .. } => "code_block",
            ContentSegment::CustomEmoji { .. } => "custom_emoji",
            ContentSegment::LightningInvoice(_) => "lightning_invoice",
        }
    }
}

/// A segment together with its byte span in the normalized input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedSegment {
    pub start: usize,
    pub end: usize,
    pub segment: ContentSegment,
}

/// Output of [`ContentParser::parse_spanned`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedContent {
    /// Sanitized, newline-normalized text the spans index into
    pub normalized: String,
    pub segments: Vec<SpannedSegment>,
}

impl ParsedContent {
    pub fn into_segments(self) -> Vec<ContentSegment> {
        self.segments.into_iter().map(|s| s.segment).collect()
    }
}

/// Pattern families, declared in priority order (earlier wins a tie)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchFamily {
    CodeBlock,
    InlineCode,
    MarkdownLink,
    BareUrl,
    Entity,
    LegacyMention,
    Hashtag,
    Cashtag,
    CustomEmoji,
    LightningInvoice,
    Newline,
}

/// What a matcher captured, borrowed from the normalized text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture<'a> {
    CodeBlock { language: Option<&'a str>, code: &'a str },
    InlineCode(&'a str),
    MarkdownLink { text: &'a str, url: &'a str },
    BareUrl(&'a str),
    Entity(&'a str),
    LegacyMention(usize),
    Hashtag(&'a str),
    Cashtag(&'a str),
    CustomEmoji(&'a str),
    LightningInvoice(&'a str),
    Newline(usize),
}

impl Capture<'_> {
    pub fn family(&self) -> MatchFamily {
        match self {
            Capture::CodeBlock { .. } => MatchFamily::CodeBlock,
            Capture::InlineCode(_) => MatchFamily::InlineCode,
            Capture::MarkdownLink { .. } => MatchFamily::MarkdownLink,
            Capture::BareUrl(_) => MatchFamily::BareUrl,
            Capture::Entity(_) => MatchFamily::Entity,
            Capture::LegacyMention(_) => MatchFamily::LegacyMention,
            Capture::Hashtag(_) => MatchFamily::Hashtag,
            Capture::Cashtag(_) => MatchFamily::Cashtag,
            Capture::CustomEmoji(_) => MatchFamily::CustomEmoji,
            Capture::LightningInvoice(_) => MatchFamily::LightningInvoice,
            Capture::Newline(_) => MatchFamily::Newline,
        }
    }
}

/// One candidate match: byte span `start..end` plus its captures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternMatch<'a> {
    pub start: usize,
    pub end: usize,
    pub capture: Capture<'a>,
}

impl PatternMatch<'_> {
    pub fn family(&self) -> MatchFamily {
        self.capture.family()
    }
}

// Regex patterns, compiled once
static CODE_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```([A-Za-z0-9_+#.-]*)\n([\s\S]*?)```").expect("Failed to compile code block regex")
});
static INLINE_CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"`([^`\n]+)`").expect("Failed to compile inline code regex")
});
static MARKDOWN_LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]\n]+)\]\((https?://[^)\s]+)\)").expect("Failed to compile markdown link regex")
});
static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://[^\s<>\[\]]+").expect("Failed to compile URL regex")
});
static NOSTR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"nostr:((?:npub1|nprofile1|note1|nevent1|naddr1)[qpzry9x8gf2tvdw0s3jn54khce6mua7l]+)")
        .expect("Failed to compile nostr entity regex")
});
static LEGACY_MENTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#\[(0|[1-9][0-9]{0,8})\]").expect("Failed to compile legacy mention regex")
});
static HASHTAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#(\p{L}[\p{L}\p{N}_]*)").expect("Failed to compile hashtag regex")
});
static CASHTAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\B\$([A-Z]{2,5})\b").expect("Failed to compile cashtag regex")
});
static EMOJI_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r":([A-Za-z0-9_]+):").expect("Failed to compile emoji regex")
});
static LIGHTNING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\blnbc[a-z0-9]+\b").expect("Failed to compile lightning invoice regex")
});
static NEWLINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n+").expect("Failed to compile newline regex")
});

type Matcher = for<'a> fn(&'a str, &mut Vec<PatternMatch<'a>>);

const MATCHERS: [Matcher; 11] = [
    match_code_blocks,
    match_inline_code,
    match_markdown_links,
    match_bare_urls,
    match_entities,
    match_legacy_mentions,
    match_hashtags,
    match_cashtags,
    match_custom_emoji,
    match_lightning_invoices,
    match_newlines,
];

fn match_code_blocks<'a>(text: &'a str, out: &mut Vec<PatternMatch<'a>>) {
    for caps in CODE_BLOCK_REGEX.captures_iter(text) {
        let (Some(whole), Some(language), Some(code)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let language = Some(language.as_str()).filter(|l| !l.is_empty());
        out.push(PatternMatch {
            start: whole.start(),
            end: whole.end(),
            capture: Capture::CodeBlock { language, code: code.as_str() },
        });
    }
}

fn match_inline_code<'a>(text: &'a str, out: &mut Vec<PatternMatch<'a>>) {
    for caps in INLINE_CODE_REGEX.captures_iter(text) {
        let (Some(whole), Some(code)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        // Backticks that belong to a longer run (a one-line ``` fence) stay text
        if text[..whole.start()].ends_with('`') || text[whole.end()..].starts_with('`') {
            continue;
        }
        out.push(PatternMatch {
            start: whole.start(),
            end: whole.end(),
            capture: Capture::InlineCode(code.as_str()),
        });
    }
}

fn match_markdown_links<'a>(text: &'a str, out: &mut Vec<PatternMatch<'a>>) {
    for caps in MARKDOWN_LINK_REGEX.captures_iter(text) {
        let (Some(whole), Some(label), Some(url)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        out.push(PatternMatch {
            start: whole.start(),
            end: whole.end(),
            capture: Capture::MarkdownLink { text: label.as_str(), url: url.as_str() },
        });
    }
}

/// Trailing punctuation is cut here so the span matches the classified link
/// and the leftover characters stay plain text
fn match_bare_urls<'a>(text: &'a str, out: &mut Vec<PatternMatch<'a>>) {
    for mat in URL_REGEX.find_iter(text) {
        let url = trim_trailing_punctuation(mat.as_str());
        let scheme_len = url.find("://").map_or(0, |i| i + 3);
        if url.len() <= scheme_len {
            continue;
        }
        out.push(PatternMatch {
            start: mat.start(),
            end: mat.start() + url.len(),
            capture: Capture::BareUrl(url),
        });
    }
}

fn match_entities<'a>(text: &'a str, out: &mut Vec<PatternMatch<'a>>) {
    for caps in NOSTR_REGEX.captures_iter(text) {
        let (Some(whole), Some(identifier)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push(PatternMatch {
            start: whole.start(),
            end: whole.end(),
            capture: Capture::Entity(identifier.as_str()),
        });
    }
}

fn match_legacy_mentions<'a>(text: &'a str, out: &mut Vec<PatternMatch<'a>>) {
    for caps in LEGACY_MENTION_REGEX.captures_iter(text) {
        let (Some(whole), Some(index)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Ok(index) = index.as_str().parse::<usize>() else {
            continue;
        };
        out.push(PatternMatch {
            start: whole.start(),
            end: whole.end(),
            capture: Capture::LegacyMention(index),
        });
    }
}

fn match_hashtags<'a>(text: &'a str, out: &mut Vec<PatternMatch<'a>>) {
    for caps in HASHTAG_REGEX.captures_iter(text) {
        let (Some(whole), Some(tag)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push(PatternMatch {
            start: whole.start(),
            end: whole.end(),
            capture: Capture::Hashtag(tag.as_str()),
        });
    }
}

fn match_cashtags<'a>(text: &'a str, out: &mut Vec<PatternMatch<'a>>) {
    for caps in CASHTAG_REGEX.captures_iter(text) {
        let (Some(whole), Some(symbol)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push(PatternMatch {
            start: whole.start(),
            end: whole.end(),
            capture: Capture::Cashtag(symbol.as_str()),
        });
    }
}

fn match_custom_emoji<'a>(text: &'a str, out: &mut Vec<PatternMatch<'a>>) {
    for caps in EMOJI_REGEX.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let before = text[..whole.start()].chars().next_back();
        let after = &text[whole.end()..];

        // Clock times ("12:30:45") and URI schemes ("see:https://") are not shortcodes
        let clock_time = before.is_some_and(|c| c.is_ascii_digit())
            && after.starts_with(|c: char| c.is_ascii_digit());
        if clock_time || after.starts_with("//") {
            continue;
        }

        out.push(PatternMatch {
            start: whole.start(),
            end: whole.end(),
            capture: Capture::CustomEmoji(name.as_str()),
        });
    }
}

fn match_lightning_invoices<'a>(text: &'a str, out: &mut Vec<PatternMatch<'a>>) {
    for mat in LIGHTNING_REGEX.find_iter(text) {
        out.push(PatternMatch {
            start: mat.start(),
            end: mat.end(),
            capture: Capture::LightningInvoice(mat.as_str()),
        });
    }
}

fn match_newlines<'a>(text: &'a str, out: &mut Vec<PatternMatch<'a>>) {
    for mat in NEWLINE_REGEX.find_iter(text) {
        out.push(PatternMatch {
            start: mat.start(),
            end: mat.end(),
            capture: Capture::Newline(mat.len()),
        });
    }
}

/// Run every matcher over `text` and collect all candidates, overlaps included
pub fn find_matches(text: &str) -> Vec<PatternMatch<'_>> {
    let mut matches = Vec::new();
    for matcher in MATCHERS {
        matcher(text, &mut matches);
    }
    matches
}

/// Reduce candidates to a sorted, non-overlapping list
///
/// Candidates are ordered by start offset, ties broken by [`MatchFamily`]
/// priority. A left-to-right sweep keeps each candidate that starts at or
/// after the end of the last kept one. Length never breaks a tie.
pub fn resolve_overlaps(mut matches: Vec<PatternMatch<'_>>) -> Vec<PatternMatch<'_>> {
    matches.sort_by_key(|m| (m.start, m.family()));

    let mut resolved = Vec::with_capacity(matches.len());
    let mut last_end = 0;

    for mat in matches {
        // Skip if this match overlaps with the previous one
        if mat.start < last_end {
            log::trace!(
                "Dropping {:?} at {}..{} (overlaps up to {})",
                mat.family(),
                mat.start,
                mat.end,
                last_end
            );
            continue;
        }
        last_end = mat.end;
        resolved.push(mat);
    }

    resolved
}

static DEFAULT_PARSER: Lazy<ContentParser> = Lazy::new(ContentParser::default);

/// Splits note content into [`ContentSegment`]s
///
/// Holds no state between calls; one parser can be shared across threads.
#[derive(Clone, Debug, Default)]
pub struct ContentParser {
    config: ParserConfig,
    urls: UrlClassifier,
}

impl ContentParser {
    pub fn new(config: ParserConfig) -> Self {
        let urls = UrlClassifier::from_config(&config);
        Self { config, urls }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse note content into segments
    pub fn parse(&self, content: &str, emoji: &HashMap<String, String>) -> Vec<ContentSegment> {
        self.parse_spanned(content, emoji, None).into_segments()
    }

    /// Parse, filling decoded pubkey / event ID fields of mentions
    pub fn parse_with_decoder(
        &self,
        content: &str,
        emoji: &HashMap<String, String>,
        decoder: &dyn EntityDecoder,
    ) -> Vec<ContentSegment> {
        self.parse_spanned(content, emoji, Some(decoder)).into_segments()
    }

    /// Parse, keeping the normalized text and each segment's byte span in it
    pub fn parse_spanned(
        &self,
        content: &str,
        emoji: &HashMap<String, String>,
        decoder: Option<&dyn EntityDecoder>,
    ) -> ParsedContent {
        let normalized = normalize_newlines(content);

        let candidates = find_matches(&normalized);
        let candidate_count = candidates.len();
        let resolved = resolve_overlaps(candidates);
        let segments = self.build_segments(&normalized, &resolved, emoji, decoder);

        log::debug!(
            "Parsed {} bytes: {} candidates, {} kept, {} segments",
            normalized.len(),
            candidate_count,
            resolved.len(),
            segments.len()
        );

        ParsedContent { normalized, segments }
    }

    /// Walk resolved matches, emitting text for every gap and a typed segment
    /// for every match
    pub fn build_segments(
        &self,
        text: &str,
        matches: &[PatternMatch<'_>],
        emoji: &HashMap<String, String>,
        decoder: Option<&dyn EntityDecoder>,
    ) -> Vec<SpannedSegment> {
        let mut segments = Vec::with_capacity(matches.len() * 2 + 1);
        let mut current = 0;

        for mat in matches {
            // Add text before this match
            if mat.start > current {
                segments.push(SpannedSegment {
                    start: current,
                    end: mat.start,
                    segment: ContentSegment::Text(text[current..mat.start].to_string()),
                });
            }

            segments.push(SpannedSegment {
                start: mat.start,
                end: mat.end,
                segment: self.segment_for(mat.capture, emoji, decoder),
            });
            current = mat.end;
        }

        // Add remaining text
        if current < text.len() {
            segments.push(SpannedSegment {
                start: current,
                end: text.len(),
                segment: ContentSegment::Text(text[current..].to_string()),
            });
        }

        segments
    }

    fn segment_for(
        &self,
        capture: Capture<'_>,
        emoji: &HashMap<String, String>,
        decoder: Option<&dyn EntityDecoder>,
    ) -> ContentSegment {
        match capture {
            Capture::CodeBlock { language, code } => ContentSegment::CodeBlock {
                code: code.to_string(),
                language: language.map(str::to_string),
            },
            Capture::InlineCode(code) => ContentSegment::InlineCode(code.to_string()),
            Capture::MarkdownLink { text, url } => ContentSegment::MarkdownLink {
                text: text.to_string(),
                url: url.to_string(),
            },
            Capture::BareUrl(url) => self.urls.classify(url),
            Capture::Entity(identifier) => {
                ContentSegment::Mention(self.mention_for(identifier, decoder))
            }
            Capture::LegacyMention(index) => ContentSegment::LegacyMention(index),
            Capture::Hashtag(tag) => ContentSegment::Hashtag(tag.to_string()),
            Capture::Cashtag(symbol) => ContentSegment::Cashtag(symbol.to_string()),
            Capture::CustomEmoji(name) => ContentSegment::CustomEmoji {
                name: name.to_string(),
                image_url: emoji.get(name).cloned(),
            },
            Capture::LightningInvoice(invoice) => {
                ContentSegment::LightningInvoice(invoice.to_string())
            }
            Capture::Newline(count) => ContentSegment::Newline(count),
        }
    }

    fn mention_for(&self, identifier: &str, decoder: Option<&dyn EntityDecoder>) -> Mention {
        let mention = classify_entity(identifier);

        let Some(decoder) = decoder.filter(|_| self.config.decode_mentions) else {
            return mention;
        };

        match decoder.decode(identifier) {
            Ok(decoded) => mention.with_decoded(decoded),
            Err(e) => {
                log::debug!("Leaving mention undecoded: {}", e);
                mention
            }
        }
    }
}

/// Parse note content with the default configuration
pub fn parse(content: &str, emoji: &HashMap<String, String>) -> Vec<ContentSegment> {
    DEFAULT_PARSER.parse(content, emoji)
}

/// Parse with the default configuration, decoding mentions with `decoder`
pub fn parse_with_decoder(
    content: &str,
    emoji: &HashMap<String, String>,
    decoder: &dyn EntityDecoder,
) -> Vec<ContentSegment> {
    DEFAULT_PARSER.parse_with_decoder(content, emoji, decoder)
}

/// Parse UTF-16 code units, repairing unpaired surrogates first
pub fn parse_utf16(units: &[u16], emoji: &HashMap<String, String>) -> Vec<ContentSegment> {
    DEFAULT_PARSER.parse(&sanitize_utf16(units), emoji)
}

/// Parse raw bytes, repairing invalid UTF-8 first
pub fn parse_bytes(bytes: &[u8], emoji: &HashMap<String, String>) -> Vec<ContentSegment> {
    DEFAULT_PARSER.parse(&sanitize_bytes(bytes), emoji)
}
