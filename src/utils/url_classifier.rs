use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParserConfig;
use crate::utils::content_parser::ContentSegment;

/// Punctuation that never ends a link when it trails one
const TRAILING_PUNCTUATION: &[char] = &[',', '.', ';', ':', '!', '?'];

/// YouTube URL shapes: the path marker that identifies each one and the
/// pattern that captures its 11-character video ID
static YOUTUBE_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("youtube.com/watch", r"(?i)youtube\.com/watch\?(?:[^#]*?&)?v=([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)"),
        ("youtu.be/", r"(?i)youtu\.be/([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)"),
        ("youtube.com/shorts/", r"(?i)youtube\.com/shorts/([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)"),
        ("youtube.com/embed/", r"(?i)youtube\.com/embed/([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)"),
        ("youtube.com/v/", r"(?i)youtube\.com/v/([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)"),
    ]
    .into_iter()
    .map(|(marker, pattern)| {
        (marker, Regex::new(pattern).expect("Failed to compile YouTube regex"))
    })
    .collect()
});

static DEFAULT_CLASSIFIER: Lazy<UrlClassifier> = Lazy::new(UrlClassifier::default);

/// Sorts bare links into images, videos, YouTube embeds, and plain links
#[derive(Clone, Debug)]
pub struct UrlClassifier {
    image_extensions: Vec<String>,
    video_extensions: Vec<String>,
}

impl Default for UrlClassifier {
    fn default() -> Self {
        Self::from_config(&ParserConfig::default())
    }
}

impl UrlClassifier {
    pub fn from_config(config: &ParserConfig) -> Self {
        Self {
            image_extensions: dotted_extensions(&config.image_extensions),
            video_extensions: dotted_extensions(&config.video_extensions),
        }
    }

    /// Classify a raw link, trimming trailing punctuation first
    pub fn classify(&self, raw_url: &str) -> ContentSegment {
        let url = trim_trailing_punctuation(raw_url);

        if let Some(video_id) = extract_youtube_id(url) {
            return ContentSegment::YouTube {
                url: url.to_string(),
                video_id,
            };
        }

        let path = lowercase_path(url);
        if self.image_extensions.iter().any(|ext| path.ends_with(ext.as_str())) {
            ContentSegment::Image(url.to_string())
        } else if self.video_extensions.iter().any(|ext| path.ends_with(ext.as_str())) {
            ContentSegment::Video(url.to_string())
        } else {
            ContentSegment::Url(url.to_string())
        }
    }
}

/// Classify a link with the default extension sets
pub fn classify_url(raw_url: &str) -> ContentSegment {
    DEFAULT_CLASSIFIER.classify(raw_url)
}

/// Strip punctuation that trails a link in running prose
///
/// `, . ; : ! ?` always go. A closing `)` or `]` only goes while the link has
/// more closers than openers, so `https://en.wikipedia.org/wiki/Rust_(language)`
/// keeps its parenthesis.
pub fn trim_trailing_punctuation(url: &str) -> &str {
    let mut trimmed = url;

    while let Some(last) = trimmed.chars().last() {
        let strip = if TRAILING_PUNCTUATION.contains(&last) {
            true
        } else if last == ')' {
            trimmed.matches('(').count() < trimmed.matches(')').count()
        } else if last == ']' {
            trimmed.matches('[').count() < trimmed.matches(']').count()
        } else {
            false
        };

        if !strip {
            break;
        }
        trimmed = &trimmed[..trimmed.len() - last.len_utf8()];
    }

    trimmed
}

/// Extract the video ID from a YouTube watch/short/embed/share link
///
/// Returns None for non-YouTube links and for YouTube links whose ID is not
/// exactly 11 characters; those fall back to ordinary link handling.
pub fn extract_youtube_id(url: &str) -> Option<String> {
    let lower = url.to_lowercase();

    for (marker, pattern) in YOUTUBE_PATTERNS.iter() {
        if !lower.contains(marker) {
            continue;
        }
        if let Some(caps) = pattern.captures(url) {
            return caps.get(1).map(|id| id.as_str().to_string());
        }
        log::debug!("YouTube link without a usable video ID: {}", url);
    }

    None
}

/// Lower-cased path of a link, without query string or fragment
fn lowercase_path(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_lowercase(),
        Err(_) => {
            let end = url.find(['?', '#']).unwrap_or(url.len());
            url[..end].to_lowercase()
        }
    }
}

fn dotted_extensions(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext))
        .collect()
}
