use serde::{Deserialize, Serialize};

/// Default image extensions recognized in link paths
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// Default video extensions recognized in link paths
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "avi", "mkv"];

/// Parser settings
///
/// Every field has a default, so a partial JSON document (or `{}`) is a valid
/// configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParserConfig {
    /// Path suffixes classified as images (leading dot optional)
    pub image_extensions: Vec<String>,
    /// Path suffixes classified as videos (leading dot optional)
    pub video_extensions: Vec<String>,
    /// Characters kept from the start of a mention identifier in plain text
    pub mention_prefix_len: usize,
    /// Characters kept from the end of a mention identifier in plain text
    pub mention_suffix_len: usize,
    /// Run the supplied entity decoder on mention segments
    pub decode_mentions: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            image_extensions: DEFAULT_IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            video_extensions: DEFAULT_VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            mention_prefix_len: 8,
            mention_suffix_len: 4,
            decode_mentions: true,
        }
    }
}

impl ParserConfig {
    /// Load a configuration from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid parser config: {}", e))
    }

    /// Serialize the configuration to JSON
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Failed to serialize parser config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParserConfig::default();
        assert_eq!(config.image_extensions.len(), 6);
        assert_eq!(config.video_extensions.len(), 5);
        assert_eq!(config.mention_prefix_len, 8);
        assert_eq!(config.mention_suffix_len, 4);
        assert!(config.decode_mentions);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ParserConfig::from_json(r#"{"mention_prefix_len": 12}"#).unwrap();
        assert_eq!(config.mention_prefix_len, 12);
        assert_eq!(config.mention_suffix_len, 4);
        assert_eq!(config.video_extensions, ParserConfig::default().video_extensions);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = ParserConfig::default();
        config.image_extensions.push("avif".to_string());
        config.decode_mentions = false;
        let json = config.to_json().unwrap();
        assert_eq!(ParserConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        let err = ParserConfig::from_json("{not json").unwrap_err();
        assert!(err.starts_with("Invalid parser config"));
    }
}
