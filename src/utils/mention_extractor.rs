use nostr::{PublicKey, Tag};

use crate::utils::content_parser::ContentSegment;
use crate::utils::nip19::parse_pubkey;

/// Extract mentioned public keys from parsed content
///
/// Looks at `nostr:npub1...` and `nostr:nprofile1...` mentions and returns
/// the unique public keys that should be added as `p` tags. A decoded hex
/// value is preferred over the bech32 identifier; undecodable mentions are
/// skipped.
pub fn extract_mentioned_pubkeys(segments: &[ContentSegment]) -> Vec<PublicKey> {
    let mut pubkeys = Vec::new();

    for segment in segments {
        let ContentSegment::Mention(mention) = segment else {
            continue;
        };
        if !mention.kind.is_profile() {
            continue;
        }

        let source = mention
            .decoded_pubkey
            .as_deref()
            .unwrap_or(&mention.identifier);

        match parse_pubkey(source) {
            Ok(pubkey) => pubkeys.push(pubkey),
            Err(e) => log::debug!("Skipping mention: {}", e),
        }
    }

    // Remove duplicates
    pubkeys.sort();
    pubkeys.dedup();

    pubkeys
}

/// Create `p` tags from mentioned public keys
///
/// For each mentioned public key, create a `["p", "<hex-pubkey>"]` tag
pub fn create_mention_tags(pubkeys: &[PublicKey]) -> Vec<Tag> {
    pubkeys
        .iter()
        .map(|pk| Tag::public_key(*pk))
        .collect()
}
