use nostr::nips::nip19::{FromBech32, Nip19};
use nostr::PublicKey;
use serde::{Deserialize, Serialize};

/// Category of a NIP-19 entity referenced from note content
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// npub
    PublicKey,
    /// nprofile
    ProfileRef,
    /// note
    Note,
    /// nevent
    EventRef,
    /// naddr
    AddressRef,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::PublicKey,
        EntityKind::ProfileRef,
        EntityKind::Note,
        EntityKind::EventRef,
        EntityKind::AddressRef,
    ];

    /// Human-readable part of the bech32 encoding, without the `1` separator
    pub fn bech32_prefix(&self) -> &'static str {
        match self {
            EntityKind::PublicKey => "npub",
            EntityKind::ProfileRef => "nprofile",
            EntityKind::Note => "note",
            EntityKind::EventRef => "nevent",
            EntityKind::AddressRef => "naddr",
        }
    }

    /// Look up the kind from an identifier's literal prefix
    pub fn from_identifier(identifier: &str) -> Option<EntityKind> {
        Self::ALL.into_iter().find(|kind| {
            identifier
                .strip_prefix(kind.bech32_prefix())
                .is_some_and(|rest| rest.starts_with('1'))
        })
    }

    /// npub/nprofile: references a person
    pub fn is_profile(&self) -> bool {
        matches!(self, EntityKind::PublicKey | EntityKind::ProfileRef)
    }

    /// note/nevent/naddr: references content
    pub fn is_event(&self) -> bool {
        !self.is_profile()
    }
}

/// A `nostr:` entity reference found in note content
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub kind: EntityKind,
    /// Bech32 identifier without the `nostr:` scheme
    pub identifier: String,
    /// Hex public key, when a decoder was supplied and could produce one
    pub decoded_pubkey: Option<String>,
    /// Hex event ID, when a decoder was supplied and could produce one
    pub decoded_event_id: Option<String>,
}

impl Mention {
    /// Attach decoded hex values
    pub fn with_decoded(mut self, decoded: DecodedEntity) -> Self {
        self.decoded_pubkey = decoded.pubkey;
        self.decoded_event_id = decoded.event_id;
        self
    }
}

/// Classify a bech32 identifier (no `nostr:` scheme) by its prefix
///
/// Unrecognized prefixes fall back to [`EntityKind::PublicKey`]. Nothing is
/// decoded here; see [`EntityDecoder`].
pub fn classify_entity(identifier: &str) -> Mention {
    let kind = EntityKind::from_identifier(identifier).unwrap_or_else(|| {
        log::debug!("Unknown entity prefix, treating as public key: {}", identifier);
        EntityKind::PublicKey
    });

    Mention {
        kind,
        identifier: identifier.to_string(),
        decoded_pubkey: None,
        decoded_event_id: None,
    }
}

/// Raw values carried by a decoded entity, hex encoded
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodedEntity {
    pub pubkey: Option<String>,
    pub event_id: Option<String>,
}

/// Turns a bech32 entity identifier into its raw public key / event ID
pub trait EntityDecoder {
    fn decode(&self, identifier: &str) -> Result<DecodedEntity, String>;
}

/// [`EntityDecoder`] backed by the `nostr` crate's NIP-19 implementation
#[derive(Clone, Copy, Debug, Default)]
pub struct Nip19Decoder;

impl EntityDecoder for Nip19Decoder {
    fn decode(&self, identifier: &str) -> Result<DecodedEntity, String> {
        let nip19 = Nip19::from_bech32(identifier)
            .map_err(|e| format!("Failed to decode {}: {}", identifier, e))?;

        match nip19 {
            Nip19::Pubkey(pubkey) => Ok(DecodedEntity {
                pubkey: Some(pubkey.to_hex()),
                event_id: None,
            }),
            Nip19::Profile(profile) => Ok(DecodedEntity {
                pubkey: Some(profile.public_key.to_hex()),
                event_id: None,
            }),
            Nip19::EventId(event_id) => Ok(DecodedEntity {
                pubkey: None,
                event_id: Some(event_id.to_hex()),
            }),
            Nip19::Event(event) => Ok(DecodedEntity {
                pubkey: event.author.map(|author| author.to_hex()),
                event_id: Some(event.event_id.to_hex()),
            }),
            Nip19::Coordinate(coordinate) => Ok(DecodedEntity {
                pubkey: Some(coordinate.coordinate.public_key.to_hex()),
                event_id: None,
            }),
            _ => Err(format!("Unsupported entity in content: {}", identifier)),
        }
    }
}

/// Parse the public key a profile reference points at
///
/// Accepts 64-char hex, `npub1...` and `nprofile1...`. Event and address
/// identifiers are rejected even though some of them carry an author.
pub fn parse_pubkey(input: &str) -> Result<PublicKey, String> {
    match EntityKind::from_identifier(input) {
        Some(kind) if kind.is_profile() => match Nip19::from_bech32(input) {
            Ok(Nip19::Pubkey(pubkey)) => Ok(pubkey),
            Ok(Nip19::Profile(profile)) => Ok(profile.public_key),
            Ok(_) => Err(format!("Prefix does not match payload: {}", input)),
            Err(e) => Err(format!("Failed to decode {}: {}", input, e)),
        },
        Some(kind) => Err(format!("{} identifier is not a profile: {}", kind.bech32_prefix(), input)),
        None => PublicKey::from_hex(input).map_err(|e| format!("Invalid pubkey format: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NPUB: &str = "npub10elfcs4fr0l0r8af98jlmgdh9c8tcxjvz9qkw038js35mp4dma8qzvjptg";
    const HEX: &str = "7e7e9c42a91bfef19fa929e5fda1b72e0ebc1a4c1141673e2794234d86addf4e";

    #[test]
    fn test_classify_known_prefixes() {
        assert_eq!(classify_entity("npub1abc").kind, EntityKind::PublicKey);
        assert_eq!(classify_entity("nprofile1abc").kind, EntityKind::ProfileRef);
        assert_eq!(classify_entity("note1abc").kind, EntityKind::Note);
        assert_eq!(classify_entity("nevent1abc").kind, EntityKind::EventRef);
        assert_eq!(classify_entity("naddr1abc").kind, EntityKind::AddressRef);
    }

    #[test]
    fn test_classify_unknown_prefix_defaults_to_pubkey() {
        let mention = classify_entity("nrelay1abc");
        assert_eq!(mention.kind, EntityKind::PublicKey);
        assert_eq!(mention.identifier, "nrelay1abc");
        assert!(mention.decoded_pubkey.is_none());
        assert!(mention.decoded_event_id.is_none());
    }

    #[test]
    fn test_prefix_needs_separator() {
        assert_eq!(EntityKind::from_identifier("npubxyz"), None);
        assert_eq!(EntityKind::from_identifier("notes1abc"), None);
        assert_eq!(EntityKind::from_identifier("note1abc"), Some(EntityKind::Note));
    }

    #[test]
    fn test_kind_groups() {
        assert!(EntityKind::PublicKey.is_profile());
        assert!(EntityKind::ProfileRef.is_profile());
        assert!(EntityKind::Note.is_event());
        assert!(EntityKind::AddressRef.is_event());
    }

    #[test]
    fn test_decode_npub() {
        let decoded = Nip19Decoder.decode(NPUB).unwrap();
        assert_eq!(decoded.pubkey.as_deref(), Some(HEX));
        assert_eq!(decoded.event_id, None);
    }

    #[test]
    fn test_decode_invalid_checksum() {
        let result = Nip19Decoder.decode("npub1xxxx");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_pubkey() {
        assert_eq!(parse_pubkey(NPUB).unwrap().to_hex(), HEX);
        assert_eq!(parse_pubkey(HEX).unwrap().to_hex(), HEX);
        assert!(parse_pubkey("not-a-key").is_err());
        assert!(parse_pubkey("npub1xxxx").is_err());
    }

    #[test]
    fn test_parse_pubkey_rejects_event_identifiers() {
        let err = parse_pubkey("note1qqqq").unwrap_err();
        assert!(err.starts_with("note identifier is not a profile"));
    }
}
