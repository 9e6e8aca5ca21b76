// lib.rs - Bencode codec and compact signed tokens

pub mod bencode;
pub mod config;
pub mod token;
pub mod utils;

// Re-export commonly used types
pub use bencode::{decode, encode_bvalue, BValue, BencodeError, Decoder};
pub use config::{Config, ConfigError};
pub use token::{
    parse, verify, verify_and_validate, Algorithm, Claims, Signer, TokenBuilder, TokenError,
    Validation, Verifier,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_bytes::ByteBuf;
    use std::collections::BTreeMap;

    const TORRENT: &[u8] = b"d4:infod6:lengthi170917888e12:piece lengthi262144e4:name30:debian-8.8.0-arm64-netinst.isoe8:announce38:udp://tracker.publicbt.com:80/announce13:announce-listll38:udp://tracker.publicbt.com:80/announceel44:udp://tracker.openbittorrent.com:80/announceee7:comment33:Debian CD from cdimage.debian.orge";

    #[derive(Debug, Deserialize)]
    struct Info {
        length: i64,
        #[serde(rename = "piece length")]
        piece_length: i64,
        name: String,
        pieces: Option<ByteBuf>,
    }

    #[derive(Debug, Deserialize)]
    struct Torrent {
        info: Info,
        announce: String,
        #[serde(rename = "announce-list")]
        announce_list: Vec<Vec<String>>,
        comment: String,
    }

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_decode_simple_bencode() {
        assert_eq!(decode(b"i42e").unwrap(), BValue::Integer(42));
        assert_eq!(decode(b"i0e").unwrap(), BValue::Integer(0));
        assert_eq!(decode(b"4:test").unwrap(), BValue::string("test"));
        assert_eq!(
            decode(b"li1ei2ee").unwrap(),
            BValue::List(vec![BValue::Integer(1), BValue::Integer(2)])
        );
        assert_eq!(
            decode(b"d3:fooi42ee").unwrap().to_json(),
            serde_json::json!({"foo": 42})
        );
    }

    #[test]
    fn test_decode_invalid_bencode() {
        init_logging();
        assert!(decode(b"d").is_err());
        assert!(matches!(decode(b"5:ab"), Err(BencodeError::TruncatedInput)));
        assert!(matches!(decode(b"i-0e"), Err(BencodeError::MalformedInteger(_))));
        assert!(decode(b"invalid").is_err());
    }

    #[test]
    fn test_canonical_encoding() {
        let value = serde_json::json!({"b": 1, "a": 2});
        assert_eq!(bencode::encode_json(&value).unwrap(), b"d1:ai2e1:bi1ee");
    }

    #[test]
    fn test_torrent_round_trip() -> anyhow::Result<()> {
        let value = decode(TORRENT)?;
        assert_eq!(value.lookup_bytes("comment")?, b"Debian CD from cdimage.debian.org");

        // "info" precedes "announce" in the input, so the output is reordered
        let encoded = encode_bvalue(&value);
        assert_eq!(encoded.len(), TORRENT.len());
        assert_ne!(encoded, TORRENT);
        assert_eq!(decode(&encoded)?, value);
        assert!(Decoder::new().require_sorted_keys(true).decode(&encoded).is_ok());
        assert!(matches!(
            Decoder::new().require_sorted_keys(true).decode(TORRENT),
            Err(BencodeError::UnsortedKeys(_))
        ));
        Ok(())
    }

    #[test]
    fn test_encoder_output_matches_serde_bencode() -> anyhow::Result<()> {
        let encoded = encode_bvalue(&decode(TORRENT)?);
        let torrent: Torrent = serde_bencode::from_bytes(&encoded)?;
        assert_eq!(torrent.info.length, 170917888);
        assert_eq!(torrent.info.piece_length, 262144);
        assert_eq!(torrent.info.name, "debian-8.8.0-arm64-netinst.iso");
        assert!(torrent.info.pieces.is_none());
        assert_eq!(torrent.announce, "udp://tracker.publicbt.com:80/announce");
        assert_eq!(torrent.announce_list.len(), 2);
        assert_eq!(torrent.comment, "Debian CD from cdimage.debian.org");
        Ok(())
    }

    #[test]
    fn test_binary_strings_match_serde_bencode() -> anyhow::Result<()> {
        let pieces: Vec<u8> = (0..=255).collect();
        let mut info = BTreeMap::new();
        info.insert(b"length".to_vec(), BValue::Integer(1));
        info.insert(b"piece length".to_vec(), BValue::Integer(16384));
        info.insert(b"name".to_vec(), BValue::string("f"));
        info.insert(b"pieces".to_vec(), BValue::ByteString(pieces.clone()));

        let decoded: Info = serde_bencode::from_bytes(&encode_bvalue(&BValue::Dict(info)))?;
        assert_eq!(decoded.pieces.map(ByteBuf::into_vec), Some(pieces));
        Ok(())
    }

    #[test]
    fn test_sign_verify_round_trip() -> anyhow::Result<()> {
        init_logging();
        let key = token::HmacKey::new(Algorithm::HS256, b"0123456789abcdef0123456789abcdef")?;
        let claims = Claims::new().with_issuer("benchmark").with_subject("user");
        let token = TokenBuilder::new(&key).build(&claims)?;
        assert_eq!(verify(&token, &key)?, claims);

        let other = token::HmacKey::new(Algorithm::HS384, &[7u8; 48])?;
        assert!(matches!(
            verify(&token, &other),
            Err(TokenError::AlgorithmMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_config_drives_decoder_and_keys() -> anyhow::Result<()> {
        let mut config = Config::default();
        config.bencode.max_depth = 2;
        config.token.min_hmac_secret_len = 8;

        let decoder = Decoder::from(&config.bencode);
        assert!(decoder.decode(b"llee").is_ok());
        assert!(matches!(decoder.decode(b"llleee"), Err(BencodeError::DepthExceeded(_))));

        let policy = token::KeyPolicy::from(&config.token);
        assert!(token::HmacKey::with_policy(Algorithm::HS256, b"8 bytes!", &policy).is_ok());
        assert!(token::HmacKey::new(Algorithm::HS256, b"8 bytes!").is_err());
        Ok(())
    }
}
