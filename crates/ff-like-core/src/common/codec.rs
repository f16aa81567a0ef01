//! Request codec for the upstream game API.
//!
//! Every request body is a protobuf record encrypted with AES-128 in CBC mode
//! with PKCS#7 padding under a key and IV fixed by the game protocol. The same
//! plaintext always yields the same ciphertext, so one encoded like request is
//! shared by every token in a batch.
//!
//! The key material is not a secret of this service. It is carried in a
//! [`CipherKey`] value so callers and tests can construct codecs explicitly.

use crate::{
    Error, Result,
    proto::{AccountInfo, LikeRequest, PlayerInfo, UidLookup},
    region::Region,
};
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use bytes::Bytes;
use prost::Message;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// Key expected by the game API.
pub const PROTOCOL_KEY: [u8; 16] = *b"Yg&tc%DEuh6%Zc^8";

/// IV expected by the game API.
pub const PROTOCOL_IV: [u8; 16] = *b"6oyZDr22E3ychjM%";

/// AES-128 key and CBC initialization vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CipherKey {
    pub key: [u8; 16],
    pub iv: [u8; 16],
}

impl Default for CipherKey {
    fn default() -> Self {
        Self {
            key: PROTOCOL_KEY,
            iv: PROTOCOL_IV,
        }
    }
}

/// Builds encrypted request bodies and decodes profile responses.
#[derive(Clone, Debug, Default)]
pub struct Codec {
    cipher: CipherKey,
}

impl Codec {
    pub const fn new(cipher: CipherKey) -> Self {
        Self { cipher }
    }

    /// Encodes and encrypts a like request for `user_id` in `region`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EncodingFailed`] if `user_id` is not a signed 64-bit
    /// integer.
    pub fn encode_like(&self, user_id: &str, region: &Region) -> Result<Bytes> {
        let record = LikeRequest {
            uid: parse_user_id(user_id)?,
            region: region.code().to_string(),
        };
        Ok(self.encrypt(&record.encode_to_vec()))
    }

    /// Encodes and encrypts a profile lookup for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EncodingFailed`] if `user_id` is not a signed 64-bit
    /// integer.
    pub fn encode_uid(&self, user_id: &str) -> Result<Bytes> {
        let record = UidLookup {
            saturn: parse_user_id(user_id)?,
            garena: 1,
        };
        Ok(self.encrypt(&record.encode_to_vec()))
    }

    /// Decodes a profile lookup response.
    ///
    /// Responses are plain protobuf; only requests are encrypted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DecodeFailed`] on malformed or truncated input, or
    /// when the record carries no account section.
    pub fn decode_like_count(&self, raw: &[u8]) -> Result<AccountInfo> {
        PlayerInfo::decode(raw)?
            .account_info
            .ok_or_else(|| Error::DecodeFailed {
                reason: "response has no account info".to_string(),
            })
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Bytes {
        let ciphertext = Aes128CbcEnc::new(&self.cipher.key.into(), &self.cipher.iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext);
        Bytes::from(ciphertext)
    }

    /// Inverse of [`Codec::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::DecodeFailed`] if the input is not block aligned or the
    /// padding is invalid.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        Aes128CbcDec::new(&self.cipher.key.into(), &self.cipher.iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|e| Error::DecodeFailed {
                reason: format!("invalid ciphertext: {e}"),
            })
    }
}

fn parse_user_id(user_id: &str) -> Result<i64> {
    user_id
        .trim()
        .parse::<i64>()
        .map_err(|e| Error::EncodingFailed {
            reason: format!("uid {user_id:?} is not numeric: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_bytes(uid: u64, nickname: &str, likes: u32) -> Vec<u8> {
        PlayerInfo {
            account_info: Some(AccountInfo {
                uid,
                nickname: nickname.to_string(),
                likes,
            }),
        }
        .encode_to_vec()
    }

    #[test]
    fn like_request_decrypts_to_original_record() {
        let codec = Codec::default();
        let region = Region::new("IND");

        let ciphertext = codec.encode_like("123456789", &region).unwrap();
        let plaintext = codec.decrypt(&ciphertext).unwrap();

        let expected = LikeRequest {
            uid: 123_456_789,
            region: "IND".to_string(),
        }
        .encode_to_vec();
        assert_eq!(plaintext, expected);
        assert_eq!(LikeRequest::decode(&*plaintext).unwrap().uid, 123_456_789);
    }

    #[test]
    fn ciphertext_is_block_aligned_and_deterministic() {
        let codec = Codec::default();
        let region = Region::new("BR");

        let a = codec.encode_like("42", &region).unwrap();
        let b = codec.encode_like("42", &region).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len() % 16, 0);
        assert!(!a.is_empty());
    }

    #[test]
    fn uid_lookup_sets_garena_flag() {
        let codec = Codec::default();
        let plaintext = codec.decrypt(&codec.encode_uid("987").unwrap()).unwrap();
        let record = UidLookup::decode(&*plaintext).unwrap();
        assert_eq!(record.saturn, 987);
        assert_eq!(record.garena, 1);
    }

    #[test]
    fn non_numeric_uid_fails_encoding() {
        let codec = Codec::default();
        let region = Region::new("IND");

        assert!(matches!(
            codec.encode_like("12ab", &region),
            Err(Error::EncodingFailed { .. })
        ));
        assert!(matches!(
            codec.encode_uid(""),
            Err(Error::EncodingFailed { .. })
        ));
    }

    #[test]
    fn different_keys_produce_different_ciphertext() {
        let region = Region::new("IND");
        let default = Codec::default().encode_like("1", &region).unwrap();
        let other = Codec::new(CipherKey {
            key: [7; 16],
            iv: [9; 16],
        })
        .encode_like("1", &region)
        .unwrap();
        assert_ne!(default, other);
    }

    #[test]
    fn decodes_profile_record() {
        let codec = Codec::default();
        let info = codec
            .decode_like_count(&profile_bytes(100, "Ghost", 50))
            .unwrap();
        assert_eq!(info.uid, 100);
        assert_eq!(info.nickname, "Ghost");
        assert_eq!(info.likes, 50);
    }

    #[test]
    fn truncated_profile_fails_decoding() {
        let codec = Codec::default();
        let bytes = profile_bytes(100, "Ghost", 50);
        let truncated = &bytes[..bytes.len() - 2];

        assert!(matches!(
            codec.decode_like_count(truncated),
            Err(Error::DecodeFailed { .. })
        ));
    }

    #[test]
    fn empty_profile_fails_decoding() {
        let codec = Codec::default();
        assert!(matches!(
            codec.decode_like_count(&[]),
            Err(Error::DecodeFailed { .. })
        ));
    }

    #[test]
    fn garbage_ciphertext_fails_decrypting() {
        let codec = Codec::default();
        assert!(codec.decrypt(&[1, 2, 3]).is_err());
    }
}
