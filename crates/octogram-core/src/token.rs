//! Keyed chat-token codec.
//!
//! A token is base64url(`nonce || ciphertext`) where the ciphertext is the
//! AES-256-GCM encryption of the big-endian chat id. The 12-byte nonce is a
//! truncated keyed MAC of the plaintext, so encoding is deterministic for a
//! given (chat id, key) pair while the GCM tag still rejects any forged or
//! corrupted token. Tokens are never stored; rotating the secret is the only
//! way to invalidate them. No expiry is embedded (a timestamp inside the
//! plaintext would be the extension point).

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::{domain::ChatId, errors::Error, Result};

type HmacSha256 = Hmac<Sha256>;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

#[derive(Clone)]
pub struct TokenCodec {
    cipher: Aes256Gcm,
    nonce_key: [u8; 32],
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let cipher_key = derive_key("octogram.token.cipher", secret);
        let nonce_key = derive_key("octogram.token.nonce", secret);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&cipher_key));
        Self { cipher, nonce_key }
    }

    /// Encode a chat id into an opaque, URL-safe token.
    pub fn encode(&self, chat_id: ChatId) -> Result<String> {
        let plaintext = chat_id.0.to_be_bytes();
        let nonce = self.derive_nonce(&plaintext);
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_slice())
            .map_err(|_| Error::Internal("token encryption failed".to_string()))?;

        let mut raw = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(raw))
    }

    /// Decode a token back into the chat id it was produced from.
    ///
    /// Anything not produced by this codec under the current key fails with
    /// the generic auth error; a forged token never resolves to a chat id.
    pub fn decode(&self, token: &str) -> Result<ChatId> {
        let raw = URL_SAFE_NO_PAD.decode(token).map_err(|_| Error::Auth)?;
        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(Error::Auth);
        }

        let (nonce, ciphertext) = raw.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| Error::Auth)?;

        let bytes: [u8; 8] = plaintext.as_slice().try_into().map_err(|_| Error::Auth)?;
        Ok(ChatId(i64::from_be_bytes(bytes)))
    }

    fn derive_nonce(&self, plaintext: &[u8]) -> [u8; NONCE_LEN] {
        let mut mac =
            HmacSha256::new_from_slice(&self.nonce_key).expect("hmac accepts any key length");
        mac.update(plaintext);
        let digest = mac.finalize().into_bytes();

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&digest[..NONCE_LEN]);
        nonce
    }
}

fn derive_key(label: &str, secret: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(label.as_bytes());
    hasher.update(b":");
    hasher.update(secret.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret")
    }

    #[test]
    fn round_trips_representative_ids() {
        let c = codec();
        for id in [0i64, 1, -1, 42, -1001234567890, i64::MAX, i64::MIN] {
            let token = c.encode(ChatId(id)).unwrap();
            assert_eq!(c.decode(&token).unwrap().0, id);
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        let c = codec();
        let a = c.encode(ChatId(77)).unwrap();
        let b = c.encode(ChatId(77)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn tokens_are_url_safe() {
        let c = codec();
        let token = c.encode(ChatId(-987654321)).unwrap();
        assert!(token
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'));
    }

    #[test]
    fn flipping_any_character_is_rejected() {
        let c = codec();
        let token = c.encode(ChatId(123456789)).unwrap();

        for i in 0..token.len() {
            let mut chars: Vec<char> = token.chars().collect();
            chars[i] = if chars[i] == 'A' { 'B' } else { 'A' };
            let tampered: String = chars.into_iter().collect();
            if tampered == token {
                continue;
            }
            assert!(c.decode(&tampered).is_err(), "position {i} was accepted");
        }
    }

    #[test]
    fn rejects_tokens_from_a_different_key() {
        let other = TokenCodec::new("another-secret");
        let token = other.encode(ChatId(5)).unwrap();
        assert!(matches!(codec().decode(&token), Err(Error::Auth)));
    }

    #[test]
    fn rejects_garbage_input() {
        let c = codec();
        for bad in ["", "abc", "not a token!!", "AAAA", &"A".repeat(200)] {
            assert!(c.decode(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn rejects_truncated_token() {
        let c = codec();
        let token = c.encode(ChatId(99)).unwrap();
        assert!(c.decode(&token[..token.len() - 4]).is_err());
    }
}
