//! Helpers for encoding/decoding cookie envelopes.
//!
//! | Mode      | Bytes before base64url                                      | Associated data |
//! |-----------|-------------------------------------------------------------|-----------------|
//! | plain     | `value`                                                     | none            |
//! | signed    | `HMAC-SHA256(key, len(name) ‖ name ‖ value) ‖ name ‖ value` | MAC input       |
//! | encrypted | `nonce(12) ‖ AES-GCM(key, nonce, name ‖ value, aad=name)`   | `name`          |
//!
//! `len(name)` is the name length as a big-endian `u64`. It is part of the MAC input only, so the
//! split between name and value is authenticated without appearing on the wire.
//!
//! Transport values are written as unpadded base64url. The reader accepts padded input as well.
//!
//! Nothing here logs. Every integrity failure maps to [`CookieError::InvalidValue`].

use base64::{
    Engine as _, alphabet,
    engine::{
        DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose::URL_SAFE_NO_PAD,
    },
};

use crate::error::{CookieError, Result};

/// Length of the random nonce at the start of an encrypted envelope.
pub const NONCE_LEN: usize = 12;

/// Length of the HMAC-SHA256 tag at the start of a signed envelope.
pub const MAC_LEN: usize = 32;

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode a value for a plain (unprotected) cookie.
#[must_use]
pub fn encode_plain(value: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(value)
}

/// Decode the transport value of a plain cookie.
pub fn decode_plain(transport: &str) -> Result<Vec<u8>> {
    decode_transport(transport)
}

fn decode_transport(transport: &str) -> Result<Vec<u8>> {
    URL_SAFE_LENIENT
        .decode(transport.as_bytes())
        .map_err(|_| CookieError::InvalidValue)
}

#[cfg(any(feature = "signed", feature = "encrypted"))]
fn bind_name(name: &str, value: &[u8]) -> Vec<u8> {
    let mut bound = Vec::with_capacity(name.len() + value.len());
    bound.extend_from_slice(name.as_bytes());
    bound.extend_from_slice(value);
    bound
}

#[cfg(any(feature = "signed", feature = "encrypted"))]
fn strip_name(name: &str, mut bound: Vec<u8>) -> Result<Vec<u8>> {
    if !bound.starts_with(name.as_bytes()) {
        return Err(CookieError::InvalidValue);
    }
    Ok(bound.split_off(name.len()))
}

#[cfg(feature = "signed")]
mod signed {
    use base64::Engine as _;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    use super::{MAC_LEN, URL_SAFE_NO_PAD, bind_name, decode_transport, strip_name};
    use crate::error::{CookieError, Result};

    type HmacSha256 = Hmac<Sha256>;

    fn keyed_mac(key: &[u8]) -> Result<HmacSha256> {
        if key.is_empty() {
            return Err(CookieError::InvalidKey);
        }
        <HmacSha256 as Mac>::new_from_slice(key).map_err(|_| CookieError::InvalidKey)
    }

    fn mac_over(mut mac: HmacSha256, name: &str, value: &[u8]) -> HmacSha256 {
        mac.update(&(name.len() as u64).to_be_bytes());
        mac.update(name.as_bytes());
        mac.update(value);
        mac
    }

    /// Sign `name ‖ value` and return the transport value `base64url(MAC ‖ name ‖ value)`.
    pub fn seal_signed(name: &str, value: &[u8], key: &[u8]) -> Result<String> {
        let mac = mac_over(keyed_mac(key)?, name, value);
        let tag = mac.finalize().into_bytes();

        let mut envelope = Vec::with_capacity(MAC_LEN + name.len() + value.len());
        envelope.extend_from_slice(&tag);
        envelope.extend_from_slice(&bind_name(name, value));

        Ok(URL_SAFE_NO_PAD.encode(envelope))
    }

    /// Verify a signed transport value issued for `name` and return the inner value.
    pub fn open_signed(name: &str, transport: &str, key: &[u8]) -> Result<Vec<u8>> {
        let mac = keyed_mac(key)?;
        let mut envelope = decode_transport(transport)?;
        if envelope.len() < MAC_LEN {
            return Err(CookieError::InvalidValue);
        }

        let value = strip_name(name, envelope.split_off(MAC_LEN))?;
        // `verify_slice` compares in constant time.
        mac_over(mac, name, &value)
            .verify_slice(&envelope)
            .map_err(|_| CookieError::InvalidValue)?;

        Ok(value)
    }
}

#[cfg(feature = "signed")]
pub use signed::{open_signed, seal_signed};

#[cfg(feature = "encrypted")]
mod encrypted {
    use aes_gcm::{
        Aes128Gcm, Aes256Gcm, AesGcm, Nonce,
        aead::{Aead, KeyInit, Payload, consts::U12},
        aes::Aes192,
    };
    use base64::Engine as _;
    use rand::{RngCore as _, rngs::OsRng};

    use super::{NONCE_LEN, URL_SAFE_NO_PAD, bind_name, decode_transport, strip_name};
    use crate::error::{CookieError, Result};

    type Aes192Gcm = AesGcm<Aes192, U12>;

    /// AES-GCM keyed by the length of the supplied key.
    enum Cipher {
        Aes128(Aes128Gcm),
        Aes192(Aes192Gcm),
        Aes256(Aes256Gcm),
    }

    impl Cipher {
        fn new(key: &[u8]) -> Result<Self> {
            let cipher = match key.len() {
                16 => Aes128Gcm::new_from_slice(key).map(Self::Aes128),
                24 => Aes192Gcm::new_from_slice(key).map(Self::Aes192),
                32 => Aes256Gcm::new_from_slice(key).map(Self::Aes256),
                _ => return Err(CookieError::InvalidKey),
            };
            cipher.map_err(|_| CookieError::InvalidKey)
        }

        fn encrypt(&self, nonce: &[u8], payload: Payload<'_, '_>) -> Result<Vec<u8>> {
            let nonce = Nonce::from_slice(nonce);
            let sealed = match self {
                Self::Aes128(cipher) => cipher.encrypt(nonce, payload),
                Self::Aes192(cipher) => cipher.encrypt(nonce, payload),
                Self::Aes256(cipher) => cipher.encrypt(nonce, payload),
            };
            sealed.map_err(|_| CookieError::InvalidValue)
        }

        fn decrypt(&self, nonce: &[u8], payload: Payload<'_, '_>) -> Result<Vec<u8>> {
            let nonce = Nonce::from_slice(nonce);
            let opened = match self {
                Self::Aes128(cipher) => cipher.decrypt(nonce, payload),
                Self::Aes192(cipher) => cipher.decrypt(nonce, payload),
                Self::Aes256(cipher) => cipher.decrypt(nonce, payload),
            };
            opened.map_err(|_| CookieError::InvalidValue)
        }
    }

    /// Returns `true` when `key` can be used for encrypted cookies (16, 24 or 32 bytes).
    #[must_use]
    pub fn is_valid_encryption_key(key: &[u8]) -> bool {
        matches!(key.len(), 16 | 24 | 32)
    }

    /// Encrypt `name ‖ value` under a fresh nonce with `name` as associated data.
    pub fn seal_encrypted(name: &str, value: &[u8], key: &[u8]) -> Result<String> {
        let cipher = Cipher::new(key)?;

        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let plaintext = bind_name(name, value);
        let ciphertext = cipher.encrypt(
            &nonce,
            Payload {
                msg: &plaintext,
                aad: name.as_bytes(),
            },
        )?;

        let mut envelope = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&ciphertext);

        Ok(URL_SAFE_NO_PAD.encode(envelope))
    }

    /// Decrypt an encrypted transport value issued for `name` and return the inner value.
    pub fn open_encrypted(name: &str, transport: &str, key: &[u8]) -> Result<Vec<u8>> {
        let cipher = Cipher::new(key)?;
        let envelope = decode_transport(transport)?;
        if envelope.len() < NONCE_LEN {
            return Err(CookieError::InvalidValue);
        }

        let (nonce, ciphertext) = envelope.split_at(NONCE_LEN);
        let plaintext = cipher.decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad: name.as_bytes(),
            },
        )?;

        strip_name(name, plaintext)
    }
}

#[cfg(feature = "encrypted")]
pub use encrypted::{is_valid_encryption_key, open_encrypted, seal_encrypted};
