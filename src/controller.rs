use std::fmt::Debug;

use crate::{error::Result, format};

#[cfg(any(feature = "signed", feature = "encrypted"))]
use crate::SecretKey;

/// Converts between a cookie value and its transport form.
///
/// Implementations bind `name` into the envelope when they protect it, so a value issued under one
/// cookie name does not decode under another.
pub trait CookieCodec: Debug + Send + Sync + 'static {
    fn encode(&self, name: &str, value: &[u8]) -> Result<String>;
    fn decode(&self, name: &str, transport: &str) -> Result<Vec<u8>>;
}

/// Base64url only. Offers no tamper resistance.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCookie;

impl CookieCodec for PlainCookie {
    fn encode(&self, _name: &str, value: &[u8]) -> Result<String> {
        Ok(format::encode_plain(value))
    }

    fn decode(&self, _name: &str, transport: &str) -> Result<Vec<u8>> {
        format::decode_plain(transport)
    }
}

/// HMAC-SHA256 over the length-prefixed name and the value. The value stays readable by the client.
#[cfg(feature = "signed")]
#[derive(Debug, Clone)]
pub struct SignedCookie {
    key: SecretKey,
}

#[cfg(feature = "signed")]
impl SignedCookie {
    pub fn new(key: impl Into<SecretKey>) -> Self {
        Self { key: key.into() }
    }
}

#[cfg(feature = "signed")]
impl CookieCodec for SignedCookie {
    fn encode(&self, name: &str, value: &[u8]) -> Result<String> {
        format::seal_signed(name, value, self.key.as_bytes())
    }

    fn decode(&self, name: &str, transport: &str) -> Result<Vec<u8>> {
        format::open_signed(name, transport, self.key.as_bytes())
    }
}

/// AES-GCM with `name` as associated data. Key length picks AES-128, AES-192 or AES-256.
#[cfg(feature = "encrypted")]
#[derive(Debug, Clone)]
pub struct EncryptedCookie {
    key: SecretKey,
}

#[cfg(feature = "encrypted")]
impl EncryptedCookie {
    pub fn new(key: impl Into<SecretKey>) -> Self {
        Self { key: key.into() }
    }

    /// Like [`EncryptedCookie::new`], but rejects an unusable key up front instead of on the
    /// first write.
    pub fn try_new(key: impl Into<SecretKey>) -> Result<Self> {
        let key = key.into();
        if !format::is_valid_encryption_key(key.as_bytes()) {
            return Err(crate::CookieError::InvalidKey);
        }
        Ok(Self { key })
    }
}

#[cfg(feature = "encrypted")]
impl CookieCodec for EncryptedCookie {
    fn encode(&self, name: &str, value: &[u8]) -> Result<String> {
        format::seal_encrypted(name, value, self.key.as_bytes())
    }

    fn decode(&self, name: &str, transport: &str) -> Result<Vec<u8>> {
        format::open_encrypted(name, transport, self.key.as_bytes())
    }
}
