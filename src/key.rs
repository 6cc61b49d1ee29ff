use std::{fmt, sync::Arc};

use rand::{RngCore as _, rngs::OsRng};

use crate::error::{CookieError, Result};

/// Length of keys produced by [`SecretKey::generate`], valid for both signed and encrypted cookies.
pub const GENERATED_KEY_LEN: usize = 32;

/// Process-wide cookie key.
///
/// Loaded once at startup and handed to codecs explicitly. Cloning shares the bytes. The key
/// length is checked by the codec that uses it, so one type serves both signed cookies (any
/// non-empty length) and encrypted cookies (16, 24 or 32 bytes).
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(Arc<[u8]>);

impl SecretKey {
    /// Random key of [`GENERATED_KEY_LEN`] bytes from the OS CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; GENERATED_KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self::from(bytes)
    }

    /// Decode a hex-encoded key, e.g. the output of `openssl rand -hex 32`.
    pub fn from_hex(hex_key: &str) -> Result<Self> {
        let bytes = hex::decode(hex_key.trim()).map_err(|_| CookieError::InvalidKey)?;
        if bytes.is_empty() {
            return Err(CookieError::InvalidKey);
        }
        Ok(Self::from(bytes))
    }

    /// Read a hex-encoded key from the environment variable `var`.
    pub fn from_env(var: &str) -> Result<Self> {
        let hex_key = std::env::var(var).map_err(|_| CookieError::InvalidKey)?;
        Self::from_hex(&hex_key)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

impl From<Vec<u8>> for SecretKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into())
    }
}

impl From<&[u8]> for SecretKey {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.into())
    }
}

impl<const N: usize> From<[u8; N]> for SecretKey {
    fn from(bytes: [u8; N]) -> Self {
        Self(Arc::new(bytes))
    }
}
