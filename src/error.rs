use thiserror::Error;

/// Errors returned by cookie encoding and decoding.
///
/// Every integrity failure (malformed base64, short buffers, MAC or AEAD tag mismatch, a cookie
/// presented under a different name) is reported as [`CookieError::InvalidValue`]. Callers cannot
/// tell those cases apart, and neither can a client probing the server.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CookieError {
    /// The encoded cookie would exceed the configured size ceiling.
    #[error("cookie value too long")]
    ValueTooLong,

    /// The cookie value could not be decoded or failed verification.
    #[error("invalid cookie value")]
    InvalidValue,

    /// The key is unusable for the requested cookie mode.
    #[error("invalid cookie key")]
    InvalidKey,

    /// The request carries no cookie with the requested name.
    #[error("cookie not present")]
    CookieMissing,
}

impl CookieError {
    /// Whether this error means "the client is not authenticated" rather than a server fault.
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::CookieMissing | Self::InvalidValue)
    }
}

pub type Result<T, E = CookieError> = std::result::Result<T, E>;
