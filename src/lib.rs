//! Plain, signed and encrypted cookie envelopes for `tower` and `axum`.
//!
//! Values are written to and read from a [`tower_cookies::Cookies`] jar in one of three modes:
//!
//! - **plain**: base64url only.
//! - **signed**: `HMAC-SHA256(key, len(name) ‖ name ‖ value) ‖ name ‖ value`.
//! - **encrypted**: `nonce ‖ AES-GCM(key, nonce, name ‖ value)` with the cookie name as associated
//!   data.
//!
//! Signed and encrypted cookies are bound to their name. A value issued as `a` fails to decode
//! when presented as `b`. Every integrity failure is reported as [`CookieError::InvalidValue`].
//!
//! [`SessionCookieLayer`] builds on this to carry a session id in a cookie, exposing it to
//! handlers through the [`SessionCookie`] and [`SessionId`] extractors.
//!
//! # Security
//! The `signed` and `encrypted` features are enabled by default. Plain cookies offer **no tamper
//! resistance**: a client can rewrite them freely. Use them only for non-sensitive values or in
//! tests. A session layer over plain cookies, `SessionCookieLayer::plain`, additionally requires
//! the `dangerous-plaintext` feature.

mod config;
mod controller;
mod cookies;
mod error;
pub mod format;
mod key;
pub mod layer;
mod session;

pub use tower_cookies::cookie::SameSite;

pub use crate::config::{CookieConfig, DEFAULT_MAX_COOKIE_BYTES, ENVIRONMENT_VAR};
pub use crate::controller::{CookieCodec, PlainCookie};
pub use crate::cookies::{read, read_with, remove, write, write_with};
pub use crate::error::{CookieError, Result};
pub use crate::key::{GENERATED_KEY_LEN, SecretKey};
pub use crate::layer::SessionCookieLayer;
pub use crate::session::{
    DEFAULT_SESSION_COOKIE_NAME, SessionCookie, SessionId, SessionPolicy, SessionRejection,
};

#[cfg(feature = "signed")]
pub use crate::controller::SignedCookie;
#[cfg(feature = "signed")]
pub use crate::cookies::{read_signed, write_signed};

#[cfg(feature = "encrypted")]
pub use crate::controller::EncryptedCookie;
#[cfg(feature = "encrypted")]
pub use crate::cookies::{read_encrypted, write_encrypted};
