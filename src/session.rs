//! Session identifiers carried in a cookie.
//!
//! The cookie only holds the identifier. Mapping it to a user and an expiry is left to the
//! application's own session store, which consults [`SessionPolicy`] to decide when a session is
//! stale or due for refresh.

use std::{borrow::Cow, fmt, str::FromStr, sync::Arc};

use axum_core::{
    extract::FromRequestParts,
    response::{IntoResponse, Response},
};
use http::{StatusCode, request::Parts};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    config::CookieConfig,
    controller::CookieCodec,
    cookies,
    error::{CookieError, Result},
};

pub const DEFAULT_SESSION_COOKIE_NAME: &str = "sessionid";

/// Random session identifier, transported as its canonical hyphenated string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    fn from_cookie_value(bytes: &[u8]) -> Result<Self> {
        std::str::from_utf8(bytes)
            .map_err(|_| CookieError::InvalidValue)?
            .parse()
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SessionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for SessionId {
    type Err = CookieError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| CookieError::InvalidValue)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

/// Session lifetime and refresh window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    ttl: Duration,
    refresh_within: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::weeks(2),
            refresh_within: Duration::hours(24),
        }
    }
}

impl SessionPolicy {
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_refresh_within(mut self, refresh_within: Duration) -> Self {
        self.refresh_within = refresh_within;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn refresh_within(&self) -> Duration {
        self.refresh_within
    }

    /// Expiry for a session issued at `now`.
    pub fn expires_at(&self, now: OffsetDateTime) -> OffsetDateTime {
        now + self.ttl
    }

    pub fn is_expired(&self, expires_at: OffsetDateTime, now: OffsetDateTime) -> bool {
        expires_at <= now
    }

    /// A live session whose remaining lifetime has dropped below the refresh window.
    pub fn needs_refresh(&self, expires_at: OffsetDateTime, now: OffsetDateTime) -> bool {
        !self.is_expired(expires_at, now) && expires_at - now < self.refresh_within
    }
}

/// Shared, immutable settings behind every [`SessionCookie`] handed out by a layer.
#[derive(Debug)]
pub(crate) struct SessionSettings {
    pub(crate) name: Cow<'static, str>,
    pub(crate) codec: Arc<dyn CookieCodec>,
    pub(crate) config: CookieConfig,
    pub(crate) policy: SessionPolicy,
}

impl SessionSettings {
    pub(crate) fn new(
        name: Cow<'static, str>,
        codec: Arc<dyn CookieCodec>,
        config: CookieConfig,
        policy: SessionPolicy,
    ) -> Self {
        // Session cookies live as long as the session they point at.
        let config = config.with_max_age(policy.ttl());
        Self {
            name,
            codec,
            config,
            policy,
        }
    }
}

/// Per-request access to the session cookie.
///
/// Inserted into request extensions by [`crate::SessionCookieLayer`] and extractable in axum
/// handlers.
#[derive(Clone)]
pub struct SessionCookie {
    cookies: Cookies,
    settings: Arc<SessionSettings>,
}

impl SessionCookie {
    pub(crate) fn new(cookies: Cookies, settings: Arc<SessionSettings>) -> Self {
        Self { cookies, settings }
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn policy(&self) -> SessionPolicy {
        self.settings.policy
    }

    /// Session id presented by the client.
    ///
    /// Fails with [`CookieError::CookieMissing`] when there is no cookie and
    /// [`CookieError::InvalidValue`] when it does not verify or does not hold a session id.
    pub fn id(&self) -> Result<SessionId> {
        let value = cookies::read_with(
            self.settings.codec.as_ref(),
            &self.cookies,
            &self.settings.name,
        )?;
        SessionId::from_cookie_value(&value)
    }

    /// Set the session cookie to `id`, replacing whatever the client sent.
    pub fn issue(&self, id: SessionId) -> Result<()> {
        cookies::write_with(
            self.settings.codec.as_ref(),
            &self.cookies,
            &self.settings.config,
            &self.settings.name,
            id.to_string().as_bytes(),
        )
    }

    /// Issue a cookie for a brand-new session id and return it.
    pub fn rotate(&self) -> Result<SessionId> {
        let id = SessionId::new();
        self.issue(id)?;
        Ok(id)
    }

    /// Tell the client to drop the session cookie.
    pub fn clear(&self) {
        cookies::remove(&self.cookies, &self.settings.config, &self.settings.name);
    }
}

impl fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCookie")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Rejection for the [`SessionCookie`] and [`SessionId`] extractors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionRejection {
    #[error("session cookie layer is not installed")]
    MissingLayer,

    #[error("not authenticated: {0}")]
    Unauthenticated(CookieError),

    #[error("session cookie error: {0}")]
    Internal(CookieError),
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated(_) => {
                (StatusCode::UNAUTHORIZED, "not authenticated").into_response()
            }
            Self::MissingLayer | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for SessionCookie
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<SessionCookie>().cloned().ok_or_else(|| {
            tracing::error!("session cookie layer not found in request extensions");
            SessionRejection::MissingLayer
        })
    }
}

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionCookie::from_request_parts(parts, state).await?;
        session.id().map_err(|err| {
            if err.is_unauthenticated() {
                tracing::debug!(err = %err, cookie = session.name(), "session cookie rejected");
                SessionRejection::Unauthenticated(err)
            } else {
                tracing::error!(err = %err, cookie = session.name(), "session cookie read failed");
                SessionRejection::Internal(err)
            }
        })
    }
}
