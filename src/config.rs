use std::borrow::Cow;

use time::Duration;
use tower_cookies::Cookie;

use crate::{
    SameSite,
    error::{CookieError, Result},
};

/// Default ceiling for `name` plus transport value, matching common browser limits.
pub const DEFAULT_MAX_COOKIE_BYTES: usize = 4096;

/// Environment variable consulted by [`CookieConfig::from_env`].
pub const ENVIRONMENT_VAR: &str = "ENV";

/// Attributes attached to every cookie written through this crate.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub(crate) http_only: bool,
    pub(crate) same_site: SameSite,
    pub(crate) secure: bool,
    pub(crate) path: Cow<'static, str>,
    pub(crate) domain: Option<Cow<'static, str>>,
    pub(crate) max_age: Option<Duration>,
    pub(crate) max_cookie_bytes: usize,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            http_only: true,
            same_site: SameSite::Strict,
            secure: true,
            path: "/".into(),
            domain: None,
            max_age: None,
            max_cookie_bytes: DEFAULT_MAX_COOKIE_BYTES,
        }
    }
}

impl CookieConfig {
    /// Defaults with `Secure` set only when `environment` is `"production"`.
    #[must_use]
    pub fn for_environment(environment: &str) -> Self {
        Self::default().with_secure(environment == "production")
    }

    /// [`CookieConfig::for_environment`] driven by the `ENV` variable. Unset means not production.
    #[must_use]
    pub fn from_env() -> Self {
        let environment = std::env::var(ENVIRONMENT_VAR).unwrap_or_default();
        Self::for_environment(&environment)
    }

    #[must_use]
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn with_path<P: Into<Cow<'static, str>>>(mut self, path: P) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_domain<D: Into<Cow<'static, str>>>(mut self, domain: D) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn without_domain(mut self) -> Self {
        self.domain = None;
        self
    }

    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    #[must_use]
    pub fn without_max_age(mut self) -> Self {
        self.max_age = None;
        self
    }

    #[must_use]
    pub fn with_max_cookie_bytes(mut self, max_cookie_bytes: usize) -> Self {
        self.max_cookie_bytes = max_cookie_bytes;
        self
    }

    pub fn secure(&self) -> bool {
        self.secure
    }

    pub fn max_cookie_bytes(&self) -> usize {
        self.max_cookie_bytes
    }

    /// Reject a transport value that would push the cookie over the size ceiling.
    pub(crate) fn check_size(&self, name: &str, transport: &str) -> Result<()> {
        if name.len() + transport.len() > self.max_cookie_bytes {
            return Err(CookieError::ValueTooLong);
        }
        Ok(())
    }

    pub(crate) fn build_cookie<N>(&self, name: N, transport: String) -> Cookie<'static>
    where
        N: Into<Cow<'static, str>>,
    {
        let mut cookie_builder = Cookie::build((name.into(), transport))
            .http_only(self.http_only)
            .same_site(self.same_site)
            .secure(self.secure)
            .path(self.path.clone());

        if let Some(max_age) = self.max_age {
            cookie_builder = cookie_builder.max_age(max_age);
        }

        if let Some(domain) = self.domain.clone() {
            cookie_builder = cookie_builder.domain(domain);
        }

        cookie_builder.build()
    }

    /// Cookie that makes the browser drop `name`. Path and domain must match the original.
    pub(crate) fn removal_cookie<N>(&self, name: N) -> Cookie<'static>
    where
        N: Into<Cow<'static, str>>,
    {
        let mut cookie = self.build_cookie(name, String::new());
        cookie.set_max_age(Duration::ZERO);
        cookie
    }
}
