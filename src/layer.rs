use std::{
    borrow::Cow,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use http::{Request, Response};
use tower_cookies::{CookieManager, Cookies};
use tower_layer::Layer;
use tower_service::Service;

use crate::{
    config::CookieConfig,
    controller::CookieCodec,
    session::{DEFAULT_SESSION_COOKIE_NAME, SessionCookie, SessionPolicy, SessionSettings},
};

#[cfg(feature = "dangerous-plaintext")]
use crate::controller::PlainCookie;
#[cfg(feature = "encrypted")]
use crate::controller::EncryptedCookie;
#[cfg(feature = "signed")]
use crate::controller::SignedCookie;
#[cfg(any(feature = "signed", feature = "encrypted"))]
use crate::key::SecretKey;

/// Installs a [`SessionCookie`] handle in every request's extensions.
///
/// Wraps the inner service in [`CookieManager`], so no separate `CookieManagerLayer` is needed.
#[derive(Debug, Clone)]
pub struct SessionCookieLayer<C: CookieCodec> {
    name: Cow<'static, str>,
    config: CookieConfig,
    policy: SessionPolicy,
    codec: C,
}

impl<C: CookieCodec> SessionCookieLayer<C> {
    #[must_use]
    pub fn new(codec: C) -> Self {
        Self {
            name: DEFAULT_SESSION_COOKIE_NAME.into(),
            config: CookieConfig::default(),
            policy: SessionPolicy::default(),
            codec,
        }
    }

    #[must_use]
    pub fn with_name<N: Into<Cow<'static, str>>>(mut self, name: N) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: CookieConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: SessionPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_codec<C2: CookieCodec>(self, codec: C2) -> SessionCookieLayer<C2> {
        SessionCookieLayer {
            name: self.name,
            config: self.config,
            policy: self.policy,
            codec,
        }
    }
}

#[cfg(feature = "dangerous-plaintext")]
impl SessionCookieLayer<PlainCookie> {
    /// Session ids in readable, unauthenticated cookies.
    ///
    /// This offers **no tamper resistance**: a client can set any session id it likes. Only for
    /// testing and debugging.
    #[must_use]
    pub fn plain() -> Self {
        Self::new(PlainCookie)
    }
}

#[cfg(feature = "signed")]
impl SessionCookieLayer<SignedCookie> {
    #[must_use]
    pub fn signed(key: impl Into<SecretKey>) -> Self {
        Self::new(SignedCookie::new(key))
    }
}

#[cfg(feature = "encrypted")]
impl SessionCookieLayer<EncryptedCookie> {
    #[must_use]
    pub fn encrypted(key: impl Into<SecretKey>) -> Self {
        Self::new(EncryptedCookie::new(key))
    }
}

impl<S, C: CookieCodec + Clone> Layer<S> for SessionCookieLayer<C> {
    type Service = CookieManager<SessionCookieManager<S>>;

    fn layer(&self, inner: S) -> Self::Service {
        let settings = SessionSettings::new(
            self.name.clone(),
            Arc::new(self.codec.clone()),
            self.config.clone(),
            self.policy,
        );
        CookieManager::new(SessionCookieManager {
            inner,
            settings: Arc::new(settings),
        })
    }
}

#[derive(Debug, Clone)]
pub struct SessionCookieManager<S> {
    inner: S,
    settings: Arc<SessionSettings>,
}

impl<ReqBody, ResBody, S> Service<Request<ReqBody>> for SessionCookieManager<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Default + Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let settings = self.settings.clone();

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let Some(cookies) = req.extensions().get::<Cookies>().cloned() else {
                tracing::error!("cookie jar missing from request extensions");
                let mut res = Response::default();
                *res.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
                return Ok(res);
            };

            req.extensions_mut()
                .insert(SessionCookie::new(cookies, settings));

            inner.call(req).await
        })
    }
}
