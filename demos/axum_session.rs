use std::net::SocketAddr;

use axum::{Router, response::Redirect, routing::get};
use tower_cookie_envelope::{
    CookieConfig, EncryptedCookie, SecretKey, SessionCookie, SessionCookieLayer, SessionId,
    SessionRejection,
};
use tracing_subscriber::EnvFilter;

async fn index(id: Result<SessionId, SessionRejection>) -> Result<String, Redirect> {
    match id {
        Ok(id) => Ok(format!("session={id}")),
        Err(SessionRejection::Unauthenticated(_)) => Err(Redirect::to("/login")),
        Err(err) => Ok(format!("error: {err}")),
    }
}

async fn login(session: SessionCookie) -> Result<Redirect, String> {
    session.rotate().map_err(|err| err.to_string())?;
    Ok(Redirect::to("/"))
}

async fn logout(session: SessionCookie) -> Redirect {
    session.clear();
    Redirect::to("/login")
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // `RANDOM_HEX` holds a hex-encoded 16, 24 or 32 byte key, e.g. `openssl rand -hex 32`.
    let key = SecretKey::from_env("RANDOM_HEX").unwrap_or_else(|err| {
        tracing::warn!(err = %err, "RANDOM_HEX not usable, generating an ephemeral key");
        SecretKey::generate()
    });
    let codec = EncryptedCookie::try_new(key).expect("RANDOM_HEX is a valid AES key length");

    // Default: Secure only when ENV=production
    let config = CookieConfig::from_env();
    let session_layer = SessionCookieLayer::new(codec).with_config(config);

    let app = Router::new()
        .route("/", get(index))
        .route("/login", get(login))
        .route("/logout", get(logout))
        .layer(session_layer);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("tcp listener binds successfully");
    let local_addr = listener.local_addr().expect("local address is available");
    tracing::info!("listening at http://{local_addr}");

    axum::serve(listener, app)
        .await
        .expect("server runs successfully");
}
