#![cfg(feature = "signed")]

// Signed cookies: readable by the client, but bound to their key and their name.
mod common;

use axum::{Router, extract::Path, routing::get};
use tower_cookie_envelope::{
    CookieConfig, CookieError, DEFAULT_MAX_COOKIE_BYTES, SecretKey, format::MAC_LEN, read_signed,
    write_signed,
};
use tower_cookies::{Cookie, CookieManagerLayer, Cookies};

fn routes(key: SecretKey) -> Router {
    let config = CookieConfig::default().with_secure(false);
    let write_key = key.clone();
    let write_as_a_key = key.clone();
    let write_as_a_config = config.clone();
    let write_prefixed_key = key.clone();
    let write_prefixed_config = config.clone();
    let sized_key = key.clone();
    let sized_config = config.clone();

    Router::new()
        .route(
            "/write",
            get(move |cookies: Cookies| async move {
                common::render_unit(write_signed(
                    &cookies,
                    &config,
                    "test",
                    b"value",
                    write_key.as_bytes(),
                ))
            }),
        )
        .route(
            "/write-a",
            get(move |cookies: Cookies| async move {
                common::render_unit(write_signed(
                    &cookies,
                    &write_as_a_config,
                    "a",
                    b"value",
                    write_as_a_key.as_bytes(),
                ))
            }),
        )
        .route(
            "/write-prefixed",
            get(move |cookies: Cookies| async move {
                common::render_unit(write_signed(
                    &cookies,
                    &write_prefixed_config,
                    "testab",
                    b"c",
                    write_prefixed_key.as_bytes(),
                ))
            }),
        )
        .route(
            "/write-sized/{len}",
            get(move |cookies: Cookies, Path(len): Path<usize>| async move {
                common::render_unit(write_signed(
                    &cookies,
                    &sized_config,
                    "test",
                    &vec![b'x'; len],
                    sized_key.as_bytes(),
                ))
            }),
        )
        .route(
            "/read",
            get(move |cookies: Cookies| async move {
                common::render(read_signed(&cookies, "test", key.as_bytes()))
            }),
        )
        .layer(CookieManagerLayer::new())
}

async fn issue(app: &Router) -> Cookie<'static> {
    let res = common::send(app, "/write", None).await;
    common::get_cookie_from_headers(res.headers(), "test")
}

#[tokio::test]
async fn signed_roundtrip() {
    let app = routes(SecretKey::generate());

    let cookie = issue(&app).await;
    let res = common::send(&app, "/read", Some(common::cookie_header_value(&cookie))).await;

    assert_eq!(common::body_string(res.into_body()).await, "value");
}

#[tokio::test]
async fn envelope_is_mac_name_value() {
    let app = routes(SecretKey::generate());

    let cookie = issue(&app).await;

    assert_eq!(common::decoded_len(&cookie), MAC_LEN + "test".len() + "value".len());
}

#[tokio::test]
async fn any_bit_flip_is_rejected() {
    let app = routes(SecretKey::generate());

    let cookie = issue(&app).await;
    for bit in 0..common::decoded_len(&cookie) * 8 {
        let tampered = common::flip_bit(&cookie, bit);
        let res = common::send(&app, "/read", Some(common::cookie_header_value(&tampered))).await;

        assert_eq!(
            common::body_string(res.into_body()).await,
            common::error_body(CookieError::InvalidValue),
            "bit {bit} flip accepted"
        );
    }
}

#[tokio::test]
async fn other_key_is_rejected() {
    let issuer = routes(SecretKey::generate());
    let verifier = routes(SecretKey::generate());

    let cookie = issue(&issuer).await;
    let res = common::send(&verifier, "/read", Some(common::cookie_header_value(&cookie))).await;

    assert_eq!(
        common::body_string(res.into_body()).await,
        common::error_body(CookieError::InvalidValue)
    );
}

#[tokio::test]
async fn relabelled_cookie_is_rejected() {
    let app = routes(SecretKey::generate());

    let res = common::send(&app, "/write-a", None).await;
    let issued = common::get_cookie_from_headers(res.headers(), "a");
    let relabelled = Cookie::new("test", issued.value().to_owned());
    let res = common::send(&app, "/read", Some(common::cookie_header_value(&relabelled))).await;

    assert_eq!(
        common::body_string(res.into_body()).await,
        common::error_body(CookieError::InvalidValue)
    );
}

#[tokio::test]
async fn short_value_is_rejected() {
    let app = routes(SecretKey::generate());

    let res = common::send(&app, "/read", Some("test=c2hvcnQ".to_string())).await;

    assert_eq!(
        common::body_string(res.into_body()).await,
        common::error_body(CookieError::InvalidValue)
    );
}

#[tokio::test]
async fn name_prefix_cannot_absorb_value() {
    let app = routes(SecretKey::generate());

    // Issued as "testab" = "c"; the same bytes read as "test" would give "abc".
    let res = common::send(&app, "/write-prefixed", None).await;
    let issued = common::get_cookie_from_headers(res.headers(), "testab");
    let relabelled = Cookie::new("test", issued.value().to_owned());
    let res = common::send(&app, "/read", Some(common::cookie_header_value(&relabelled))).await;

    assert_eq!(
        common::body_string(res.into_body()).await,
        common::error_body(CookieError::InvalidValue)
    );
}

#[tokio::test]
async fn oversized_value_is_rejected() {
    let app = routes(SecretKey::generate());

    let res = common::send(&app, "/write-sized/4000", None).await;

    assert!(res.headers().get(http::header::SET_COOKIE).is_none());
    assert_eq!(
        common::body_string(res.into_body()).await,
        common::error_body(CookieError::ValueTooLong)
    );
}

#[tokio::test]
async fn size_ceiling_counts_mac_and_name() {
    let app = routes(SecretKey::generate());

    // MAC (32) + "test" (4) + 3033 bytes = 3069 bytes, 4092 base64url characters.
    // With the 4-byte name that is exactly the ceiling.
    let res = common::send(&app, "/write-sized/3033", None).await;
    let cookie = common::get_cookie_from_headers(res.headers(), "test");

    assert_eq!(
        cookie.name().len() + cookie.value().len(),
        DEFAULT_MAX_COOKIE_BYTES
    );
    assert_eq!(common::body_string(res.into_body()).await, "ok");

    let res = common::send(&app, "/read", Some(common::cookie_header_value(&cookie))).await;

    assert_eq!(common::body_string(res.into_body()).await, "x".repeat(3033));

    let res = common::send(&app, "/write-sized/3034", None).await;

    assert!(res.headers().get(http::header::SET_COOKIE).is_none());
    assert_eq!(
        common::body_string(res.into_body()).await,
        common::error_body(CookieError::ValueTooLong)
    );
}
