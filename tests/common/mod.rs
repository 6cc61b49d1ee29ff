#![allow(dead_code)]

// Shared helpers for integration tests.
//
// Requests go through a real `tower_cookies::CookieManagerLayer`, so values are parsed from the
// `Cookie` header and emitted in `Set-Cookie` exactly as a browser would see them.
use axum::{Router, body::Body};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use http::{HeaderMap, Request, Response, header};
use http_body_util::BodyExt as _;
use tower::ServiceExt as _;
use tower_cookie_envelope::Result;
use tower_cookies::Cookie;

pub async fn body_string(body: Body) -> String {
    // Collect an Axum body into a UTF-8 string for assertions.
    let bytes = body
        .collect()
        .await
        .expect("body collects successfully")
        .to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

pub async fn send(app: &Router, uri: &str, cookie: Option<String>) -> Response<Body> {
    // One request against `app`, optionally carrying a `Cookie` header.
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let req = builder
        .body(Body::empty())
        .expect("request builds successfully");
    app.clone()
        .oneshot(req)
        .await
        .expect("service call succeeds")
}

pub fn render(result: Result<Vec<u8>>) -> String {
    // Handlers report either the decoded value or the error kind as the response body.
    match result {
        Ok(value) => String::from_utf8_lossy(&value).into_owned(),
        Err(err) => format!("error: {err}"),
    }
}

pub fn render_unit(result: Result<()>) -> String {
    match result {
        Ok(()) => "ok".to_string(),
        Err(err) => format!("error: {err}"),
    }
}

pub fn error_body(err: tower_cookie_envelope::CookieError) -> String {
    format!("error: {err}")
}

pub fn set_cookies(headers: &HeaderMap) -> Vec<Cookie<'static>> {
    // Every `Set-Cookie` header on a response, parsed.
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| {
            let value = value.to_str().expect("set-cookie header is valid utf-8");
            Cookie::parse(value.to_owned()).expect("set-cookie parses successfully")
        })
        .collect()
}

pub fn get_cookie_from_headers(headers: &HeaderMap, name: &str) -> Cookie<'static> {
    set_cookies(headers)
        .into_iter()
        .find(|cookie| cookie.name() == name)
        .expect("response sets the named cookie")
}

pub fn cookie_header_value(cookie: &Cookie<'_>) -> String {
    // Encode a cookie for use in a `Cookie` request header.
    cookie.stripped().to_string()
}

pub fn flip_bit(cookie: &Cookie<'_>, bit: usize) -> Cookie<'static> {
    // Copy of `cookie` with a single bit of its decoded transport value flipped.
    let mut bytes = URL_SAFE_NO_PAD
        .decode(cookie.value())
        .expect("transport value is base64url");
    bytes[bit / 8] ^= 1 << (bit % 8);
    Cookie::new(cookie.name().to_owned(), URL_SAFE_NO_PAD.encode(bytes))
}

pub fn decoded_len(cookie: &Cookie<'_>) -> usize {
    URL_SAFE_NO_PAD
        .decode(cookie.value())
        .expect("transport value is base64url")
        .len()
}
