//! Reading and writing cookies on a [`Cookies`] jar.
//!
//! The jar is populated from the request's `Cookie` header by
//! [`tower_cookies::CookieManagerLayer`], and cookies added to it become `Set-Cookie` headers on the
//! response.

use tower_cookies::Cookies;

use crate::{
    config::CookieConfig,
    controller::{CookieCodec, PlainCookie},
    error::{CookieError, Result},
};

/// Encode `value` with `codec` and add it to the outgoing cookies.
///
/// The size ceiling is checked on the final transport value, after any signing or encryption.
pub fn write_with<C>(
    codec: &C,
    cookies: &Cookies,
    config: &CookieConfig,
    name: &str,
    value: &[u8],
) -> Result<()>
where
    C: CookieCodec + ?Sized,
{
    let transport = codec.encode(name, value)?;
    add_checked(cookies, config, name, transport)
}

/// Look up `name` on the incoming cookies and decode it with `codec`.
pub fn read_with<C>(codec: &C, cookies: &Cookies, name: &str) -> Result<Vec<u8>>
where
    C: CookieCodec + ?Sized,
{
    let transport = transport_value(cookies, name)?;
    codec.decode(name, &transport)
}

/// Add a cookie that makes the browser drop `name`.
pub fn remove(cookies: &Cookies, config: &CookieConfig, name: &str) {
    cookies.add(config.removal_cookie(name.to_owned()));
}

pub fn write(cookies: &Cookies, config: &CookieConfig, name: &str, value: &[u8]) -> Result<()> {
    write_with(&PlainCookie, cookies, config, name, value)
}

pub fn read(cookies: &Cookies, name: &str) -> Result<Vec<u8>> {
    read_with(&PlainCookie, cookies, name)
}

#[cfg(feature = "signed")]
pub fn write_signed(
    cookies: &Cookies,
    config: &CookieConfig,
    name: &str,
    value: &[u8],
    key: &[u8],
) -> Result<()> {
    let transport = crate::format::seal_signed(name, value, key)?;
    add_checked(cookies, config, name, transport)
}

#[cfg(feature = "signed")]
pub fn read_signed(cookies: &Cookies, name: &str, key: &[u8]) -> Result<Vec<u8>> {
    let transport = transport_value(cookies, name)?;
    crate::format::open_signed(name, &transport, key)
}

#[cfg(feature = "encrypted")]
pub fn write_encrypted(
    cookies: &Cookies,
    config: &CookieConfig,
    name: &str,
    value: &[u8],
    key: &[u8],
) -> Result<()> {
    let transport = crate::format::seal_encrypted(name, value, key)?;
    add_checked(cookies, config, name, transport)
}

#[cfg(feature = "encrypted")]
pub fn read_encrypted(cookies: &Cookies, name: &str, key: &[u8]) -> Result<Vec<u8>> {
    let transport = transport_value(cookies, name)?;
    crate::format::open_encrypted(name, &transport, key)
}

fn add_checked(
    cookies: &Cookies,
    config: &CookieConfig,
    name: &str,
    transport: String,
) -> Result<()> {
    config.check_size(name, &transport)?;
    cookies.add(config.build_cookie(name.to_owned(), transport));
    Ok(())
}

fn transport_value(cookies: &Cookies, name: &str) -> Result<String> {
    cookies
        .get(name)
        .map(|cookie| cookie.value().to_owned())
        .ok_or(CookieError::CookieMissing)
}
