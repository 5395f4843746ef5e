//! Token transport over cookies, the `Authorization` header and the
//! refresh header.

use axum::http::header::AUTHORIZATION;
use axum::http::header::COOKIE;
use axum::http::header::InvalidHeaderValue;
use axum::http::HeaderMap;
use axum::http::HeaderValue;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";
pub const LOGGED_IN_COOKIE: &str = "logged_in";

/// Header alternative to the `refresh_token` cookie for non-browser clients.
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

/// Cookie attributes shared by all token cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieSettings {
    pub access_max_age_seconds: i64,
    pub refresh_max_age_seconds: i64,
    pub secure: bool,
}

impl CookieSettings {
    pub fn access_cookie(&self, token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
        self.build(ACCESS_TOKEN_COOKIE, token, self.access_max_age_seconds, true)
    }

    pub fn refresh_cookie(&self, token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
        self.build(REFRESH_TOKEN_COOKIE, token, self.refresh_max_age_seconds, true)
    }

    /// Readable by scripts so a frontend can tell whether a session exists.
    pub fn logged_in_cookie(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        self.build(LOGGED_IN_COOKIE, "true", self.access_max_age_seconds, false)
    }

    pub fn cleared(&self, name: &str) -> Result<HeaderValue, InvalidHeaderValue> {
        self.build(name, "", 0, name != LOGGED_IN_COOKIE)
    }

    fn build(
        &self,
        name: &str,
        value: &str,
        max_age: i64,
        http_only: bool,
    ) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!("{name}={value}; Path=/; SameSite=Lax; Max-Age={max_age}");
        if http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut fields = value.split_whitespace();

    match (fields.next(), fields.next()) {
        (Some("Bearer"), Some(token)) => Some(token.to_string()),
        _ => None,
    }
}

/// Value of the named cookie across all `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Bearer header first, then the named cookie.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_value(headers, cookie_name))
}

/// Refresh token from the `refresh_token` cookie, then the refresh header.
///
/// `Authorization` is never consulted: it carries the access token, which is
/// often stale by the time a client refreshes.
pub fn extract_refresh_token(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, REFRESH_TOKEN_COOKIE).or_else(|| {
        headers
            .get(REFRESH_TOKEN_HEADER)?
            .to_str()
            .ok()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}
