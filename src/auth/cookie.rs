//! Reading and writing the encrypted session cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    auth::{UserID, token::Token},
};

/// The name of the cookie holding the session [Token].
pub(crate) const COOKIE_TOKEN: &str = "session";
/// How long a session lasts without activity.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(30);

/// Add the session cookie for `user_id` to `jar`, expiring `duration` from now.
///
/// # Errors
///
/// Returns [Error::JSONSerializationError] if the token cannot be serialized.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = Token {
        user_id,
        expires_at: OffsetDateTime::now_utc() + duration,
    };

    Ok(jar.add(build_cookie(&token)?))
}

/// Overwrite the session cookie with an expired one, which deletes it on the client side.
pub(crate) fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the session token from `jar`.
///
/// # Errors
///
/// Returns a:
/// - [Error::CookieMissing] if there is no session cookie,
/// - [Error::InvalidCredentials] if the cookie cannot be read or the session has expired.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;

    let token: Token = serde_json::from_str(cookie.value_trimmed()).map_err(|error| {
        tracing::debug!("Could not parse session cookie: {error}");
        Error::InvalidCredentials
    })?;

    if token.is_expired() {
        return Err(Error::InvalidCredentials);
    }

    Ok(token)
}

/// Push the expiry of the session cookie out to at least `duration` from now.
///
/// A session that already lasts longer, e.g. after "keep me logged in", is left as is.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned. See [get_token_from_cookies].
pub(crate) fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;
    let extended_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or_else(|| {
            Error::InvalidDateFormat(
                "expiry overflowed".to_owned(),
                token.expires_at.to_string(),
            )
        })?;

    if extended_expiry <= token.expires_at {
        return Ok(jar);
    }

    let token = Token {
        expires_at: extended_expiry,
        ..token
    };

    Ok(jar.add(build_cookie(&token)?))
}

fn build_cookie(token: &Token) -> Result<Cookie<'static>, Error> {
    let value = serde_json::to_string(token)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(Cookie::build((COOKIE_TOKEN, value))
        .path("/")
        .expires(token.expires_at)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .build())
}
