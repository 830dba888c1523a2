//! Log-out route handler that invalidates the session cookie and redirects users.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::invalidate_auth_cookie, endpoints};

/// Invalidate the session cookie and redirect the client to the log-in page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    let jar = invalidate_auth_cookie(jar);

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::http::{StatusCode, header::SET_COOKIE};
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::{
        auth::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, UserID, set_auth_cookie},
        endpoints,
        test_utils::get_header,
    };

    use super::get_log_out;

    #[tokio::test]
    async fn log_out_invalidates_session_and_redirects() {
        let jar = PrivateCookieJar::new(Key::from(&Sha512::digest("42")));
        let jar = set_auth_cookie(jar, UserID::new(123), DEFAULT_COOKIE_DURATION).unwrap();

        let response = get_log_out(jar).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_header(&response, "location"), endpoints::LOG_IN_VIEW);

        let session_cookie = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|header| Cookie::parse(header.to_str().unwrap().to_owned()).ok())
            .find(|cookie| cookie.name() == COOKIE_TOKEN)
            .expect("log out should overwrite the session cookie");
        assert_eq!(
            session_cookie.expires_datetime(),
            Some(OffsetDateTime::UNIX_EPOCH)
        );
        assert_eq!(session_cookie.max_age(), Some(Duration::ZERO));
    }
}
