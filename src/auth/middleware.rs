//! Authentication middleware that validates cookies, loads the signed in user,
//! extends sessions and handles redirects.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        Role, UserID,
        cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
        get_user_by_id,
        redirect::{build_log_in_redirect_url, build_log_in_redirect_url_from_target},
    },
    endpoints,
    profile::get_profile,
};

/// How far each request pushes out the session expiry.
const SESSION_EXTENSION: Duration = Duration::minutes(30);

/// The signed in user, available to handlers behind [auth_guard] or [auth_guard_hx].
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    /// The user's ID.
    pub id: UserID,
    /// The email address the user logs in with.
    pub email: String,
    /// The name recorded on the user's transactions.
    pub trucker_name: String,
    /// What the user is allowed to do.
    pub role: Role,
}

impl CurrentUser {
    /// Whether the user is quarry staff.
    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }
}

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

fn load_current_user(user_id: UserID, connection: &Connection) -> Result<CurrentUser, Error> {
    let user = get_user_by_id(user_id, connection)?;
    let trucker_name = match get_profile(user_id, connection) {
        Ok(profile) => profile.trucker_name,
        Err(Error::NotFound) => {
            tracing::warn!("User {user_id} has no profile, showing their email instead.");
            user.email.clone()
        }
        Err(error) => return Err(error),
    };

    Ok(CurrentUser {
        id: user.id,
        email: user.email,
        trucker_name,
        role: user.role,
    })
}

/// Checks for a valid session cookie and loads the signed in user.
///
/// The [CurrentUser] is placed into the request and the request executed
/// normally if the session is valid, otherwise the redirect from `get_redirect`
/// is returned.
#[inline]
async fn auth_guard_internal(
    state: AuthState,
    request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let log_in_redirect_url = build_log_in_redirect_url(&request).unwrap_or_else(|| {
        if request.uri().path().starts_with("/api") {
            tracing::warn!(
                "Missing or invalid HTMX headers for /api request. Falling back to the home page."
            );
        } else {
            tracing::warn!("Invalid redirect URL from request URI. Falling back to the home page.");
        }

        build_log_in_redirect_url_from_target(endpoints::ROOT)
            .unwrap_or_else(|| endpoints::LOG_IN_VIEW.to_owned())
    });

    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to log in page.");
            return get_redirect(&log_in_redirect_url);
        }
    };
    let user_id = match get_token_from_cookies(&jar) {
        Ok(token) => token.user_id,
        Err(_) => return get_redirect(&log_in_redirect_url),
    };

    let current_user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return get_redirect(endpoints::INTERNAL_ERROR_VIEW);
            }
        };

        match load_current_user(user_id, &connection) {
            Ok(current_user) => current_user,
            Err(Error::NotFound) => {
                tracing::warn!("Session for deleted user {user_id}. Redirecting to log in page.");
                return get_redirect(&log_in_redirect_url);
            }
            Err(error) => {
                tracing::error!("Could not load user {user_id}: {error}");
                return get_redirect(endpoints::INTERNAL_ERROR_VIEW);
            }
        }
    };

    parts.extensions.insert(current_user);
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    let jar = match extend_auth_cookie_duration_if_needed(jar.clone(), SESSION_EXTENSION) {
        Ok(updated_jar) => updated_jar,
        Err(err) => {
            tracing::error!("Error extending cookie duration: {err:?}. Rolling back cookie jar.");
            jar
        }
    };
    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        // Handlers such as log out may have already set the session cookie.
        if parts.headers.contains_key(SET_COOKIE) {
            break;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}

/// Middleware for pages that checks for a valid session cookie.
///
/// Visitors without a valid session are redirected to the log-in page.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(user): Extension<CurrentUser>` to receive the signed in user.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// Middleware for htmx API routes that checks for a valid session cookie.
///
/// Visitors without a valid session are sent to the log-in page with an `HX-Redirect`.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(user): Extension<CurrentUser>` to receive the signed in user.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}

/// Middleware that sends anyone who is not staff to the member dashboard.
///
/// Must run after [auth_guard] or [auth_guard_hx], i.e. be added as an inner layer.
pub async fn staff_guard(
    Extension(user): Extension<CurrentUser>,
    request: Request,
    next: Next,
) -> Response {
    if user.is_staff() {
        return next.run(request).await;
    }

    tracing::warn!(
        "User {} tried to access the staff page {}",
        user.id,
        request.uri().path()
    );

    if request.uri().path().starts_with("/api") {
        (
            HxRedirect(endpoints::MEMBER_DASHBOARD_VIEW.to_owned()),
            StatusCode::OK,
        )
            .into_response()
    } else {
        Redirect::to(endpoints::MEMBER_DASHBOARD_VIEW).into_response()
    }
}
