//! The email confirmation link handler and the page shown when a link does not work.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::html;
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        UserID,
        confirmation::{ConfirmationType, consume_confirmation_token},
        confirm_user, normalize_redirect_url, set_auth_cookie,
    },
    endpoints,
    html::{base, link, log_in_register},
};

/// The state needed to confirm an account and start a session.
#[derive(Debug, Clone)]
pub struct ConfirmState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ConfirmState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<ConfirmState> for Key {
    fn from_ref(state: &ConfirmState) -> Self {
        state.cookie_key.clone()
    }
}

/// The query parameters of a confirmation link.
///
/// Every field is optional so that a mangled link reaches the handler and is
/// sent to the error page instead of being rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmQuery {
    pub token_hash: Option<String>,
    #[serde(rename = "type")]
    pub confirmation_type: Option<String>,
    pub next: Option<String>,
}

fn confirm_account(query: &ConfirmQuery, connection: &mut Connection) -> Result<UserID, Error> {
    let (Some(token_hash), Some(confirmation_type)) =
        (query.token_hash.as_deref(), query.confirmation_type.as_deref())
    else {
        return Err(Error::InvalidConfirmationToken);
    };
    let confirmation_type: ConfirmationType = confirmation_type.parse()?;

    let transaction = connection.transaction()?;
    let user_id = consume_confirmation_token(token_hash, confirmation_type, &transaction)?;
    confirm_user(user_id, &transaction)?;
    transaction.commit()?;

    Ok(user_id)
}

/// Handler for the link in the confirmation email.
///
/// A valid token confirms the account, logs the user in and redirects to the
/// `next` page. Anything else redirects to the auth error page.
pub async fn get_auth_confirm(
    State(state): State<ConfirmState>,
    jar: PrivateCookieJar,
    Query(query): Query<ConfirmQuery>,
) -> Response {
    let result = match state.db_connection.lock() {
        Ok(mut connection) => confirm_account(&query, &mut connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    let user_id = match result {
        Ok(user_id) => user_id,
        Err(Error::InvalidConfirmationToken) => {
            tracing::warn!(
                "Rejected confirmation link with type {:?}",
                query.confirmation_type
            );
            return Redirect::to(endpoints::AUTH_ERROR_VIEW).into_response();
        }
        Err(error) => {
            tracing::error!("Could not confirm account: {error}");
            return Redirect::to(endpoints::AUTH_ERROR_VIEW).into_response();
        }
    };

    let next = query
        .next
        .as_deref()
        .and_then(normalize_redirect_url)
        .unwrap_or_else(|| endpoints::ROOT.to_owned());

    tracing::info!("User {user_id} confirmed their email address");

    match set_auth_cookie(jar, user_id, state.cookie_duration) {
        Ok(jar) => (jar, Redirect::to(&next)).into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            Redirect::to(endpoints::LOG_IN_VIEW).into_response()
        }
    }
}

/// Display the page for confirmation links that are invalid, expired or already used.
pub async fn get_auth_error_page() -> Response {
    let content = html! {
        div class="space-y-4 text-gray-700 dark:text-gray-300"
        {
            p { "This link is invalid or has expired." }
            p class="text-sm"
            {
                "If you already confirmed your account, "
                (link(endpoints::LOG_IN_VIEW, "log in here"))
                ". Otherwise "
                (link(endpoints::SIGN_UP_VIEW, "sign up again"))
                "."
            }
        }
    };
    let content = log_in_register("Something went wrong", &content);

    (StatusCode::OK, base("Authentication Error", &[], &content)).into_response()
}
