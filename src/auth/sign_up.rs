//! The sign-up page where truckers create a member account.
//!
//! A new account cannot log in until the email address is confirmed with the
//! link from [issue_confirmation_token].

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{
        PasswordHash, Role, UserID, ValidatedPassword,
        confirmation::{ConfirmationType, issue_confirmation_token},
        create_user,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, email_input, link,
        loading_spinner, log_in_register, password_input,
    },
    internal_server_error::get_internal_server_error_redirect,
    profile::create_profile,
};

/// The minimum number of characters the password should have to be considered valid on the
/// client side (server-side validation is done on top of this validation).
const PASSWORD_INPUT_MIN_LENGTH: u8 = 10;

/// The error messages to show next to each field of the sign-up form.
#[derive(Debug, Default)]
struct SignUpErrors<'a> {
    email: Option<&'a str>,
    trucker_name: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
}

fn trucker_name_input(trucker_name: &str, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="trucker_name"
                class=(FORM_LABEL_STYLE)
            {
                "Trucker Name"
            }

            input
                type="text"
                name="trucker_name"
                id="trucker_name"
                placeholder="Juan Dela Cruz"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                value=(trucker_name);

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

fn confirm_password_input(min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="confirm-password"
                class=(FORM_LABEL_STYLE)
            {
                "Confirm Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(min_length)
                autofocus[error_message.is_some()]
            ;

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

fn sign_up_form(email: &str, trucker_name: &str, errors: SignUpErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::SIGN_UP_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (email_input(email, errors.email))
            (trucker_name_input(trucker_name, errors.trucker_name))
            (password_input("", PASSWORD_INPUT_MIN_LENGTH, errors.password))
            (confirm_password_input(PASSWORD_INPUT_MIN_LENGTH, errors.confirm_password))

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Sign up"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN_VIEW, "Log in here"))
            }
        }
    }
}

/// Display the sign-up page.
pub async fn get_sign_up_page() -> Response {
    let sign_up_form = sign_up_form("", "", SignUpErrors::default());
    let content = log_in_register("Create an account", &sign_up_form);
    base("Sign Up", &[], &content).into_response()
}

/// Display the page telling a new user to open the confirmation link.
pub async fn get_check_email_page() -> Response {
    let content = html! {
        div class="space-y-4 text-gray-700 dark:text-gray-300"
        {
            p { "We sent a confirmation link to your email address." }
            p { "Open the link to activate your account, then log in. The link expires in 24 hours." }
            p class="text-sm" { (link(endpoints::LOG_IN_VIEW, "Back to log in")) }
        }
    };
    let content = log_in_register("Check your email", &content);

    base("Check Your Email", &[], &content).into_response()
}

/// The state needed for creating a new account.
#[derive(Debug, Clone)]
pub struct SignUpState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SignUpState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data entered by the user in the sign-up form.
#[derive(Serialize, Deserialize)]
pub struct SignUpForm {
    pub email: String,
    pub trucker_name: String,
    pub password: String,
    pub confirm_password: String,
}

/// Insert the user and profile and issue the confirmation token as one unit.
fn create_member(
    email: &str,
    trucker_name: &str,
    password_hash: PasswordHash,
    connection: &mut Connection,
) -> Result<(UserID, String), Error> {
    let transaction = connection.transaction()?;

    let user = create_user(email, password_hash, Role::Member, &transaction)?;
    create_profile(user.id, trucker_name, &transaction)?;
    let token_hash = issue_confirmation_token(user.id, ConfirmationType::Signup, &transaction)?;

    transaction.commit()?;

    Ok((user.id, token_hash))
}

fn confirmation_link(token_hash: &str) -> String {
    let query = serde_urlencoded::to_string([
        ("token_hash", token_hash),
        ("type", ConfirmationType::Signup.as_str()),
        ("next", endpoints::ROOT),
    ])
    .unwrap_or_else(|error| {
        tracing::error!("Could not encode confirmation link: {error}");
        String::new()
    });

    format!("{}?{}", endpoints::AUTH_CONFIRM, query)
}

/// Handler for sign-up requests via the POST method.
///
/// On success the client is redirected to the "check your email" page and the
/// confirmation link is written to the log. Otherwise, the form is returned
/// with an error message next to the offending field.
pub async fn post_sign_up(
    State(state): State<SignUpState>,
    Form(form): Form<SignUpForm>,
) -> Response {
    let trucker_name = form.trucker_name.trim();
    if trucker_name.is_empty() {
        return sign_up_form(
            &form.email,
            &form.trucker_name,
            SignUpErrors {
                trucker_name: Some("Enter the name printed on your receipts."),
                ..Default::default()
            },
        )
        .into_response();
    }

    let validated_password =
        match ValidatedPassword::new(&form.password, &[&form.email, trucker_name]) {
            Ok(password) => password,
            Err(error) => {
                return sign_up_form(
                    &form.email,
                    &form.trucker_name,
                    SignUpErrors {
                        password: Some(&error.to_string()),
                        ..Default::default()
                    },
                )
                .into_response();
            }
        };

    if form.password != form.confirm_password {
        return sign_up_form(
            &form.email,
            &form.trucker_name,
            SignUpErrors {
                confirm_password: Some("Passwords do not match"),
                ..Default::default()
            },
        )
        .into_response();
    }

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("an error occurred while hashing a password: {error}");

            return get_internal_server_error_redirect();
        }
    };

    let result = match state.db_connection.lock() {
        Ok(mut connection) => {
            create_member(&form.email, trucker_name, password_hash, &mut connection)
        }
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    match result {
        Ok((user_id, token_hash)) => {
            tracing::info!(
                "Created user {user_id}. Confirm the account at {}",
                confirmation_link(&token_hash)
            );

            (
                HxRedirect(endpoints::CHECK_EMAIL_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::DuplicateEmail) => sign_up_form(
            &form.email,
            &form.trucker_name,
            SignUpErrors {
                email: Some("An account with this email address already exists."),
                ..Default::default()
            },
        )
        .into_response(),
        Err(Error::InvalidEmail(_)) => sign_up_form(
            &form.email,
            &form.trucker_name,
            SignUpErrors {
                email: Some("Enter a valid email address."),
                ..Default::default()
            },
        )
        .into_response(),
        Err(error) => {
            tracing::error!("An unhandled error occurred while creating a new user: {error}");

            get_internal_server_error_redirect()
        }
    }
}

#[cfg(test)]
mod sign_up_page_tests {
    use crate::{
        endpoints,
        test_utils::{
            assert_content_type, assert_form_input, assert_form_submit_button,
            assert_hx_endpoint, assert_status_ok, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    use super::{get_check_email_page, get_sign_up_page};

    #[tokio::test]
    async fn render_sign_up_page() {
        let response = get_sign_up_page().await;

        assert_status_ok(&response);
        assert_content_type(&response, "text/html");
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::SIGN_UP_API, "hx-post");
        assert_form_input(&form, "email", "email");
        assert_form_input(&form, "trucker_name", "text");
        assert_form_input(&form, "password", "password");
        assert_form_input(&form, "confirm_password", "password");
        assert_form_submit_button(&form);
    }

    #[tokio::test]
    async fn render_check_email_page() {
        let response = get_check_email_page().await;

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
    }
}
