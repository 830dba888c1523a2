//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError,
    transaction::PaymentStatus,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid combination of email and password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The user tried to log in before confirming their email address.
    #[error("the account has not been confirmed")]
    UnconfirmedAccount,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error parsing the date in the cookie or creating the new
    /// expiry date time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format expiry cookie date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The string is not a valid email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// An account with the email address already exists.
    #[error("an account with this email address already exists")]
    DuplicateEmail,

    /// An empty string was used for a trucker name.
    #[error("trucker name cannot be empty")]
    EmptyTruckerName,

    /// A required text field of a form was left empty.
    #[error("{0} cannot be empty")]
    MissingField(&'static str),

    /// The unit volume has no entry in the price list, so no price can be derived.
    #[error("\"{0}\" is not a known unit volume")]
    UnknownUnitVolume(String),

    /// A payment status change that would undo a payment.
    #[error("cannot change payment status from {from} to {to}")]
    InvalidStatusTransition {
        /// The current status of the transaction.
        from: PaymentStatus,
        /// The requested status.
        to: PaymentStatus,
    },

    /// The email confirmation link is unknown, expired or already used.
    #[error("the confirmation token is invalid or has expired")]
    InvalidConfirmationToken,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::UnknownUnitVolume(unit_volume) => (
                StatusCode::BAD_REQUEST,
                Alert {
                    message: "Unknown unit volume".to_owned(),
                    details: format!(
                        "There is no price for \"{unit_volume}\". \
                        Choose one of the listed unit volumes."
                    ),
                },
            ),
            Error::MissingField(field) => (
                StatusCode::BAD_REQUEST,
                Alert {
                    message: "Missing information".to_owned(),
                    details: format!("{field} cannot be empty."),
                },
            ),
            Error::EmptyTruckerName => (
                StatusCode::BAD_REQUEST,
                Alert {
                    message: "Missing information".to_owned(),
                    details: "Trucker name cannot be empty.".to_owned(),
                },
            ),
            Error::InvalidStatusTransition { from, to } => (
                StatusCode::CONFLICT,
                Alert {
                    message: "Could not update payment status".to_owned(),
                    details: format!("A {from} record cannot be changed back to {to}."),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert {
                    message: "Could not find the record".to_owned(),
                    details: "Try refreshing the page to see the latest records.".to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
