//! One-time tokens that confirm a user's email address.
//!
//! Only a SHA-256 digest of each token is stored, so a leaked database cannot
//! be used to confirm accounts.

use std::{fmt::Write, str::FromStr};

use rand::Rng;
use rusqlite::Connection;
use sha2::{Digest, Sha256};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::UserID};

/// How long a confirmation link stays valid.
pub const CONFIRMATION_TOKEN_DURATION: Duration = Duration::hours(24);

/// What a confirmation link confirms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationType {
    /// A newly signed up account.
    Signup,
    /// A changed email address.
    Email,
}

impl ConfirmationType {
    /// The value used in the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmationType::Signup => "signup",
            ConfirmationType::Email => "email",
        }
    }
}

impl FromStr for ConfirmationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signup" => Ok(ConfirmationType::Signup),
            "email" => Ok(ConfirmationType::Email),
            _ => Err(Error::InvalidConfirmationToken),
        }
    }
}

/// Create the email confirmation table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_email_confirmation_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS email_confirmation (
                token_digest TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL,
                type TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Create a confirmation token for `user_id` and return the value for the link.
///
/// # Errors
///
/// Returns an [Error::SqlError] if the token could not be stored.
pub fn issue_confirmation_token(
    user_id: UserID,
    confirmation_type: ConfirmationType,
    connection: &Connection,
) -> Result<String, Error> {
    let token_hash = random_token();

    connection.execute(
        "INSERT INTO email_confirmation (token_digest, user_id, type, expires_at)
         VALUES (?1, ?2, ?3, ?4)",
        (
            digest(&token_hash),
            user_id.as_i64(),
            confirmation_type.as_str(),
            OffsetDateTime::now_utc() + CONFIRMATION_TOKEN_DURATION,
        ),
    )?;

    Ok(token_hash)
}

/// Check a confirmation token and use it up.
///
/// Returns the ID of the user the token was issued to.
///
/// # Errors
///
/// Returns [Error::InvalidConfirmationToken] if the token is unknown, was
/// issued for a different type of confirmation, has expired or was already used.
pub fn consume_confirmation_token(
    token_hash: &str,
    confirmation_type: ConfirmationType,
    connection: &Connection,
) -> Result<UserID, Error> {
    let row = connection
        .prepare(
            "DELETE FROM email_confirmation WHERE token_digest = ?1 AND type = ?2
             RETURNING user_id, expires_at",
        )?
        .query_row((digest(token_hash), confirmation_type.as_str()), |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, OffsetDateTime>(1)?))
        });

    let (user_id, expires_at) = match row {
        Ok(row) => row,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Err(Error::InvalidConfirmationToken),
        Err(error) => return Err(error.into()),
    };

    if expires_at < OffsetDateTime::now_utc() {
        tracing::info!("Confirmation token for user {user_id} expired at {expires_at}");
        return Err(Error::InvalidConfirmationToken);
    }

    Ok(UserID::new(user_id))
}

fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill(&mut bytes);

    to_hex(&bytes)
}

fn digest(token_hash: &str) -> String {
    to_hex(&Sha256::digest(token_hash.as_bytes()))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut hex, byte| {
            // Writing to a String cannot fail.
            let _ = write!(hex, "{byte:02x}");
            hex
        })
}
