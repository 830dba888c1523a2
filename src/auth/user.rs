//! User accounts: who can log in and what they are allowed to see.

use std::{fmt::Display, str::FromStr};

use email_address::EmailAddress;
use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, auth::PasswordHash, endpoints};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// What a user is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Quarry staff, who see every record and can mark records as paid.
    Staff,
    /// A trucker, who only sees their own records.
    Member,
}

impl Role {
    /// The canonical upper case name used in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "STAFF",
            Role::Member => "MEMBER",
        }
    }

    /// The page a user with this role lands on after logging in.
    pub fn home_page(&self) -> &'static str {
        match self {
            Role::Staff => endpoints::RECORDS_VIEW,
            Role::Member => endpoints::MEMBER_DASHBOARD_VIEW,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STAFF" => Ok(Role::Staff),
            "MEMBER" => Ok(Role::Member),
            other => Err(format!("unknown role \"{other}\"")),
        }
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The email address the user logs in with, always lower case.
    pub email: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// What the user is allowed to do.
    pub role: Role,
    /// When the user confirmed their email address, `None` if they have not yet.
    pub confirmed_at: Option<OffsetDateTime>,
}

impl User {
    /// Whether the user has confirmed their email address.
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at.is_some()
    }
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                role TEXT NOT NULL CHECK (role IN ('STAFF', 'MEMBER')),
                confirmed_at TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Normalise an email address for storage and lookups.
///
/// # Errors
///
/// Returns [Error::InvalidEmail] if `email` is not a valid email address.
pub fn normalize_email(email: &str) -> Result<String, Error> {
    let email = email.trim().to_lowercase();

    if EmailAddress::is_valid(&email) {
        Ok(email)
    } else {
        Err(Error::InvalidEmail(email))
    }
}

const USER_COLUMNS: &str = "id, email, password, role, confirmed_at";

/// Create and insert a new, unconfirmed user into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::InvalidEmail] if `email` is not a valid email address,
/// - [Error::DuplicateEmail] if an account already uses `email`,
/// - or [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(
    email: &str,
    password_hash: PasswordHash,
    role: Role,
    connection: &Connection,
) -> Result<User, Error> {
    let email = normalize_email(email)?;

    let user = connection
        .prepare(&format!(
            "INSERT INTO user (email, password, role) VALUES (?1, ?2, ?3) RETURNING {USER_COLUMNS}"
        ))?
        .query_row(
            (email, password_hash.as_str(), role.as_str()),
            map_user_row,
        )?;

    Ok(user)
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = :id"))?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user that logs in with `email`. The lookup ignores case.
///
/// # Errors
///
/// This function will return a:
/// - [Error::NotFound] if no user has the email address,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE email = :email"))?
        .query_row(&[(":email", &email.trim().to_lowercase())], map_user_row)
        .map_err(|error| error.into())
}

/// Change the role of the user `user_id`.
///
/// # Errors
///
/// This function will return a [Error::NotFound] if the user does not exist.
pub fn set_user_role(user_id: UserID, role: Role, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET role = ?1 WHERE id = ?2",
        (role.as_str(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Mark the email address of the user `user_id` as confirmed.
///
/// Confirming an already confirmed user keeps the original confirmation time.
///
/// # Errors
///
/// This function will return a [Error::NotFound] if the user does not exist.
pub fn confirm_user(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!(
            "UPDATE user SET confirmed_at = COALESCE(confirmed_at, ?1) WHERE id = ?2 \
            RETURNING {USER_COLUMNS}"
        ))?
        .query_row(
            (OffsetDateTime::now_utc(), user_id.as_i64()),
            map_user_row,
        )
        .map_err(|error| error.into())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_password_hash: String = row.get(2)?;
    let raw_role: String = row.get(3)?;
    let role = raw_role.parse().map_err(|error: String| {
        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, error.into())
    })?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        email: row.get(1)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        role,
        confirmed_at: row.get(4)?,
    })
}
