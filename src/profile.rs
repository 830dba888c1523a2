//! Trucker profiles, the display name shown on every record a trucker hauls.

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{Error, auth::UserID};

/// The public details of a user account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    /// The ID of the user the profile belongs to.
    pub id: UserID,
    /// The name recorded on the trucker's transactions.
    pub trucker_name: String,
}

/// Create the profile for the user `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyTruckerName] if `trucker_name` is blank,
/// - or [Error::SqlError] if the user does not exist or there is some other SQL error.
pub fn create_profile(
    id: UserID,
    trucker_name: &str,
    connection: &Connection,
) -> Result<Profile, Error> {
    let trucker_name = trucker_name.trim();

    if trucker_name.is_empty() {
        return Err(Error::EmptyTruckerName);
    }

    let profile = connection
        .prepare(
            "INSERT INTO profile (id, trucker_name) VALUES (?1, ?2) RETURNING id, trucker_name",
        )?
        .query_row((id.as_i64(), trucker_name), map_profile_row)?;

    Ok(profile)
}

/// Get the profile of the user `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the user has no profile,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_profile(id: UserID, connection: &Connection) -> Result<Profile, Error> {
    let profile = connection
        .prepare("SELECT id, trucker_name FROM profile WHERE id = :id")?
        .query_row(&[(":id", &id.as_i64())], map_profile_row)?;

    Ok(profile)
}

/// List every profile, sorted by trucker name.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn list_profiles(connection: &Connection) -> Result<Vec<Profile>, Error> {
    connection
        .prepare("SELECT id, trucker_name FROM profile ORDER BY trucker_name ASC, id ASC")?
        .query_map([], map_profile_row)?
        .map(|maybe_profile| maybe_profile.map_err(Error::from))
        .collect()
}

/// Create the profile table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_profile_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS profile (
                id INTEGER PRIMARY KEY,
                trucker_name TEXT NOT NULL,
                FOREIGN KEY(id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

fn map_profile_row(row: &Row) -> Result<Profile, rusqlite::Error> {
    Ok(Profile {
        id: UserID::new(row.get(0)?),
        trucker_name: row.get(1)?,
    })
}
