//! User database queries.
//!
//! This module provides CRUD operations for the `users` table:
//! insert, list, get, update, and delete.

use rusqlite::Connection;

use bannerhub_common::{Error, Result, UserId};

use crate::models::User;

/// Parse a user from a database row.
///
/// Expects columns in order: id, name, banner.
fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId::from(row.get::<_, i64>(0)?),
        name: row.get(1)?,
        banner: row.get(2)?,
    })
}

/// Insert a new user record.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `name` - User name (the schema rejects NULL; empty names are rejected
///   upstream by the workflow)
/// * `banner` - Public-prefixed path to the stored banner file, if any
///
/// # Returns
///
/// * `Ok(UserId)` - The auto-assigned ID of the inserted row
/// * `Err(Error)` - If a constraint is violated or a database error occurs
pub fn insert_user(conn: &Connection, name: &str, banner: Option<&str>) -> Result<UserId> {
    conn.execute(
        "INSERT INTO users (name, banner) VALUES (:name, :banner)",
        rusqlite::named_params! {
            ":name": name,
            ":banner": banner,
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(UserId::from(conn.last_insert_rowid()))
}

/// Get a user by ID.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `id` - User ID
///
/// # Returns
///
/// * `Ok(Some(User))` - The user if found
/// * `Ok(None)` - If the user does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_user(conn: &Connection, id: UserId) -> Result<Option<User>> {
    let result = conn.query_row(
        "SELECT id, name, banner FROM users WHERE id = :id",
        rusqlite::named_params! { ":id": id.get() },
        parse_user_row,
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get all users in natural storage order.
///
/// # Arguments
///
/// * `conn` - Database connection
///
/// # Returns
///
/// * `Ok(Vec<User>)` - All user records
/// * `Err(Error)` - If a database error occurs
pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn
        .prepare("SELECT id, name, banner FROM users")
        .map_err(|e| Error::database(e.to_string()))?;

    let users = stmt
        .query_map([], parse_user_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(users)
}

/// Update a user's name and banner reference.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `id` - User ID to update
/// * `name` - New name
/// * `banner` - New banner reference
///
/// # Returns
///
/// * `Ok(true)` - If the row was updated
/// * `Ok(false)` - If no row matched the ID
/// * `Err(Error)` - If a database error occurs
pub fn update_user(
    conn: &Connection,
    id: UserId,
    name: &str,
    banner: Option<&str>,
) -> Result<bool> {
    let rows_affected = conn
        .execute(
            "UPDATE users SET name = :name, banner = :banner WHERE id = :id",
            rusqlite::named_params! {
                ":id": id.get(),
                ":name": name,
                ":banner": banner,
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows_affected > 0)
}

/// Delete a user by ID.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `id` - User ID to delete
///
/// # Returns
///
/// * `Ok(true)` - If the row was deleted
/// * `Ok(false)` - If no row matched the ID
/// * `Err(Error)` - If a database error occurs
pub fn delete_user(conn: &Connection, id: UserId) -> Result<bool> {
    let rows_affected = conn
        .execute(
            "DELETE FROM users WHERE id = :id",
            rusqlite::named_params! { ":id": id.get() },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows_affected > 0)
}

/// Get every non-null banner reference in the table.
///
/// Used by the orphan sweep to decide which stored files are still owned
/// by a record.
///
/// # Arguments
///
/// * `conn` - Database connection
///
/// # Returns
///
/// * `Ok(Vec<String>)` - All banner references
/// * `Err(Error)` - If a database error occurs
pub fn list_banner_refs(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT banner FROM users WHERE banner IS NOT NULL")
        .map_err(|e| Error::database(e.to_string()))?;

    let refs = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(refs)
}
