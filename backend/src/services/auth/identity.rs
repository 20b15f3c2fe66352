use rusqlite::{params, Connection, OptionalExtension};

use crate::error::PortalError;
use crate::session::Actor;

/// Passwords are stored as md5 hex digests for compatibility with the
/// legacy account records.
pub fn digest_password(password: &str) -> String {
    format!("{:x}", md5::compute(password.as_bytes()))
}

/// Checks a username/password pair against the identity store. `None` for
/// an unknown user or wrong password; the caller decides how to surface it.
pub fn verify_credentials(
    conn: &Connection,
    username: &str,
    password: &str,
) -> Result<Option<Actor>, PortalError> {
    let digest = digest_password(password);
    let actor = conn
        .query_row(
            "SELECT id, is_admin FROM identities
             WHERE username = ?1 AND password_md5 = ?2",
            params![username, digest],
            |row| {
                Ok(Actor {
                    identity_id: row.get(0)?,
                    is_admin: row.get::<_, i64>(1)? != 0,
                })
            },
        )
        .optional()?;
    Ok(actor)
}

/// Creates a login identity, rejecting duplicate usernames as a conflict.
pub fn create_identity(
    conn: &Connection,
    username: &str,
    email: &str,
    password: &str,
    is_admin: bool,
) -> Result<i64, PortalError> {
    let taken: Option<i64> = conn
        .query_row(
            "SELECT id FROM identities WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )
        .optional()?;
    if taken.is_some() {
        return Err(PortalError::conflict(format!(
            "username '{}' is already taken",
            username
        )));
    }
    conn.execute(
        "INSERT INTO identities (username, email, password_md5, is_admin)
         VALUES (?1, ?2, ?3, ?4)",
        params![username, email, digest_password(password), is_admin],
    )?;
    Ok(conn.last_insert_rowid())
}
