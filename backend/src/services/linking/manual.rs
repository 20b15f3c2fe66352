use actix_web::{web, HttpRequest, HttpResponse};
use rusqlite::{params, Connection, OptionalExtension};

use common::outcome::ActionReply;
use common::requests::{ManualLinkRequest, PersonKind};

use crate::db::AppState;
use crate::error::PortalError;
use crate::session::{self, SessionsState};

pub async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    payload: web::Json<ManualLinkRequest>,
) -> Result<HttpResponse, PortalError> {
    session::require_admin(&req, &sessions).await?;
    let conn = state.conn()?;
    manual_link(&conn, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("linked", Some(payload.person_id))))
}

fn table_for(kind: PersonKind) -> &'static str {
    match kind {
        PersonKind::Faculty => "faculty_members",
        PersonKind::Staff => "staff_members",
    }
}

/// Attach an identity to a person by hand. Relinking the same pair is a
/// no-op; an identity already held by a different person is a conflict.
pub fn manual_link(conn: &Connection, request: &ManualLinkRequest) -> Result<(), PortalError> {
    let table = table_for(request.person);

    let current: Option<Option<i64>> = conn
        .query_row(
            &format!("SELECT user_id FROM {table} WHERE id = ?1"),
            params![request.person_id],
            |row| row.get(0),
        )
        .optional()?;
    let Some(current) = current else {
        return Err(PortalError::NotFound);
    };
    if current == Some(request.identity_id) {
        return Ok(());
    }

    let known: Option<i64> = conn
        .query_row(
            "SELECT id FROM identities WHERE id = ?1",
            params![request.identity_id],
            |row| row.get(0),
        )
        .optional()?;
    if known.is_none() {
        return Err(PortalError::NotFound);
    }

    for other in ["faculty_members", "staff_members"] {
        let holder: Option<i64> = conn
            .query_row(
                &format!("SELECT id FROM {other} WHERE user_id = ?1"),
                params![request.identity_id],
                |row| row.get(0),
            )
            .optional()?;
        if holder.is_some() {
            return Err(PortalError::conflict(
                "identity is already linked to another person",
            ));
        }
    }

    conn.execute(
        &format!("UPDATE {table} SET user_id = ?1 WHERE id = ?2"),
        params![request.identity_id, request.person_id],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn seed(conn: &Connection) -> (i64, i64) {
        conn.execute(
            "INSERT INTO identities (username, email, password_md5) VALUES ('u', 'u@x', 'h')",
            [],
        )
        .unwrap();
        let identity = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO faculty_members (name, designation, status, email)
             VALUES ('F', 'lecturer', 'active', 'f@x')",
            [],
        )
        .unwrap();
        (identity, conn.last_insert_rowid())
    }

    fn link(person: PersonKind, person_id: i64, identity_id: i64) -> ManualLinkRequest {
        ManualLinkRequest { person, person_id, identity_id }
    }

    #[test]
    fn links_and_relinks_idempotently() {
        let conn = db::memory_conn();
        let (identity, person) = seed(&conn);
        manual_link(&conn, &link(PersonKind::Faculty, person, identity)).unwrap();
        // same pair again is fine
        manual_link(&conn, &link(PersonKind::Faculty, person, identity)).unwrap();
    }

    #[test]
    fn identity_held_by_someone_else_conflicts() {
        let conn = db::memory_conn();
        let (identity, person) = seed(&conn);
        manual_link(&conn, &link(PersonKind::Faculty, person, identity)).unwrap();
        conn.execute(
            "INSERT INTO staff_members (name, designation, status, email)
             VALUES ('S', 'officer', 'active', 's@x')",
            [],
        )
        .unwrap();
        let staff = conn.last_insert_rowid();
        let err = manual_link(&conn, &link(PersonKind::Staff, staff, identity)).unwrap_err();
        assert!(matches!(err, PortalError::Conflict(_)));
    }

    #[test]
    fn unknown_person_or_identity_is_not_found() {
        let conn = db::memory_conn();
        let (identity, person) = seed(&conn);
        assert!(matches!(
            manual_link(&conn, &link(PersonKind::Faculty, 99, identity)),
            Err(PortalError::NotFound)
        ));
        assert!(matches!(
            manual_link(&conn, &link(PersonKind::Faculty, person, 99)),
            Err(PortalError::NotFound)
        ));
    }
}
