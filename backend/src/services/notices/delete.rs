use actix_web::{web, HttpRequest, HttpResponse};
use rusqlite::{params, Connection};

use common::outcome::ActionReply;

use crate::content::{self, ContentTable};
use crate::db::AppState;
use crate::error::PortalError;
use crate::session::{self, Actor, SessionsState};
use crate::storage::MediaStore;

pub async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    media: web::Data<MediaStore>,
    path: web::Path<i64>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let conn = state.conn()?;
    delete_notice(&conn, &media, actor, path.into_inner())?;
    Ok(HttpResponse::Ok().json(ActionReply::success("notice deleted", None)))
}

/// Deletes a notice after the ownership check. The attachment, if any, is
/// removed from storage first, best-effort: a failed unlink is logged inside
/// the store and never aborts the row deletion.
pub fn delete_notice(
    conn: &Connection,
    media: &MediaStore,
    actor: Actor,
    id: i64,
) -> Result<(), PortalError> {
    content::authorize_mutation(conn, ContentTable::Notices, id, actor)?;

    let file_ref: Option<String> =
        conn.query_row("SELECT file_ref FROM notices WHERE id = ?1", params![id], |r| r.get(0))?;
    if let Some(file_ref) = file_ref {
        media.remove(&file_ref);
    }

    conn.execute("DELETE FROM notices WHERE id = ?1", params![id])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::services::notices::create::create_notice;
    use common::requests::NoticePayload;
    use tempfile::TempDir;

    fn setup() -> (Connection, MediaStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let media = MediaStore::new(dir.path()).unwrap();
        (db::memory_conn(), media, dir)
    }

    fn seed_actor(conn: &Connection, username: &str) -> Actor {
        conn.execute(
            "INSERT INTO identities (username, email, password_md5) VALUES (?1, 'x@x', 'h')",
            params![username],
        )
        .unwrap();
        Actor { identity_id: conn.last_insert_rowid(), is_admin: false }
    }

    fn payload() -> NoticePayload {
        NoticePayload { title: "t".into(), content: "c".into(), is_important: false }
    }

    #[test]
    fn delete_removes_row_and_stored_file() {
        let (conn, media, _dir) = setup();
        let actor = seed_actor(&conn, "a");
        let file_ref = media.store("seminar.pdf", b"bytes").unwrap();
        let id = create_notice(&conn, actor, &payload(), Some(&file_ref)).unwrap();

        delete_notice(&conn, &media, actor, id).unwrap();
        let remaining: i64 =
            conn.query_row("SELECT COUNT(*) FROM notices", [], |r| r.get(0)).unwrap();
        assert_eq!(remaining, 0);
        assert!(media.read(&file_ref).is_err());
    }

    #[test]
    fn delete_succeeds_when_the_file_is_already_gone() {
        let (conn, media, _dir) = setup();
        let actor = seed_actor(&conn, "a");
        let id = create_notice(&conn, actor, &payload(), Some("vanished.pdf")).unwrap();

        delete_notice(&conn, &media, actor, id).unwrap();
        let remaining: i64 =
            conn.query_row("SELECT COUNT(*) FROM notices", [], |r| r.get(0)).unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn non_owner_delete_is_forbidden() {
        let (conn, media, _dir) = setup();
        let owner = seed_actor(&conn, "owner");
        let other = seed_actor(&conn, "other");
        let id = create_notice(&conn, owner, &payload(), None).unwrap();

        assert!(matches!(
            delete_notice(&conn, &media, other, id),
            Err(PortalError::Forbidden)
        ));
    }
}
