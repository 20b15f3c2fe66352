//! Scrolling-ticker notices: plain JSON lifecycle, same ownership rules as
//! the board.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use serde::Deserialize;

use common::model::notice::ScrollingNotice;
use common::outcome::ActionReply;
use common::requests::ScrollingNoticePayload;

use crate::content::{self, require_text, ContentTable};
use crate::db::AppState;
use crate::error::PortalError;
use crate::session::{self, Actor, SessionsState};

#[derive(Deserialize)]
pub struct ListQuery {
    active: Option<bool>,
}

pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    let rows = list_scrolling(&conn, query.active.unwrap_or(false))?;
    Ok(HttpResponse::Ok().json(rows))
}

pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    payload: web::Json<ScrollingNoticePayload>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let conn = state.conn()?;
    let id = create_scrolling(&conn, actor, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("scrolling notice created", Some(id))))
}

pub async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    path: web::Path<i64>,
    payload: web::Json<ScrollingNoticePayload>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let id = path.into_inner();
    let conn = state.conn()?;
    edit_scrolling(&conn, actor, id, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("scrolling notice updated", Some(id))))
}

pub async fn delete(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let conn = state.conn()?;
    delete_scrolling(&conn, actor, path.into_inner())?;
    Ok(HttpResponse::Ok().json(ActionReply::success("scrolling notice deleted", None)))
}

fn from_row(row: &Row) -> rusqlite::Result<ScrollingNotice> {
    Ok(ScrollingNotice {
        id: row.get(0)?,
        text: row.get(1)?,
        is_active: row.get(2)?,
        created_by: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

pub fn list_scrolling(
    conn: &Connection,
    active_only: bool,
) -> Result<Vec<ScrollingNotice>, PortalError> {
    let sql = if active_only {
        "SELECT id, text, is_active, created_by, created_at, updated_at
         FROM scrolling_notices WHERE is_active = 1 ORDER BY created_at DESC"
    } else {
        "SELECT id, text, is_active, created_by, created_at, updated_at
         FROM scrolling_notices ORDER BY created_at DESC"
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], from_row)?.collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn create_scrolling(
    conn: &Connection,
    actor: Actor,
    payload: &ScrollingNoticePayload,
) -> Result<i64, PortalError> {
    require_text(&payload.text, "text")?;
    conn.execute(
        "INSERT INTO scrolling_notices (text, is_active, created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        params![payload.text, payload.is_active, actor.identity_id, Utc::now()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn edit_scrolling(
    conn: &Connection,
    actor: Actor,
    id: i64,
    payload: &ScrollingNoticePayload,
) -> Result<(), PortalError> {
    content::authorize_mutation(conn, ContentTable::ScrollingNotices, id, actor)?;
    require_text(&payload.text, "text")?;
    conn.execute(
        "UPDATE scrolling_notices SET text = ?1, is_active = ?2, updated_at = ?3 WHERE id = ?4",
        params![payload.text, payload.is_active, Utc::now(), id],
    )?;
    Ok(())
}

pub fn delete_scrolling(conn: &Connection, actor: Actor, id: i64) -> Result<(), PortalError> {
    content::authorize_mutation(conn, ContentTable::ScrollingNotices, id, actor)?;
    conn.execute("DELETE FROM scrolling_notices WHERE id = ?1", params![id])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn seed_actor(conn: &Connection, username: &str) -> Actor {
        conn.execute(
            "INSERT INTO identities (username, email, password_md5) VALUES (?1, 'x@x', 'h')",
            params![username],
        )
        .unwrap();
        Actor { identity_id: conn.last_insert_rowid(), is_admin: false }
    }

    #[test]
    fn active_filter_hides_retired_tickers() {
        let conn = db::memory_conn();
        let actor = seed_actor(&conn, "s");
        let live = ScrollingNoticePayload { text: "admissions open".into(), is_active: true };
        let retired = ScrollingNoticePayload { text: "old ticker".into(), is_active: false };
        create_scrolling(&conn, actor, &live).unwrap();
        create_scrolling(&conn, actor, &retired).unwrap();

        assert_eq!(list_scrolling(&conn, false).unwrap().len(), 2);
        let active = list_scrolling(&conn, true).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text, "admissions open");
    }

    #[test]
    fn ownership_gates_edit_and_delete() {
        let conn = db::memory_conn();
        let owner = seed_actor(&conn, "owner");
        let other = seed_actor(&conn, "other");
        let payload = ScrollingNoticePayload { text: "t".into(), is_active: true };
        let id = create_scrolling(&conn, owner, &payload).unwrap();

        assert!(matches!(
            edit_scrolling(&conn, other, id, &payload),
            Err(PortalError::Forbidden)
        ));
        assert!(matches!(delete_scrolling(&conn, other, id), Err(PortalError::Forbidden)));
        assert!(delete_scrolling(&conn, owner, id).is_ok());
    }
}
