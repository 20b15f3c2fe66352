use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use rusqlite::{params, Connection};

use common::outcome::ActionReply;
use common::requests::NoticePayload;

use crate::content::{self, require_text, ContentTable};
use crate::db::AppState;
use crate::error::PortalError;
use crate::session::{self, Actor, SessionsState};
use crate::storage::MediaStore;

use super::upload::read_upload;

pub async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    media: web::Data<MediaStore>,
    path: web::Path<i64>,
    payload: Multipart,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let id = path.into_inner();
    let upload = read_upload(payload, &media).await?;

    let conn = state.conn()?;
    match edit_notice(&conn, actor, id, &upload.payload, upload.file_ref.as_deref()) {
        Ok(replaced) => {
            if let Some(old) = replaced {
                media.remove(&old);
            }
            Ok(HttpResponse::Ok().json(ActionReply::success("notice updated", Some(id))))
        }
        Err(e) => {
            if let Some(r) = &upload.file_ref {
                media.remove(r);
            }
            Err(e)
        }
    }
}

/// Applies validated updates and refreshes `updated_at` (`created_at` is
/// immutable). Returns the reference of a displaced attachment so the
/// caller can retire it after the row change is committed.
pub fn edit_notice(
    conn: &Connection,
    actor: Actor,
    id: i64,
    payload: &NoticePayload,
    new_file: Option<&str>,
) -> Result<Option<String>, PortalError> {
    content::authorize_mutation(conn, ContentTable::Notices, id, actor)?;
    require_text(&payload.title, "title")?;
    require_text(&payload.content, "content")?;

    let old_ref: Option<String> =
        conn.query_row("SELECT file_ref FROM notices WHERE id = ?1", params![id], |r| r.get(0))?;

    match new_file {
        Some(file_ref) => {
            conn.execute(
                "UPDATE notices SET title = ?1, content = ?2, is_important = ?3,
                        file_ref = ?4, updated_at = ?5
                 WHERE id = ?6",
                params![payload.title, payload.content, payload.is_important, file_ref, Utc::now(), id],
            )?;
            Ok(old_ref)
        }
        None => {
            conn.execute(
                "UPDATE notices SET title = ?1, content = ?2, is_important = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![payload.title, payload.content, payload.is_important, Utc::now(), id],
            )?;
            Ok(None)
        }
    }
}
