use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use rusqlite::{params, Connection};

use common::outcome::ActionReply;
use common::requests::NoticePayload;

use crate::content::require_text;
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
    payload: Multipart,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let upload = read_upload(payload, &media).await?;

    let conn = state.conn()?;
    match create_notice(&conn, actor, &upload.payload, upload.file_ref.as_deref()) {
        Ok(id) => Ok(HttpResponse::Ok().json(ActionReply::success("notice created", Some(id)))),
        Err(e) => {
            // don't leave the stored attachment behind on a failed insert
            if let Some(r) = &upload.file_ref {
                media.remove(r);
            }
            Err(e)
        }
    }
}

pub fn create_notice(
    conn: &Connection,
    actor: Actor,
    payload: &NoticePayload,
    file_ref: Option<&str>,
) -> Result<i64, PortalError> {
    require_text(&payload.title, "title")?;
    require_text(&payload.content, "content")?;

    conn.execute(
        "INSERT INTO notices (title, content, file_ref, is_important, created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
            payload.title,
            payload.content,
            file_ref,
            payload.is_important,
            actor.identity_id,
            Utc::now()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}
