use actix_web::{web, HttpResponse};
use mime_guess::from_path;
use rusqlite::{params, Connection, OptionalExtension};

use common::model::notice::Notice;

use crate::db::AppState;
use crate::error::PortalError;
use crate::page_views;
use crate::storage::MediaStore;

use super::{notice_from_row, NOTICE_COLUMNS};

pub async fn process(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, PortalError> {
    let id = path.into_inner();
    let conn = state.conn()?;
    let notice = get_notice(&conn, id)?;
    page_views::record_view_best_effort(&conn, &format!("notice_{}", id));
    Ok(HttpResponse::Ok().json(notice))
}

/// Serves the stored attachment inline with a MIME type guessed from the
/// stored name.
pub async fn file(
    state: web::Data<AppState>,
    media: web::Data<MediaStore>,
    path: web::Path<i64>,
) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    let notice = get_notice(&conn, path.into_inner())?;
    let file_ref = notice.file_ref.ok_or(PortalError::NotFound)?;
    let bytes = media
        .read(&file_ref)
        .map_err(|_| PortalError::NotFound)?;
    let mime = from_path(&file_ref).first_or_octet_stream();
    Ok(HttpResponse::Ok().content_type(mime.as_ref()).body(bytes))
}

pub fn get_notice(conn: &Connection, id: i64) -> Result<Notice, PortalError> {
    let sql = format!("SELECT {} FROM notices WHERE id = ?1", NOTICE_COLUMNS);
    conn.query_row(&sql, params![id], notice_from_row)
        .optional()?
        .ok_or(PortalError::NotFound)
}
