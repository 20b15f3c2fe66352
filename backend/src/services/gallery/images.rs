use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use rusqlite::{params, Connection, Row};

use common::model::gallery::GalleryImage;
use common::outcome::ActionReply;
use common::requests::GalleryImagePayload;

use crate::content::{self, require_text, ContentTable};
use crate::db::AppState;
use crate::error::PortalError;
use crate::page_views;
use crate::session::{self, Actor, SessionsState};
use crate::storage::MediaStore;

fn from_row(row: &Row) -> rusqlite::Result<GalleryImage> {
    Ok(GalleryImage {
        id: row.get(0)?,
        title: row.get(1)?,
        image_ref: row.get(2)?,
        created_by: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    let rows = list_images(&conn)?;
    page_views::record_view_best_effort(&conn, "gallery");
    Ok(HttpResponse::Ok().json(rows))
}

pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    payload: web::Json<GalleryImagePayload>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let conn = state.conn()?;
    let id = create_image(&conn, actor, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("image added", Some(id))))
}

pub async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    media: web::Data<MediaStore>,
    path: web::Path<i64>,
    payload: web::Json<GalleryImagePayload>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let id = path.into_inner();
    let conn = state.conn()?;
    if let Some(old) = edit_image(&conn, actor, id, &payload)? {
        media.remove(&old);
    }
    Ok(HttpResponse::Ok().json(ActionReply::success("image updated", Some(id))))
}

pub async fn delete(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    media: web::Data<MediaStore>,
    path: web::Path<i64>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let conn = state.conn()?;
    delete_image(&conn, &media, actor, path.into_inner())?;
    Ok(HttpResponse::Ok().json(ActionReply::success("image removed", None)))
}

pub fn list_images(conn: &Connection) -> Result<Vec<GalleryImage>, PortalError> {
    let mut stmt = conn.prepare(
        "SELECT id, title, image_ref, created_by, created_at, updated_at
         FROM gallery_images ORDER BY created_at DESC",
    )?;
    let rows = stmt.query_map([], from_row)?.collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn create_image(
    conn: &Connection,
    actor: Actor,
    payload: &GalleryImagePayload,
) -> Result<i64, PortalError> {
    require_text(&payload.title, "title")?;
    require_text(&payload.image_ref, "image_ref")?;
    conn.execute(
        "INSERT INTO gallery_images (title, image_ref, created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        params![payload.title, payload.image_ref, actor.identity_id, Utc::now()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Returns the reference of a displaced image so the caller can retire the
/// old blob best-effort after the row change.
pub fn edit_image(
    conn: &Connection,
    actor: Actor,
    id: i64,
    payload: &GalleryImagePayload,
) -> Result<Option<String>, PortalError> {
    content::authorize_mutation(conn, ContentTable::GalleryImages, id, actor)?;
    require_text(&payload.title, "title")?;
    require_text(&payload.image_ref, "image_ref")?;
    let old_ref: String = conn.query_row(
        "SELECT image_ref FROM gallery_images WHERE id = ?1",
        params![id],
        |r| r.get(0),
    )?;
    conn.execute(
        "UPDATE gallery_images SET title = ?1, image_ref = ?2, updated_at = ?3 WHERE id = ?4",
        params![payload.title, payload.image_ref, Utc::now(), id],
    )?;
    Ok((old_ref != payload.image_ref).then_some(old_ref))
}

/// Gallery rows reference stored images; removal of the blob is
/// best-effort, the row delete always goes through.
pub fn delete_image(
    conn: &Connection,
    media: &MediaStore,
    actor: Actor,
    id: i64,
) -> Result<(), PortalError> {
    content::authorize_mutation(conn, ContentTable::GalleryImages, id, actor)?;
    let image_ref: String = conn.query_row(
        "SELECT image_ref FROM gallery_images WHERE id = ?1",
        params![id],
        |r| r.get(0),
    )?;
    media.remove(&image_ref);
    conn.execute("DELETE FROM gallery_images WHERE id = ?1", params![id])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn seed_actor(conn: &Connection) -> Actor {
        conn.execute(
            "INSERT INTO identities (username, email, password_md5) VALUES ('s', 's@x', 'h')",
            [],
        )
        .unwrap();
        Actor { identity_id: conn.last_insert_rowid(), is_admin: false }
    }

    fn payload(image_ref: &str) -> GalleryImagePayload {
        GalleryImagePayload { title: "Orientation day".into(), image_ref: image_ref.into() }
    }

    #[test]
    fn replacing_the_image_reports_the_displaced_reference() {
        let conn = db::memory_conn();
        let actor = seed_actor(&conn);
        let id = create_image(&conn, actor, &payload("old.jpg")).unwrap();

        let displaced = edit_image(&conn, actor, id, &payload("new.jpg")).unwrap();
        assert_eq!(displaced.as_deref(), Some("old.jpg"));
        let current: String = conn
            .query_row("SELECT image_ref FROM gallery_images WHERE id = ?1", params![id], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(current, "new.jpg");
    }

    #[test]
    fn keeping_the_same_image_displaces_nothing() {
        let conn = db::memory_conn();
        let actor = seed_actor(&conn);
        let id = create_image(&conn, actor, &payload("same.jpg")).unwrap();

        let displaced = edit_image(&conn, actor, id, &payload("same.jpg")).unwrap();
        assert_eq!(displaced, None);
    }
}
