use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use serde::Deserialize;

use common::model::gallery::CarouselItem;
use common::outcome::ActionReply;
use common::requests::CarouselItemPayload;

use crate::content::{self, require_text, ContentTable};
use crate::db::AppState;
use crate::error::PortalError;
use crate::session::{self, Actor, SessionsState};

fn from_row(row: &Row) -> rusqlite::Result<CarouselItem> {
    Ok(CarouselItem {
        id: row.get(0)?,
        title: row.get(1)?,
        caption: row.get(2)?,
        image_ref: row.get(3)?,
        is_active: row.get(4)?,
        display_order: row.get(5)?,
        created_by: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn validate(payload: &CarouselItemPayload) -> Result<(), PortalError> {
    require_text(&payload.title, "title")?;
    require_text(&payload.image_ref, "image_ref")?;
    if payload.display_order < 0 {
        return Err(PortalError::validation("display_order must not be negative"));
    }
    Ok(())
}

#[derive(Deserialize)]
pub struct ListQuery {
    active: Option<bool>,
}

pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    let rows = list_items(&conn, query.active.unwrap_or(false))?;
    Ok(HttpResponse::Ok().json(rows))
}

pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    payload: web::Json<CarouselItemPayload>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let conn = state.conn()?;
    let id = create_item(&conn, actor, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("carousel item created", Some(id))))
}

pub async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    path: web::Path<i64>,
    payload: web::Json<CarouselItemPayload>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let id = path.into_inner();
    let conn = state.conn()?;
    edit_item(&conn, actor, id, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("carousel item updated", Some(id))))
}

pub async fn delete(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let conn = state.conn()?;
    delete_item(&conn, actor, path.into_inner())?;
    Ok(HttpResponse::Ok().json(ActionReply::success("carousel item removed", None)))
}

pub fn list_items(conn: &Connection, active_only: bool) -> Result<Vec<CarouselItem>, PortalError> {
    let sql = if active_only {
        "SELECT id, title, caption, image_ref, is_active, display_order,
                created_by, created_at, updated_at
         FROM carousel_items WHERE is_active = 1 ORDER BY display_order"
    } else {
        "SELECT id, title, caption, image_ref, is_active, display_order,
                created_by, created_at, updated_at
         FROM carousel_items ORDER BY display_order"
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], from_row)?.collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn create_item(
    conn: &Connection,
    actor: Actor,
    payload: &CarouselItemPayload,
) -> Result<i64, PortalError> {
    validate(payload)?;
    conn.execute(
        "INSERT INTO carousel_items (title, caption, image_ref, is_active, display_order,
                                     created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        params![
            payload.title,
            payload.caption,
            payload.image_ref,
            payload.is_active,
            payload.display_order,
            actor.identity_id,
            Utc::now()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn edit_item(
    conn: &Connection,
    actor: Actor,
    id: i64,
    payload: &CarouselItemPayload,
) -> Result<(), PortalError> {
    content::authorize_mutation(conn, ContentTable::CarouselItems, id, actor)?;
    validate(payload)?;
    conn.execute(
        "UPDATE carousel_items SET title = ?1, caption = ?2, image_ref = ?3, is_active = ?4,
                display_order = ?5, updated_at = ?6
         WHERE id = ?7",
        params![
            payload.title,
            payload.caption,
            payload.image_ref,
            payload.is_active,
            payload.display_order,
            Utc::now(),
            id
        ],
    )?;
    Ok(())
}

pub fn delete_item(conn: &Connection, actor: Actor, id: i64) -> Result<(), PortalError> {
    content::authorize_mutation(conn, ContentTable::CarouselItems, id, actor)?;
    conn.execute("DELETE FROM carousel_items WHERE id = ?1", params![id])?;
    Ok(())
}
