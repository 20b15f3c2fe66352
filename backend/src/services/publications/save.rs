use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use rusqlite::{params, Connection};

use common::outcome::ActionReply;
use common::requests::PublicationPayload;

use crate::content::{self, require_text, ContentTable};
use crate::db::AppState;
use crate::error::PortalError;
use crate::session::{self, Actor, SessionsState};

use super::parse_kind;

fn validate(payload: &PublicationPayload) -> Result<(), PortalError> {
    require_text(&payload.title, "title")?;
    require_text(&payload.authors, "authors")?;
    parse_kind(&payload.kind)?;
    Ok(())
}

pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    payload: web::Json<PublicationPayload>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let conn = state.conn()?;
    let id = create_publication(&conn, actor, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("publication created", Some(id))))
}

pub async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    path: web::Path<i64>,
    payload: web::Json<PublicationPayload>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let id = path.into_inner();
    let conn = state.conn()?;
    edit_publication(&conn, actor, id, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("publication updated", Some(id))))
}

pub fn create_publication(
    conn: &Connection,
    actor: Actor,
    payload: &PublicationPayload,
) -> Result<i64, PortalError> {
    validate(payload)?;
    conn.execute(
        "INSERT INTO publications (title, authors, kind, venue, publisher, publication_date,
                                   doi, link, abstract_text, created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
        params![
            payload.title,
            payload.authors,
            payload.kind,
            payload.venue,
            payload.publisher,
            payload.publication_date,
            payload.doi,
            payload.link,
            payload.abstract_text,
            actor.identity_id,
            Utc::now()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn edit_publication(
    conn: &Connection,
    actor: Actor,
    id: i64,
    payload: &PublicationPayload,
) -> Result<(), PortalError> {
    content::authorize_mutation(conn, ContentTable::Publications, id, actor)?;
    validate(payload)?;
    conn.execute(
        "UPDATE publications SET title = ?1, authors = ?2, kind = ?3, venue = ?4,
                publisher = ?5, publication_date = ?6, doi = ?7, link = ?8,
                abstract_text = ?9, updated_at = ?10
         WHERE id = ?11",
        params![
            payload.title,
            payload.authors,
            payload.kind,
            payload.venue,
            payload.publisher,
            payload.publication_date,
            payload.doi,
            payload.link,
            payload.abstract_text,
            Utc::now(),
            id
        ],
    )?;
    Ok(())
}
