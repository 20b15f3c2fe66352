use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection};

use common::outcome::ActionReply;
use common::requests::EventPayload;

use crate::content::{self, require_text, ContentTable};
use crate::db::AppState;
use crate::error::PortalError;
use crate::session::{self, Actor, SessionsState};

/// Write-time derivation of the upcoming flag. An event that is never
/// re-saved after its end date passes keeps reporting `is_upcoming = true`
/// until someone touches it; there is no background sweep.
pub fn derive_upcoming(end_date: NaiveDate, today: NaiveDate) -> bool {
    end_date >= today
}

fn validate(payload: &EventPayload) -> Result<(), PortalError> {
    require_text(&payload.title, "title")?;
    require_text(&payload.description, "description")?;
    if payload.start_date >= payload.end_date {
        return Err(PortalError::validation("start date must be before end date"));
    }
    Ok(())
}

pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    payload: web::Json<EventPayload>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let conn = state.conn()?;
    let id = create_event(&conn, actor, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("event created", Some(id))))
}

pub async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    path: web::Path<i64>,
    payload: web::Json<EventPayload>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let id = path.into_inner();
    let conn = state.conn()?;
    edit_event(&conn, actor, id, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("event updated", Some(id))))
}

pub fn create_event(
    conn: &Connection,
    actor: Actor,
    payload: &EventPayload,
) -> Result<i64, PortalError> {
    validate(payload)?;
    let now = Utc::now();
    conn.execute(
        "INSERT INTO events (title, description, venue, start_date, end_date, is_upcoming,
                             created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        params![
            payload.title,
            payload.description,
            payload.venue,
            payload.start_date,
            payload.end_date,
            derive_upcoming(payload.end_date, now.date_naive()),
            actor.identity_id,
            now
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn edit_event(
    conn: &Connection,
    actor: Actor,
    id: i64,
    payload: &EventPayload,
) -> Result<(), PortalError> {
    content::authorize_mutation(conn, ContentTable::Events, id, actor)?;
    validate(payload)?;
    let now = Utc::now();
    conn.execute(
        "UPDATE events SET title = ?1, description = ?2, venue = ?3, start_date = ?4,
                           end_date = ?5, is_upcoming = ?6, updated_at = ?7
         WHERE id = ?8",
        params![
            payload.title,
            payload.description,
            payload.venue,
            payload.start_date,
            payload.end_date,
            derive_upcoming(payload.end_date, now.date_naive()),
            now,
            id
        ],
    )?;
    Ok(())
}
