use actix_web::{web, HttpResponse};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Deserialize;

use common::model::event::Event;

use crate::db::AppState;
use crate::error::PortalError;
use crate::page_views;

use super::{event_from_row, EVENT_COLUMNS};

#[derive(Deserialize)]
pub struct ListQuery {
    upcoming: Option<bool>,
}

pub async fn process(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    let events = list_events(&conn, query.upcoming.unwrap_or(false))?;
    page_views::record_view_best_effort(&conn, "events");
    Ok(HttpResponse::Ok().json(events))
}

pub async fn detail(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    let sql = format!("SELECT {} FROM events WHERE id = ?1", EVENT_COLUMNS);
    let event = conn
        .query_row(&sql, params![path.into_inner()], event_from_row)
        .optional()?
        .ok_or(PortalError::NotFound)?;
    Ok(HttpResponse::Ok().json(event))
}

pub fn list_events(conn: &Connection, upcoming_only: bool) -> Result<Vec<Event>, PortalError> {
    let sql = if upcoming_only {
        format!(
            "SELECT {} FROM events WHERE is_upcoming = 1 ORDER BY start_date",
            EVENT_COLUMNS
        )
    } else {
        format!("SELECT {} FROM events ORDER BY start_date DESC", EVENT_COLUMNS)
    };
    let mut stmt = conn.prepare(&sql)?;
    let events = stmt.query_map([], event_from_row)?.collect::<Result<Vec<_>, _>>()?;
    Ok(events)
}
