//! Department events. `is_upcoming` is derived from the end date on every
//! save; see `save::derive_upcoming`.

mod delete;
mod list;
mod save;

use actix_web::web::{get, post, scope};
use actix_web::Scope;
use rusqlite::Row;

use common::model::event::Event;

const API_PATH: &str = "/api/events";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(save::create))
        .route("/{id}", get().to(list::detail))
        .route("/{id}", post().to(save::edit))
        .route("/{id}/delete", post().to(delete::process))
}

pub(super) const EVENT_COLUMNS: &str =
    "id, title, description, venue, start_date, end_date, is_upcoming, created_by, created_at, updated_at";

pub(super) fn event_from_row(row: &Row) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        venue: row.get(3)?,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
        is_upcoming: row.get(6)?,
        created_by: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}
