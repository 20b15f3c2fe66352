//! # Notice-Board Service
//!
//! CRUD for notices and the site-wide scrolling ticker, with the ownership
//! rules of the content lifecycle: only the creating identity may edit or
//! delete a notice (administrators may touch orphaned rows whose creator
//! was removed). Notice create/edit accept `multipart/form-data` with a
//! `json` field carrying the notice fields followed by an optional `file`
//! attachment that is streamed into the media store.
//!
//! ## Registered routes (under `/api/notices`)
//! - `GET  /` — public listing, `?important=true` filters; counts a view.
//! - `POST /` — create (multipart), gated.
//! - `GET  /scrolling` — ticker texts, `?active=true` filters.
//! - `POST /scrolling`, `POST /scrolling/{id}`, `POST /scrolling/{id}/delete`
//!   — ticker lifecycle, gated, JSON payloads.
//! - `GET  /{id}` — public detail; counts a `notice_{id}` view.
//! - `GET  /{id}/file` — serves the stored attachment with a guessed MIME.
//! - `POST /{id}` — edit (multipart), gated; a replacement attachment
//!   retires the previous one best-effort.
//! - `POST /{id}/delete` — delete, gated; attachment removal is best-effort
//!   and never blocks the row deletion.

mod create;
mod delete;
mod edit;
mod get;
mod list;
mod scrolling;
mod upload;

use actix_web::web::{get, post, scope};
use actix_web::Scope;
use rusqlite::Row;

use common::model::notice::Notice;

const API_PATH: &str = "/api/notices";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/scrolling", get().to(scrolling::list))
        .route("/scrolling", post().to(scrolling::create))
        .route("/scrolling/{id}", post().to(scrolling::edit))
        .route("/scrolling/{id}/delete", post().to(scrolling::delete))
        .route("/{id}", get().to(get::process))
        .route("/{id}", post().to(edit::process))
        .route("/{id}/file", get().to(get::file))
        .route("/{id}/delete", post().to(delete::process))
}

pub(super) const NOTICE_COLUMNS: &str =
    "id, title, content, file_ref, is_important, created_by, created_at, updated_at";

pub(super) fn notice_from_row(row: &Row) -> rusqlite::Result<Notice> {
    Ok(Notice {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        file_ref: row.get(3)?,
        is_important: row.get(4)?,
        created_by: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
