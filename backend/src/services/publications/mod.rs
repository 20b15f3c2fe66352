//! Research publications: journal articles, conference papers, books and
//! chapters, filterable by kind.

mod delete;
mod list;
mod save;

use actix_web::web::{get, post, scope};
use actix_web::Scope;
use rusqlite::Row;

use common::model::publication::{Publication, PublicationKind};

use crate::error::PortalError;

const API_PATH: &str = "/api/publications";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(save::create))
        .route("/{id}", get().to(list::detail))
        .route("/{id}", post().to(save::edit))
        .route("/{id}/delete", post().to(delete::process))
}

pub(super) const PUBLICATION_COLUMNS: &str =
    "id, title, authors, kind, venue, publisher, publication_date, doi, link, abstract_text,
     created_by, created_at, updated_at";

pub(super) fn publication_from_row(row: &Row) -> rusqlite::Result<Publication> {
    let kind_raw: String = row.get(3)?;
    let kind = PublicationKind::parse(&kind_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("unknown publication kind '{}'", kind_raw).into(),
        )
    })?;
    Ok(Publication {
        id: row.get(0)?,
        title: row.get(1)?,
        authors: row.get(2)?,
        kind,
        venue: row.get(4)?,
        publisher: row.get(5)?,
        publication_date: row.get(6)?,
        doi: row.get(7)?,
        link: row.get(8)?,
        abstract_text: row.get(9)?,
        created_by: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

pub(super) fn parse_kind(raw: &str) -> Result<PublicationKind, PortalError> {
    PublicationKind::parse(raw)
        .ok_or_else(|| PortalError::validation(format!("unknown publication kind '{}'", raw)))
}
