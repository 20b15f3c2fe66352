//! Research/thesis/industry/academic projects.

mod delete;
mod list;
mod save;

use actix_web::web::{get, post, scope};
use actix_web::Scope;
use rusqlite::Row;

use common::model::project::{Project, ProjectKind};

use crate::error::PortalError;

const API_PATH: &str = "/api/projects";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(save::create))
        .route("/{id}", get().to(list::detail))
        .route("/{id}", post().to(save::edit))
        .route("/{id}/delete", post().to(delete::process))
}

pub(super) const PROJECT_COLUMNS: &str =
    "id, title, description, kind, start_date, end_date, is_ongoing, funding_agency, budget,
     outcome, created_by, created_at, updated_at";

pub(super) fn project_from_row(row: &Row) -> rusqlite::Result<Project> {
    let kind_raw: String = row.get(3)?;
    let kind = ProjectKind::parse(&kind_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("unknown project kind '{}'", kind_raw).into(),
        )
    })?;
    Ok(Project {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        kind,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
        is_ongoing: row.get(6)?,
        funding_agency: row.get(7)?,
        budget: row.get(8)?,
        outcome: row.get(9)?,
        created_by: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

pub(super) fn parse_kind(raw: &str) -> Result<ProjectKind, PortalError> {
    ProjectKind::parse(raw)
        .ok_or_else(|| PortalError::validation(format!("unknown project kind '{}'", raw)))
}
