use actix_web::{web, HttpResponse};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Deserialize;

use common::model::project::Project;

use crate::db::AppState;
use crate::error::PortalError;
use crate::page_views;

use super::{parse_kind, project_from_row, PROJECT_COLUMNS};

#[derive(Deserialize)]
pub struct ListQuery {
    kind: Option<String>,
}

pub async fn process(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    let rows = list_projects(&conn, query.kind.as_deref())?;
    page_views::record_view_best_effort(&conn, "projects");
    Ok(HttpResponse::Ok().json(rows))
}

pub async fn detail(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    let sql = format!("SELECT {} FROM projects WHERE id = ?1", PROJECT_COLUMNS);
    let row = conn
        .query_row(&sql, params![path.into_inner()], project_from_row)
        .optional()?
        .ok_or(PortalError::NotFound)?;
    Ok(HttpResponse::Ok().json(row))
}

pub fn list_projects(conn: &Connection, kind: Option<&str>) -> Result<Vec<Project>, PortalError> {
    match kind {
        Some(raw) => {
            let kind = parse_kind(raw)?;
            let sql = format!(
                "SELECT {} FROM projects WHERE kind = ?1 ORDER BY start_date DESC",
                PROJECT_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![kind.as_str()], project_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        }
        None => {
            let sql =
                format!("SELECT {} FROM projects ORDER BY start_date DESC", PROJECT_COLUMNS);
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], project_from_row)?.collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::services::projects::save::create_project;
    use crate::session::Actor;
    use chrono::NaiveDate;
    use common::requests::ProjectPayload;

    fn payload(kind: &str) -> ProjectPayload {
        ProjectPayload {
            title: format!("{} project", kind),
            description: "d".into(),
            kind: kind.into(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: None,
            is_ongoing: true,
            funding_agency: None,
            budget: None,
            outcome: None,
        }
    }

    #[test]
    fn listing_works_with_and_without_the_kind_filter() {
        let conn = db::memory_conn();
        conn.execute(
            "INSERT INTO identities (username, email, password_md5) VALUES ('s', 's@x', 'h')",
            [],
        )
        .unwrap();
        let actor = Actor { identity_id: 1, is_admin: false };
        create_project(&conn, actor, &payload("research")).unwrap();
        create_project(&conn, actor, &payload("thesis")).unwrap();

        assert_eq!(list_projects(&conn, None).unwrap().len(), 2);
        let filtered = list_projects(&conn, Some("thesis")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "thesis project");
        assert!(matches!(
            list_projects(&conn, Some("hobby")),
            Err(PortalError::Validation(_))
        ));
    }
}
