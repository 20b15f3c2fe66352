use actix_web::{web, HttpResponse};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Deserialize;

use common::model::publication::Publication;

use crate::db::AppState;
use crate::error::PortalError;
use crate::page_views;

use super::{parse_kind, publication_from_row, PUBLICATION_COLUMNS};

#[derive(Deserialize)]
pub struct ListQuery {
    /// Publication kind filter, e.g. `?kind=journal`.
    kind: Option<String>,
}

pub async fn process(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    let rows = list_publications(&conn, query.kind.as_deref())?;
    page_views::record_view_best_effort(&conn, "publications");
    Ok(HttpResponse::Ok().json(rows))
}

pub async fn detail(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    let sql = format!("SELECT {} FROM publications WHERE id = ?1", PUBLICATION_COLUMNS);
    let row = conn
        .query_row(&sql, params![path.into_inner()], publication_from_row)
        .optional()?
        .ok_or(PortalError::NotFound)?;
    Ok(HttpResponse::Ok().json(row))
}

pub fn list_publications(
    conn: &Connection,
    kind: Option<&str>,
) -> Result<Vec<Publication>, PortalError> {
    match kind {
        Some(raw) => {
            let kind = parse_kind(raw)?;
            let sql = format!(
                "SELECT {} FROM publications WHERE kind = ?1 ORDER BY publication_date DESC",
                PUBLICATION_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![kind.as_str()], publication_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        }
        None => {
            let sql = format!(
                "SELECT {} FROM publications ORDER BY publication_date DESC",
                PUBLICATION_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], publication_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::services::publications::save::create_publication;
    use crate::session::Actor;
    use chrono::NaiveDate;
    use common::requests::PublicationPayload;

    fn payload(kind: &str) -> PublicationPayload {
        PublicationPayload {
            title: format!("{} paper", kind),
            authors: "A. Rahman".into(),
            kind: kind.into(),
            venue: None,
            publisher: None,
            publication_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            doi: None,
            link: None,
            abstract_text: None,
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
        create_publication(&conn, actor, &payload("journal")).unwrap();
        create_publication(&conn, actor, &payload("book")).unwrap();

        assert_eq!(list_publications(&conn, None).unwrap().len(), 2);
        let filtered = list_publications(&conn, Some("book")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "book paper");
        assert!(matches!(
            list_publications(&conn, Some("pamphlet")),
            Err(PortalError::Validation(_))
        ));
    }
}
