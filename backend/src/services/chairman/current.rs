use actix_web::{web, HttpResponse};
use rusqlite::{Connection, OptionalExtension, Row};

use common::model::chairman::{ChairmanTerm, CurrentChairman};

use crate::db::AppState;
use crate::error::PortalError;
use crate::page_views;

fn term_from_row(row: &Row) -> rusqlite::Result<ChairmanTerm> {
    Ok(ChairmanTerm {
        id: row.get(0)?,
        faculty_id: row.get(1)?,
        message: row.get(2)?,
        from_date: row.get(3)?,
        to_date: row.get(4)?,
        is_current: row.get(5)?,
    })
}

pub async fn process(state: web::Data<AppState>) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    page_views::record_view_best_effort(&conn, "chairman");
    match current_chairman(&conn)? {
        Some(current) => Ok(HttpResponse::Ok().json(current)),
        // the post can be vacant between terms
        None => Err(PortalError::NotFound),
    }
}

pub async fn history(state: web::Data<AppState>) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    let terms = term_history(&conn)?;
    Ok(HttpResponse::Ok().json(terms))
}

pub fn current_chairman(conn: &Connection) -> Result<Option<CurrentChairman>, PortalError> {
    let row = conn
        .query_row(
            "SELECT t.id, t.faculty_id, t.message, t.from_date, t.to_date, t.is_current,
                    f.name, f.email, f.photo
             FROM chairman_terms t
             JOIN faculty_members f ON f.id = t.faculty_id
             WHERE t.is_current = 1",
            [],
            |row| {
                Ok(CurrentChairman {
                    term: term_from_row(row)?,
                    faculty_name: row.get(6)?,
                    faculty_email: row.get(7)?,
                    faculty_photo: row.get(8)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

pub fn term_history(conn: &Connection) -> Result<Vec<ChairmanTerm>, PortalError> {
    let mut stmt = conn.prepare(
        "SELECT id, faculty_id, message, from_date, to_date, is_current
         FROM chairman_terms ORDER BY from_date DESC",
    )?;
    let rows = stmt.query_map([], term_from_row)?.collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn vacant_post_reads_as_none() {
        let conn = db::memory_conn();
        assert!(current_chairman(&conn).unwrap().is_none());
    }

    #[test]
    fn current_view_carries_the_directory_entry() {
        let conn = db::memory_conn();
        conn.execute(
            "INSERT INTO faculty_members (name, designation, status, email, photo)
             VALUES ('Dr. Rahman', 'professor', 'active', 'rahman@cse.edu', 'rahman.jpg')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO chairman_terms (faculty_id, message, from_date, is_current)
             VALUES (1, 'Welcome.', '2023-01-01', 1)",
            [],
        )
        .unwrap();
        let current = current_chairman(&conn).unwrap().unwrap();
        assert_eq!(current.faculty_name, "Dr. Rahman");
        assert_eq!(current.faculty_photo.as_deref(), Some("rahman.jpg"));
        assert!(current.term.is_current);
    }
}
