use actix_web::{web, HttpRequest, HttpResponse};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use common::outcome::ActionReply;
use common::requests::EndTermRequest;

use crate::db::AppState;
use crate::error::PortalError;
use crate::session::{self, SessionsState};

pub async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    path: web::Path<i64>,
    payload: web::Json<EndTermRequest>,
) -> Result<HttpResponse, PortalError> {
    session::require_admin(&req, &sessions).await?;
    let conn = state.conn()?;
    end_term(&conn, path.into_inner(), payload.to_date)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("term ended", None)))
}

/// Close a term, leaving the post vacant. The end date must not precede
/// the term's start date.
pub fn end_term(conn: &Connection, term_id: i64, to_date: NaiveDate) -> Result<(), PortalError> {
    let from_date: Option<NaiveDate> = conn
        .query_row(
            "SELECT from_date FROM chairman_terms WHERE id = ?1",
            params![term_id],
            |r| r.get(0),
        )
        .optional()?;
    let Some(from_date) = from_date else {
        return Err(PortalError::NotFound);
    };
    if to_date < from_date {
        return Err(PortalError::validation("to_date precedes the term's start"));
    }
    conn.execute(
        "UPDATE chairman_terms SET is_current = 0, to_date = ?1 WHERE id = ?2",
        params![to_date, term_id],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn ending_the_current_term_vacates_the_post() {
        let conn = db::memory_conn();
        conn.execute(
            "INSERT INTO faculty_members (name, designation, status, email)
             VALUES ('P1', 'professor', 'active', 'p1@cse.edu')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO chairman_terms (faculty_id, message, from_date, is_current)
             VALUES (1, 'm', '2020-01-01', 1)",
            [],
        )
        .unwrap();

        end_term(&conn, 1, "2024-06-30".parse().unwrap()).unwrap();
        let n: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM chairman_terms WHERE is_current = 1",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn end_date_before_start_is_rejected() {
        let conn = db::memory_conn();
        conn.execute(
            "INSERT INTO faculty_members (name, designation, status, email)
             VALUES ('P1', 'professor', 'active', 'p1@cse.edu')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO chairman_terms (faculty_id, message, from_date, is_current)
             VALUES (1, 'm', '2020-01-01', 1)",
            [],
        )
        .unwrap();
        let err = end_term(&conn, 1, "2019-12-31".parse().unwrap()).unwrap_err();
        assert!(matches!(err, PortalError::Validation(_)));
    }

    #[test]
    fn unknown_term_is_not_found() {
        let conn = db::memory_conn();
        let err = end_term(&conn, 42, "2024-01-01".parse().unwrap()).unwrap_err();
        assert!(matches!(err, PortalError::NotFound));
    }
}
