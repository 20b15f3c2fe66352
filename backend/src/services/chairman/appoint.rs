use actix_web::{web, HttpRequest, HttpResponse};
use rusqlite::{params, Connection, OptionalExtension};

use common::outcome::ActionReply;
use common::requests::AppointRequest;

use crate::content::require_text;
use crate::db::AppState;
use crate::error::PortalError;
use crate::session::{self, SessionsState};

pub async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    payload: web::Json<AppointRequest>,
) -> Result<HttpResponse, PortalError> {
    session::require_admin(&req, &sessions).await?;
    let mut conn = state.conn()?;
    let id = appoint(&mut conn, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("chairman appointed", Some(id))))
}

/// Demote the sitting chairman (if any) and seat the new one in a single
/// transaction. A demoted term with no end date gets the successor's start
/// date as its end date.
pub fn appoint(conn: &mut Connection, request: &AppointRequest) -> Result<i64, PortalError> {
    require_text(&request.message, "message")?;
    let tx = conn.transaction()?;

    let known: Option<i64> = tx
        .query_row(
            "SELECT id FROM faculty_members WHERE id = ?1",
            params![request.faculty_id],
            |r| r.get(0),
        )
        .optional()?;
    if known.is_none() {
        return Err(PortalError::NotFound);
    }

    tx.execute(
        "UPDATE chairman_terms
         SET is_current = 0,
             to_date = COALESCE(to_date, ?1)
         WHERE is_current = 1",
        params![request.from_date],
    )?;
    tx.execute(
        "INSERT INTO chairman_terms (faculty_id, message, from_date, to_date, is_current)
         VALUES (?1, ?2, ?3, NULL, 1)",
        params![request.faculty_id, request.message, request.from_date],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::NaiveDate;

    fn seed_faculty(conn: &Connection, name: &str) -> i64 {
        conn.execute(
            "INSERT INTO faculty_members (name, designation, status, email)
             VALUES (?1, 'professor', 'active', 'x@cse.edu')",
            params![name],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    fn request(faculty_id: i64, from: &str) -> AppointRequest {
        AppointRequest {
            faculty_id,
            from_date: from.parse::<NaiveDate>().unwrap(),
            message: "Welcome to the department.".into(),
        }
    }

    #[test]
    fn succession_keeps_exactly_one_current_term() {
        let mut conn = db::memory_conn();
        let p1 = seed_faculty(&conn, "P1");
        let p2 = seed_faculty(&conn, "P2");

        let t1 = appoint(&mut conn, &request(p1, "2020-01-01")).unwrap();
        let (current, to_date): (bool, Option<NaiveDate>) = conn
            .query_row(
                "SELECT is_current, to_date FROM chairman_terms WHERE id = ?1",
                params![t1],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert!(current);
        assert_eq!(to_date, None);

        appoint(&mut conn, &request(p2, "2023-01-01")).unwrap();
        let (current, to_date): (bool, Option<NaiveDate>) = conn
            .query_row(
                "SELECT is_current, to_date FROM chairman_terms WHERE id = ?1",
                params![t1],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert!(!current);
        assert_eq!(to_date, Some("2023-01-01".parse().unwrap()));

        let n: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM chairman_terms WHERE is_current = 1",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn explicit_end_date_survives_succession() {
        let mut conn = db::memory_conn();
        let p1 = seed_faculty(&conn, "P1");
        let p2 = seed_faculty(&conn, "P2");

        let t1 = appoint(&mut conn, &request(p1, "2020-01-01")).unwrap();
        conn.execute(
            "UPDATE chairman_terms SET to_date = '2022-06-30' WHERE id = ?1",
            params![t1],
        )
        .unwrap();

        appoint(&mut conn, &request(p2, "2023-01-01")).unwrap();
        let to_date: Option<NaiveDate> = conn
            .query_row(
                "SELECT to_date FROM chairman_terms WHERE id = ?1",
                params![t1],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(to_date, Some("2022-06-30".parse().unwrap()));
    }

    #[test]
    fn unknown_faculty_is_rejected_without_side_effects() {
        let mut conn = db::memory_conn();
        let p1 = seed_faculty(&conn, "P1");
        appoint(&mut conn, &request(p1, "2020-01-01")).unwrap();

        let err = appoint(&mut conn, &request(999, "2023-01-01")).unwrap_err();
        assert!(matches!(err, PortalError::NotFound));

        let n: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM chairman_terms WHERE is_current = 1",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(n, 1);
    }
}
