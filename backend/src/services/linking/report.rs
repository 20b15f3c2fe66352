use actix_web::{web, HttpRequest, HttpResponse};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use common::requests::PersonKind;

use crate::db::AppState;
use crate::error::PortalError;
use crate::session::{self, SessionsState};

use super::auto;

/// Advisory snapshot of the linking state; changes nothing.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkingReport {
    pub linked_faculty: i64,
    pub unlinked_faculty: i64,
    pub linked_staff: i64,
    pub unlinked_staff: i64,
    /// Unlinked people whose email matches a free identity; the next auto
    /// pass would link these.
    pub suggestions: Vec<LinkSuggestion>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LinkSuggestion {
    pub person: PersonKind,
    pub person_id: i64,
    pub person_name: String,
    pub identity_id: i64,
    pub username: String,
}

pub async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
) -> Result<HttpResponse, PortalError> {
    session::require_admin(&req, &sessions).await?;
    let conn = state.conn()?;
    Ok(HttpResponse::Ok().json(build_report(&conn)?))
}

pub fn build_report(conn: &Connection) -> Result<LinkingReport, PortalError> {
    let count = |sql: &str| -> Result<i64, PortalError> {
        Ok(conn.query_row(sql, [], |r| r.get(0))?)
    };
    let mut report = LinkingReport {
        linked_faculty: count("SELECT COUNT(*) FROM faculty_members WHERE user_id IS NOT NULL")?,
        unlinked_faculty: count("SELECT COUNT(*) FROM faculty_members WHERE user_id IS NULL")?,
        linked_staff: count("SELECT COUNT(*) FROM staff_members WHERE user_id IS NOT NULL")?,
        unlinked_staff: count("SELECT COUNT(*) FROM staff_members WHERE user_id IS NULL")?,
        suggestions: Vec::new(),
    };
    collect_suggestions(conn, PersonKind::Faculty, &mut report.suggestions)?;
    collect_suggestions(conn, PersonKind::Staff, &mut report.suggestions)?;
    Ok(report)
}

fn collect_suggestions(
    conn: &Connection,
    kind: PersonKind,
    out: &mut Vec<LinkSuggestion>,
) -> Result<(), PortalError> {
    let table = match kind {
        PersonKind::Faculty => "faculty_members",
        PersonKind::Staff => "staff_members",
    };
    let mut stmt = conn.prepare(&format!(
        "SELECT p.id, p.name, i.id, i.username
         FROM {table} p
         JOIN identities i ON i.email = p.email
         WHERE p.user_id IS NULL AND TRIM(p.email) != ''"
    ))?;
    let candidates = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    for (person_id, person_name, identity_id, username) in candidates {
        // mirror the auto pass: only unambiguous, free identities qualify
        let matches: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM identities
                 WHERE email = (SELECT email FROM {table} WHERE id = ?1)"
            ),
            params![person_id],
            |r| r.get(0),
        )?;
        if matches != 1 || auto::identity_in_use(conn, identity_id)? {
            continue;
        }
        out.push(LinkSuggestion {
            person: kind,
            person_id,
            person_name,
            identity_id,
            username,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn report_counts_and_suggests_without_linking() {
        let conn = db::memory_conn();
        conn.execute(
            "INSERT INTO identities (username, email, password_md5) VALUES ('ar', 'ar@x', 'h')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO faculty_members (name, designation, status, email)
             VALUES ('A Rahman', 'lecturer', 'active', 'ar@x')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO faculty_members (user_id, name, designation, status, email)
             VALUES (1, 'Linked', 'lecturer', 'active', 'l@x')",
            [],
        )
        .unwrap();

        let report = build_report(&conn).unwrap();
        assert_eq!(report.linked_faculty, 1);
        assert_eq!(report.unlinked_faculty, 1);
        // identity 1 is already held, so the suggestion list stays empty
        assert!(report.suggestions.is_empty());

        let still_unlinked: Option<i64> = conn
            .query_row(
                "SELECT user_id FROM faculty_members WHERE id = 1",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(still_unlinked, None);
    }

    #[test]
    fn free_unambiguous_match_is_suggested() {
        let conn = db::memory_conn();
        conn.execute(
            "INSERT INTO identities (username, email, password_md5) VALUES ('ar', 'ar@x', 'h')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO faculty_members (name, designation, status, email)
             VALUES ('A Rahman', 'lecturer', 'active', 'ar@x')",
            [],
        )
        .unwrap();
        let report = build_report(&conn).unwrap();
        assert_eq!(report.suggestions.len(), 1);
        assert_eq!(report.suggestions[0].username, "ar");
        assert_eq!(report.suggestions[0].person, PersonKind::Faculty);
    }
}
