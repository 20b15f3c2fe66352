use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use rusqlite::{params, Connection, OptionalExtension};

use common::outcome::LinkReport;

use crate::db::AppState;
use crate::error::PortalError;
use crate::session::{self, SessionsState};

pub async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
) -> Result<HttpResponse, PortalError> {
    session::require_admin(&req, &sessions).await?;
    let conn = state.conn()?;
    let report = auto_link(&conn)?;
    info!(
        "auto-link pass: {} linked, {} skipped",
        report.linked, report.skipped
    );
    Ok(HttpResponse::Ok().json(report))
}

/// One auto-linking pass over both directory tables. A person is linked
/// only when exactly one identity shares their email and that identity is
/// not already attached to anyone. Everything else is skipped, never
/// guessed.
pub fn auto_link(conn: &Connection) -> Result<LinkReport, PortalError> {
    let mut report = LinkReport { linked: 0, skipped: 0 };
    link_table(conn, "faculty_members", &mut report)?;
    link_table(conn, "staff_members", &mut report)?;
    Ok(report)
}

fn link_table(conn: &Connection, table: &str, report: &mut LinkReport) -> Result<(), PortalError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, email FROM {table} WHERE user_id IS NULL AND TRIM(email) != ''"
    ))?;
    let unlinked = stmt
        .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    for (person_id, email) in unlinked {
        match unique_identity_for_email(conn, &email)? {
            Some(identity_id) if !identity_in_use(conn, identity_id)? => {
                conn.execute(
                    &format!("UPDATE {table} SET user_id = ?1 WHERE id = ?2"),
                    params![identity_id, person_id],
                )?;
                report.linked += 1;
            }
            _ => report.skipped += 1,
        }
    }
    Ok(())
}

/// The identity whose email matches, but only when the match is unique.
fn unique_identity_for_email(conn: &Connection, email: &str) -> Result<Option<i64>, PortalError> {
    let mut stmt =
        conn.prepare("SELECT id FROM identities WHERE email = ?1 LIMIT 2")?;
    let ids = stmt
        .query_map(params![email], |row| row.get::<_, i64>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(match ids.as_slice() {
        [only] => Some(*only),
        _ => None,
    })
}

pub fn identity_in_use(conn: &Connection, identity_id: i64) -> Result<bool, PortalError> {
    for table in ["faculty_members", "staff_members"] {
        let hit: Option<i64> = conn
            .query_row(
                &format!("SELECT id FROM {table} WHERE user_id = ?1"),
                params![identity_id],
                |row| row.get(0),
            )
            .optional()?;
        if hit.is_some() {
            return Ok(true);
        }
    }
    Ok(false)
}
