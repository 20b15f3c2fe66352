use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use rusqlite::{params, Connection};

use common::outcome::ActionReply;
use common::requests::ProjectPayload;

use crate::content::{self, require_text, ContentTable};
use crate::db::AppState;
use crate::error::PortalError;
use crate::session::{self, Actor, SessionsState};

use super::parse_kind;

fn validate(payload: &ProjectPayload) -> Result<(), PortalError> {
    require_text(&payload.title, "title")?;
    require_text(&payload.description, "description")?;
    parse_kind(&payload.kind)?;
    if let Some(end) = payload.end_date {
        if end < payload.start_date {
            return Err(PortalError::validation("end date must not precede start date"));
        }
    }
    Ok(())
}

pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    payload: web::Json<ProjectPayload>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let conn = state.conn()?;
    let id = create_project(&conn, actor, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("project created", Some(id))))
}

pub async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    path: web::Path<i64>,
    payload: web::Json<ProjectPayload>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let id = path.into_inner();
    let conn = state.conn()?;
    edit_project(&conn, actor, id, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("project updated", Some(id))))
}

pub fn create_project(
    conn: &Connection,
    actor: Actor,
    payload: &ProjectPayload,
) -> Result<i64, PortalError> {
    validate(payload)?;
    conn.execute(
        "INSERT INTO projects (title, description, kind, start_date, end_date, is_ongoing,
                               funding_agency, budget, outcome, created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
        params![
            payload.title,
            payload.description,
            payload.kind,
            payload.start_date,
            payload.end_date,
            payload.is_ongoing,
            payload.funding_agency,
            payload.budget,
            payload.outcome,
            actor.identity_id,
            Utc::now()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn edit_project(
    conn: &Connection,
    actor: Actor,
    id: i64,
    payload: &ProjectPayload,
) -> Result<(), PortalError> {
    content::authorize_mutation(conn, ContentTable::Projects, id, actor)?;
    validate(payload)?;
    conn.execute(
        "UPDATE projects SET title = ?1, description = ?2, kind = ?3, start_date = ?4,
                end_date = ?5, is_ongoing = ?6, funding_agency = ?7, budget = ?8,
                outcome = ?9, updated_at = ?10
         WHERE id = ?11",
        params![
            payload.title,
            payload.description,
            payload.kind,
            payload.start_date,
            payload.end_date,
            payload.is_ongoing,
            payload.funding_agency,
            payload.budget,
            payload.outcome,
            Utc::now(),
            id
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::NaiveDate;

    fn seed_actor(conn: &Connection) -> Actor {
        conn.execute(
            "INSERT INTO identities (username, email, password_md5) VALUES ('s', 's@x', 'h')",
            [],
        )
        .unwrap();
        Actor { identity_id: conn.last_insert_rowid(), is_admin: false }
    }

    fn payload() -> ProjectPayload {
        ProjectPayload {
            title: "Smart campus sensors".into(),
            description: "LoRa sensor mesh across the faculty building".into(),
            kind: "research".into(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            end_date: None,
            is_ongoing: true,
            funding_agency: Some("UGC".into()),
            budget: Some(120000.0),
            outcome: None,
        }
    }

    #[test]
    fn end_before_start_fails_validation() {
        let conn = db::memory_conn();
        let actor = seed_actor(&conn);
        let mut p = payload();
        p.end_date = Some(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert!(matches!(
            create_project(&conn, actor, &p),
            Err(PortalError::Validation(_))
        ));
    }

    #[test]
    fn non_owner_cannot_edit() {
        let conn = db::memory_conn();
        let owner = seed_actor(&conn);
        conn.execute(
            "INSERT INTO identities (username, email, password_md5) VALUES ('t', 't@x', 'h')",
            [],
        )
        .unwrap();
        let other = Actor { identity_id: conn.last_insert_rowid(), is_admin: false };
        let id = create_project(&conn, owner, &payload()).unwrap();
        assert!(matches!(
            edit_project(&conn, other, id, &payload()),
            Err(PortalError::Forbidden)
        ));
    }
}
