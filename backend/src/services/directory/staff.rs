use actix_web::{web, HttpRequest, HttpResponse};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Deserialize;

use common::model::faculty::{EmploymentStatus, StaffMember};
use common::outcome::ActionReply;
use common::requests::StaffPayload;

use crate::content::require_text;
use crate::db::AppState;
use crate::error::PortalError;
use crate::session::{self, SessionsState};

#[derive(Deserialize)]
pub struct ListQuery {
    status: Option<String>,
}

fn from_row(row: &Row) -> rusqlite::Result<StaffMember> {
    let status: String = row.get(4)?;
    Ok(StaffMember {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        designation: row.get(3)?,
        status: EmploymentStatus::parse(&status).unwrap_or(EmploymentStatus::Active),
        email: row.get(5)?,
        phone: row.get(6)?,
        photo: row.get(7)?,
    })
}

const COLUMNS: &str = "id, user_id, name, designation, status, email, phone, photo";

pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    let members = list_staff(&conn, query.status.as_deref())?;
    Ok(HttpResponse::Ok().json(members))
}

pub async fn detail(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    let member = fetch_staff(&conn, path.into_inner())?;
    Ok(HttpResponse::Ok().json(member))
}

pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    payload: web::Json<StaffPayload>,
) -> Result<HttpResponse, PortalError> {
    session::require_admin(&req, &sessions).await?;
    let conn = state.conn()?;
    let id = create_staff(&conn, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("staff member created", Some(id))))
}

pub async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    path: web::Path<i64>,
    payload: web::Json<StaffPayload>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let id = path.into_inner();
    let conn = state.conn()?;
    let user_id: Option<Option<i64>> = conn
        .query_row(
            "SELECT user_id FROM staff_members WHERE id = ?1",
            params![id],
            |r| r.get(0),
        )
        .optional()?;
    let Some(user_id) = user_id else {
        return Err(PortalError::NotFound);
    };
    super::authorize_profile_edit(actor, user_id)?;
    edit_staff(&conn, id, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("staff member updated", Some(id))))
}

fn validate(payload: &StaffPayload) -> Result<(), PortalError> {
    require_text(&payload.name, "name")?;
    require_text(&payload.designation, "designation")?;
    require_text(&payload.email, "email")?;
    if EmploymentStatus::parse(&payload.status).is_none() {
        return Err(PortalError::validation(format!(
            "unknown status '{}'",
            payload.status
        )));
    }
    Ok(())
}

pub fn list_staff(
    conn: &Connection,
    status: Option<&str>,
) -> Result<Vec<StaffMember>, PortalError> {
    if let Some(status) = status {
        if EmploymentStatus::parse(status).is_none() {
            return Err(PortalError::validation(format!("unknown status '{status}'")));
        }
    }
    let sql = format!(
        "SELECT {COLUMNS} FROM staff_members {} ORDER BY name",
        if status.is_some() { "WHERE status = ?1" } else { "" }
    );
    let mut stmt = conn.prepare(&sql)?;
    let members = match status {
        Some(status) => stmt
            .query_map(params![status], from_row)?
            .collect::<Result<Vec<_>, _>>()?,
        None => stmt.query_map([], from_row)?.collect::<Result<Vec<_>, _>>()?,
    };
    Ok(members)
}

pub fn fetch_staff(conn: &Connection, id: i64) -> Result<StaffMember, PortalError> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM staff_members WHERE id = ?1"),
        params![id],
        from_row,
    )
    .optional()?
    .ok_or(PortalError::NotFound)
}

pub fn create_staff(conn: &Connection, payload: &StaffPayload) -> Result<i64, PortalError> {
    validate(payload)?;
    conn.execute(
        "INSERT INTO staff_members (name, designation, status, email, phone, photo)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            payload.name,
            payload.designation,
            payload.status,
            payload.email,
            payload.phone,
            payload.photo
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn edit_staff(conn: &Connection, id: i64, payload: &StaffPayload) -> Result<(), PortalError> {
    validate(payload)?;
    conn.execute(
        "UPDATE staff_members SET name = ?1, designation = ?2, status = ?3, email = ?4,
                phone = ?5, photo = ?6
         WHERE id = ?7",
        params![
            payload.name,
            payload.designation,
            payload.status,
            payload.email,
            payload.phone,
            payload.photo,
            id
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn payload(name: &str, status: &str) -> StaffPayload {
        StaffPayload {
            name: name.into(),
            designation: "Office Assistant".into(),
            status: status.into(),
            email: "s@cse.edu".into(),
            phone: None,
            photo: None,
        }
    }

    #[test]
    fn status_filter_narrows_the_list() {
        let conn = db::memory_conn();
        create_staff(&conn, &payload("Active A", "active")).unwrap();
        create_staff(&conn, &payload("Gone B", "past")).unwrap();

        assert_eq!(list_staff(&conn, None).unwrap().len(), 2);
        let active = list_staff(&conn, Some("active")).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Active A");
    }

    #[test]
    fn missing_staff_is_not_found() {
        let conn = db::memory_conn();
        assert!(matches!(fetch_staff(&conn, 7), Err(PortalError::NotFound)));
    }
}
