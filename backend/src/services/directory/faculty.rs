use actix_web::{web, HttpRequest, HttpResponse};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use common::model::faculty::{
    Designation, EducationEntry, EmploymentStatus, ExperienceEntry, FacultyMember,
};
use common::outcome::ActionReply;
use common::requests::FacultyPayload;

use crate::content::require_text;
use crate::db::AppState;
use crate::error::PortalError;
use crate::page_views;
use crate::session::{self, SessionsState};

/// Detail view: the directory entry plus how much of the profile its
/// holder has filled in.
#[derive(Debug, Serialize, Deserialize)]
pub struct FacultyProfile {
    #[serde(flatten)]
    pub member: FacultyMember,
    pub profile_completion: u32,
}

#[derive(Deserialize)]
pub struct ListQuery {
    status: Option<String>,
}

fn member_from_row(row: &Row) -> rusqlite::Result<FacultyMember> {
    let designation: String = row.get(3)?;
    let status: String = row.get(4)?;
    Ok(FacultyMember {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        designation: Designation::parse(&designation).unwrap_or(Designation::Lecturer),
        status: EmploymentStatus::parse(&status).unwrap_or(EmploymentStatus::Active),
        email: row.get(5)?,
        phone: row.get(6)?,
        room_no: row.get(7)?,
        photo: row.get(8)?,
        bio: row.get(9)?,
        research_interest: row.get(10)?,
        joined_date: row.get(11)?,
        education: Vec::new(),
        experience: Vec::new(),
    })
}

const MEMBER_COLUMNS: &str = "id, user_id, name, designation, status, email, phone, room_no, \
                              photo, bio, research_interest, joined_date";

pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    let members = list_members(&conn, query.status.as_deref())?;
    page_views::record_view_best_effort(&conn, "faculty");
    Ok(HttpResponse::Ok().json(members))
}

pub async fn detail(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    let profile = fetch_profile(&conn, path.into_inner())?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    payload: web::Json<FacultyPayload>,
) -> Result<HttpResponse, PortalError> {
    session::require_admin(&req, &sessions).await?;
    let mut conn = state.conn()?;
    let id = create_member(&mut conn, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("faculty member created", Some(id))))
}

pub async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    path: web::Path<i64>,
    payload: web::Json<FacultyPayload>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let id = path.into_inner();
    let mut conn = state.conn()?;
    let user_id: Option<Option<i64>> = conn
        .query_row(
            "SELECT user_id FROM faculty_members WHERE id = ?1",
            params![id],
            |r| r.get(0),
        )
        .optional()?;
    let Some(user_id) = user_id else {
        return Err(PortalError::NotFound);
    };
    super::authorize_profile_edit(actor, user_id)?;
    edit_member(&mut conn, id, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("faculty member updated", Some(id))))
}

fn validate(payload: &FacultyPayload) -> Result<(), PortalError> {
    require_text(&payload.name, "name")?;
    require_text(&payload.email, "email")?;
    if Designation::parse(&payload.designation).is_none() {
        return Err(PortalError::validation(format!(
            "unknown designation '{}'",
            payload.designation
        )));
    }
    if EmploymentStatus::parse(&payload.status).is_none() {
        return Err(PortalError::validation(format!(
            "unknown status '{}'",
            payload.status
        )));
    }
    Ok(())
}

pub fn list_members(
    conn: &Connection,
    status: Option<&str>,
) -> Result<Vec<FacultyMember>, PortalError> {
    if let Some(status) = status {
        if EmploymentStatus::parse(status).is_none() {
            return Err(PortalError::validation(format!("unknown status '{status}'")));
        }
    }
    let sql = format!(
        "SELECT {MEMBER_COLUMNS} FROM faculty_members {} ORDER BY name",
        if status.is_some() { "WHERE status = ?1" } else { "" }
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut members = match status {
        Some(status) => stmt
            .query_map(params![status], member_from_row)?
            .collect::<Result<Vec<_>, _>>()?,
        None => stmt.query_map([], member_from_row)?.collect::<Result<Vec<_>, _>>()?,
    };
    for member in &mut members {
        load_sub_records(conn, member)?;
    }
    Ok(members)
}

fn load_sub_records(conn: &Connection, member: &mut FacultyMember) -> Result<(), PortalError> {
    let mut stmt = conn.prepare(
        "SELECT degree, institution, year FROM faculty_education
         WHERE faculty_id = ?1 ORDER BY position",
    )?;
    member.education = stmt
        .query_map(params![member.id], |row| {
            Ok(EducationEntry {
                degree: row.get(0)?,
                institution: row.get(1)?,
                year: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT title, organization, from_year, to_year FROM faculty_experience
         WHERE faculty_id = ?1 ORDER BY position",
    )?;
    member.experience = stmt
        .query_map(params![member.id], |row| {
            Ok(ExperienceEntry {
                title: row.get(0)?,
                organization: row.get(1)?,
                from_year: row.get(2)?,
                to_year: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(())
}

pub fn fetch_profile(conn: &Connection, id: i64) -> Result<FacultyProfile, PortalError> {
    let member = conn
        .query_row(
            &format!("SELECT {MEMBER_COLUMNS} FROM faculty_members WHERE id = ?1"),
            params![id],
            member_from_row,
        )
        .optional()?;
    let Some(mut member) = member else {
        return Err(PortalError::NotFound);
    };
    load_sub_records(conn, &mut member)?;
    let profile_completion = completion_percent(&member);
    Ok(FacultyProfile { member, profile_completion })
}

/// Share of the optional profile fields that are filled in, as a whole
/// percentage.
pub fn completion_percent(member: &FacultyMember) -> u32 {
    let has_text = |field: &Option<String>| {
        field.as_deref().is_some_and(|s| !s.trim().is_empty())
    };
    let checks = [
        has_text(&member.phone),
        has_text(&member.room_no),
        has_text(&member.photo),
        has_text(&member.bio),
        has_text(&member.research_interest),
        member.joined_date.is_some(),
        !member.education.is_empty(),
        !member.experience.is_empty(),
    ];
    let filled = checks.iter().filter(|&&c| c).count() as u32;
    filled * 100 / checks.len() as u32
}

pub fn create_member(conn: &mut Connection, payload: &FacultyPayload) -> Result<i64, PortalError> {
    validate(payload)?;
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO faculty_members (name, designation, status, email, phone, room_no,
                                      photo, bio, research_interest, joined_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            payload.name,
            payload.designation,
            payload.status,
            payload.email,
            payload.phone,
            payload.room_no,
            payload.photo,
            payload.bio,
            payload.research_interest,
            payload.joined_date
        ],
    )?;
    let id = tx.last_insert_rowid();
    write_sub_records(&tx, id, payload)?;
    tx.commit()?;
    Ok(id)
}

pub fn edit_member(
    conn: &mut Connection,
    id: i64,
    payload: &FacultyPayload,
) -> Result<(), PortalError> {
    validate(payload)?;
    let tx = conn.transaction()?;
    tx.execute(
        "UPDATE faculty_members SET name = ?1, designation = ?2, status = ?3, email = ?4,
                phone = ?5, room_no = ?6, photo = ?7, bio = ?8, research_interest = ?9,
                joined_date = ?10
         WHERE id = ?11",
        params![
            payload.name,
            payload.designation,
            payload.status,
            payload.email,
            payload.phone,
            payload.room_no,
            payload.photo,
            payload.bio,
            payload.research_interest,
            payload.joined_date,
            id
        ],
    )?;
    write_sub_records(&tx, id, payload)?;
    tx.commit()?;
    Ok(())
}

/// Sub-records are replaced wholesale; `position` preserves the submitted
/// order.
fn write_sub_records(
    tx: &rusqlite::Transaction,
    faculty_id: i64,
    payload: &FacultyPayload,
) -> Result<(), PortalError> {
    tx.execute(
        "DELETE FROM faculty_education WHERE faculty_id = ?1",
        params![faculty_id],
    )?;
    for (position, entry) in payload.education.iter().enumerate() {
        tx.execute(
            "INSERT INTO faculty_education (faculty_id, degree, institution, year, position)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![faculty_id, entry.degree, entry.institution, entry.year, position as i64],
        )?;
    }
    tx.execute(
        "DELETE FROM faculty_experience WHERE faculty_id = ?1",
        params![faculty_id],
    )?;
    for (position, entry) in payload.experience.iter().enumerate() {
        tx.execute(
            "INSERT INTO faculty_experience
                 (faculty_id, title, organization, from_year, to_year, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                faculty_id,
                entry.title,
                entry.organization,
                entry.from_year,
                entry.to_year,
                position as i64
            ],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn payload(name: &str) -> FacultyPayload {
        FacultyPayload {
            name: name.into(),
            designation: "professor".into(),
            status: "active".into(),
            email: "x@cse.edu".into(),
            phone: None,
            room_no: None,
            photo: None,
            bio: None,
            research_interest: None,
            joined_date: None,
            education: vec![
                EducationEntry {
                    degree: "PhD".into(),
                    institution: "MIT".into(),
                    year: Some(2010),
                },
                EducationEntry {
                    degree: "BSc".into(),
                    institution: "BUET".into(),
                    year: Some(2003),
                },
            ],
            experience: Vec::new(),
        }
    }

    #[test]
    fn sub_records_keep_submitted_order_across_edits() {
        let mut conn = db::memory_conn();
        let id = create_member(&mut conn, &payload("Dr. A")).unwrap();

        let profile = fetch_profile(&conn, id).unwrap();
        let degrees: Vec<_> = profile.member.education.iter().map(|e| e.degree.as_str()).collect();
        assert_eq!(degrees, vec!["PhD", "BSc"]);

        let mut edited = payload("Dr. A");
        edited.education.reverse();
        edit_member(&mut conn, id, &edited).unwrap();
        let profile = fetch_profile(&conn, id).unwrap();
        let degrees: Vec<_> = profile.member.education.iter().map(|e| e.degree.as_str()).collect();
        assert_eq!(degrees, vec!["BSc", "PhD"]);

        // replaced, not appended
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM faculty_education", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 2);
    }

    #[test]
    fn completion_counts_filled_fields() {
        let mut conn = db::memory_conn();
        let mut p = payload("Dr. B");
        p.experience.clear();
        p.education.clear();
        let bare = create_member(&mut conn, &p).unwrap();
        assert_eq!(fetch_profile(&conn, bare).unwrap().profile_completion, 0);

        p.phone = Some("555-0101".into());
        p.bio = Some("Systems researcher.".into());
        p.education = vec![EducationEntry {
            degree: "PhD".into(),
            institution: "MIT".into(),
            year: None,
        }];
        p.email = "b@cse.edu".into();
        let partial = create_member(&mut conn, &p).unwrap();
        // 3 of 8 checks pass
        assert_eq!(fetch_profile(&conn, partial).unwrap().profile_completion, 37);
    }

    #[test]
    fn status_filter_rejects_unknown_values() {
        let conn = db::memory_conn();
        assert!(matches!(
            list_members(&conn, Some("retired")),
            Err(PortalError::Validation(_))
        ));
        assert!(list_members(&conn, Some("on_leave")).unwrap().is_empty());
    }

    #[test]
    fn unknown_designation_fails_validation() {
        let mut conn = db::memory_conn();
        let mut p = payload("Dr. C");
        p.designation = "wizard".into();
        assert!(matches!(
            create_member(&mut conn, &p),
            Err(PortalError::Validation(_))
        ));
    }
}
