use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use common::model::stats::{DepartmentStatistics, EffectiveStatistics};
use common::outcome::ActionReply;
use common::requests::StatisticsPayload;

use crate::db::AppState;
use crate::error::PortalError;
use crate::session::{self, SessionsState};

pub async fn effective(state: web::Data<AppState>) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    Ok(HttpResponse::Ok().json(effective_statistics(&conn)?))
}

pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    payload: web::Json<StatisticsPayload>,
) -> Result<HttpResponse, PortalError> {
    session::require_admin(&req, &sessions).await?;
    let conn = state.conn()?;
    create_statistics(&conn, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("statistics created", None)))
}

pub async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    payload: web::Json<StatisticsPayload>,
) -> Result<HttpResponse, PortalError> {
    session::require_admin(&req, &sessions).await?;
    let conn = state.conn()?;
    update_statistics(&conn, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("statistics updated", None)))
}

/// The singleton row is permanent once created; deleting it would silently
/// flip every field back to live computation.
pub async fn refuse_delete(
    req: HttpRequest,
    sessions: web::Data<SessionsState>,
) -> Result<HttpResponse, PortalError> {
    session::require_admin(&req, &sessions).await?;
    Err(PortalError::conflict("statistics row cannot be deleted"))
}

fn validate(payload: &StatisticsPayload) -> Result<(), PortalError> {
    let fields = [
        payload.faculty_count,
        payload.research_area_count,
        payload.publication_count,
        payload.project_count,
    ];
    if fields.iter().any(|&v| v < 0) {
        return Err(PortalError::validation("counts must not be negative"));
    }
    Ok(())
}

pub fn create_statistics(
    conn: &Connection,
    payload: &StatisticsPayload,
) -> Result<(), PortalError> {
    validate(payload)?;
    if stored_statistics(conn)?.is_some() {
        return Err(PortalError::conflict("statistics row already exists"));
    }
    conn.execute(
        "INSERT INTO department_statistics
             (id, faculty_count, research_area_count, publication_count, project_count, updated_at)
         VALUES (1, ?1, ?2, ?3, ?4, ?5)",
        params![
            payload.faculty_count,
            payload.research_area_count,
            payload.publication_count,
            payload.project_count,
            Utc::now()
        ],
    )?;
    Ok(())
}

pub fn update_statistics(
    conn: &Connection,
    payload: &StatisticsPayload,
) -> Result<(), PortalError> {
    validate(payload)?;
    let changed = conn.execute(
        "UPDATE department_statistics
         SET faculty_count = ?1, research_area_count = ?2, publication_count = ?3,
             project_count = ?4, updated_at = ?5
         WHERE id = 1",
        params![
            payload.faculty_count,
            payload.research_area_count,
            payload.publication_count,
            payload.project_count,
            Utc::now()
        ],
    )?;
    if changed == 0 {
        return Err(PortalError::NotFound);
    }
    Ok(())
}

fn stored_statistics(conn: &Connection) -> Result<Option<DepartmentStatistics>, PortalError> {
    let row = conn
        .query_row(
            "SELECT faculty_count, research_area_count, publication_count, project_count,
                    updated_at
             FROM department_statistics WHERE id = 1",
            [],
            |row| {
                Ok(DepartmentStatistics {
                    faculty_count: row.get(0)?,
                    research_area_count: row.get(1)?,
                    publication_count: row.get(2)?,
                    project_count: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

/// Resolve the statistics for display. Manual overrides win; a zero (or a
/// missing row) means the field is computed live from the database.
pub fn effective_statistics(conn: &Connection) -> Result<EffectiveStatistics, PortalError> {
    let stored = stored_statistics(conn)?.unwrap_or(DepartmentStatistics {
        faculty_count: 0,
        research_area_count: 0,
        publication_count: 0,
        project_count: 0,
        updated_at: Utc::now(),
    });

    let mut computed_fields = Vec::new();
    let mut resolve = |name: &str, stored: i64, live: &str| -> Result<i64, PortalError> {
        if stored > 0 {
            return Ok(stored);
        }
        computed_fields.push(name.to_owned());
        Ok(conn.query_row(live, [], |r| r.get(0))?)
    };

    let faculty_count = resolve(
        "faculty_count",
        stored.faculty_count,
        "SELECT (SELECT COUNT(*) FROM faculty_members WHERE status = 'active')
              + (SELECT COUNT(*) FROM staff_members WHERE status = 'active')",
    )?;
    let research_area_count = resolve(
        "research_area_count",
        stored.research_area_count,
        "SELECT COUNT(DISTINCT research_interest) FROM faculty_members
         WHERE research_interest IS NOT NULL AND TRIM(research_interest) != ''",
    )?;
    let publication_count = resolve(
        "publication_count",
        stored.publication_count,
        "SELECT COUNT(*) FROM publications",
    )?;
    let project_count = resolve(
        "project_count",
        stored.project_count,
        "SELECT COUNT(*) FROM projects",
    )?;

    Ok(EffectiveStatistics {
        faculty_count,
        research_area_count,
        publication_count,
        project_count,
        computed_fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn payload(f: i64, r: i64, pb: i64, pj: i64) -> StatisticsPayload {
        StatisticsPayload {
            faculty_count: f,
            research_area_count: r,
            publication_count: pb,
            project_count: pj,
        }
    }

    fn seed_faculty(conn: &Connection, status: &str, interest: Option<&str>) {
        conn.execute(
            "INSERT INTO faculty_members (name, designation, status, email, research_interest)
             VALUES ('F', 'lecturer', ?1, 'f@x', ?2)",
            params![status, interest],
        )
        .unwrap();
    }

    #[test]
    fn missing_row_computes_everything_live() {
        let conn = db::memory_conn();
        seed_faculty(&conn, "active", Some("Networks"));
        seed_faculty(&conn, "active", Some("Networks"));
        seed_faculty(&conn, "past", Some("Graphics"));

        let stats = effective_statistics(&conn).unwrap();
        assert_eq!(stats.faculty_count, 2);
        // distinct interests count regardless of member status
        assert_eq!(stats.research_area_count, 2);
        assert_eq!(stats.computed_fields.len(), 4);
    }

    #[test]
    fn overrides_win_and_zeros_fall_back() {
        let conn = db::memory_conn();
        seed_faculty(&conn, "active", None);
        create_statistics(&conn, &payload(120, 0, 45, 0)).unwrap();

        let stats = effective_statistics(&conn).unwrap();
        assert_eq!(stats.faculty_count, 120);
        assert_eq!(stats.publication_count, 45);
        assert_eq!(stats.research_area_count, 0);
        assert_eq!(stats.project_count, 0);
        assert_eq!(
            stats.computed_fields,
            vec!["research_area_count".to_owned(), "project_count".to_owned()]
        );
    }

    #[test]
    fn second_create_conflicts() {
        let conn = db::memory_conn();
        create_statistics(&conn, &payload(1, 1, 1, 1)).unwrap();
        assert!(matches!(
            create_statistics(&conn, &payload(2, 2, 2, 2)),
            Err(PortalError::Conflict(_))
        ));
    }

    #[test]
    fn update_requires_an_existing_row() {
        let conn = db::memory_conn();
        assert!(matches!(
            update_statistics(&conn, &payload(1, 1, 1, 1)),
            Err(PortalError::NotFound)
        ));
        create_statistics(&conn, &payload(1, 1, 1, 1)).unwrap();
        update_statistics(&conn, &payload(9, 1, 1, 1)).unwrap();
        let stats = effective_statistics(&conn).unwrap();
        assert_eq!(stats.faculty_count, 9);
    }

    #[test]
    fn negative_counts_fail_validation() {
        let conn = db::memory_conn();
        assert!(matches!(
            create_statistics(&conn, &payload(-1, 0, 0, 0)),
            Err(PortalError::Validation(_))
        ));
    }
}
