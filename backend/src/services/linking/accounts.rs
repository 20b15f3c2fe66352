use std::sync::OnceLock;

use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use regex::Regex;
use rusqlite::{params, Connection, OptionalExtension};

use common::outcome::ActionReply;
use common::requests::PersonKind;
use serde::Deserialize;

use crate::db::AppState;
use crate::error::PortalError;
use crate::services::auth;
use crate::session::{self, SessionsState};

/// Password every provisioned account starts with; holders are expected to
/// change it on first login.
const DEFAULT_PASSWORD: &str = "faculty123";

#[derive(Debug, Deserialize)]
pub struct ProvisionRequest {
    pub person: PersonKind,
    pub person_id: i64,
}

pub async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    payload: web::Json<ProvisionRequest>,
) -> Result<HttpResponse, PortalError> {
    session::require_admin(&req, &sessions).await?;
    let conn = state.conn()?;
    let identity_id = provision_account(&conn, payload.person, payload.person_id)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("account created", Some(identity_id))))
}

/// Create a login identity for a directory person and link it. The person
/// must not already hold one.
pub fn provision_account(
    conn: &Connection,
    kind: PersonKind,
    person_id: i64,
) -> Result<i64, PortalError> {
    let table = match kind {
        PersonKind::Faculty => "faculty_members",
        PersonKind::Staff => "staff_members",
    };
    let row: Option<(Option<i64>, String, String)> = conn
        .query_row(
            &format!("SELECT user_id, name, email FROM {table} WHERE id = ?1"),
            params![person_id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()?;
    let Some((user_id, name, email)) = row else {
        return Err(PortalError::NotFound);
    };
    if user_id.is_some() {
        return Err(PortalError::conflict("person already has an account"));
    }

    let username = unique_username(conn, &name)?;
    let identity_id = auth::create_identity(conn, &username, &email, DEFAULT_PASSWORD, false)?;
    conn.execute(
        &format!("UPDATE {table} SET user_id = ?1 WHERE id = ?2"),
        params![identity_id, person_id],
    )?;
    info!("provisioned account '{}' for {} #{}", username, table, person_id);
    Ok(identity_id)
}

fn letters() -> &'static Regex {
    static LETTERS: OnceLock<Regex> = OnceLock::new();
    LETTERS.get_or_init(|| Regex::new("[^a-zA-Z]").expect("static pattern"))
}

/// Base username from a display name: the first name in full plus the
/// initials of the remaining names, all lowercase. Honorific prefixes like
/// "Dr." or "Md." are dropped.
pub fn username_base(name: &str) -> String {
    let mut parts = name
        .split_whitespace()
        .filter_map(|token| {
            let clean = letters().replace_all(token, "").to_lowercase();
            (!clean.is_empty()).then_some(clean)
        })
        .filter(|token| !matches!(token.as_str(), "dr" | "md" | "prof" | "mr" | "mrs" | "ms"));

    let Some(first) = parts.next() else {
        return "user".to_owned();
    };
    let initials: String = parts.filter_map(|token| token.chars().next()).collect();
    format!("{first}{initials}")
}

fn unique_username(conn: &Connection, name: &str) -> Result<String, PortalError> {
    let base = username_base(name);
    let mut candidate = base.clone();
    let mut suffix = 1u32;
    loop {
        let taken: Option<i64> = conn
            .query_row(
                "SELECT id FROM identities WHERE username = ?1",
                params![candidate],
                |r| r.get(0),
            )
            .optional()?;
        if taken.is_none() {
            return Ok(candidate);
        }
        candidate = format!("{base}{suffix}");
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn base_usernames_drop_honorifics_and_punctuation() {
        assert_eq!(username_base("Dr. Abdul Rahman Khan"), "abdulrk");
        assert_eq!(username_base("Md. Karim Uddin"), "karimu");
        assert_eq!(username_base("Fatema"), "fatema");
        assert_eq!(username_base("  "), "user");
    }

    #[test]
    fn collisions_get_numeric_suffixes() {
        let conn = db::memory_conn();
        for email in ["a@x", "b@x"] {
            conn.execute(
                "INSERT INTO faculty_members (name, designation, status, email)
                 VALUES ('Abdul Rahman', 'lecturer', 'active', ?1)",
                params![email],
            )
            .unwrap();
        }
        let first = provision_account(&conn, PersonKind::Faculty, 1).unwrap();
        let second = provision_account(&conn, PersonKind::Faculty, 2).unwrap();
        let names: Vec<String> = {
            let mut stmt = conn
                .prepare("SELECT username FROM identities WHERE id IN (?1, ?2) ORDER BY id")
                .unwrap();
            stmt.query_map(params![first, second], |r| r.get(0))
                .unwrap()
                .collect::<Result<_, _>>()
                .unwrap()
        };
        assert_eq!(names, vec!["abdulr".to_owned(), "abdulr1".to_owned()]);
    }

    #[test]
    fn already_linked_person_conflicts() {
        let conn = db::memory_conn();
        conn.execute(
            "INSERT INTO faculty_members (name, designation, status, email)
             VALUES ('Abdul Rahman', 'lecturer', 'active', 'a@x')",
            [],
        )
        .unwrap();
        provision_account(&conn, PersonKind::Faculty, 1).unwrap();
        let err = provision_account(&conn, PersonKind::Faculty, 1).unwrap_err();
        assert!(matches!(err, PortalError::Conflict(_)));
    }

    #[test]
    fn provisioned_account_logs_in_with_the_default_password() {
        let conn = db::memory_conn();
        conn.execute(
            "INSERT INTO staff_members (name, designation, status, email)
             VALUES ('Karim Uddin', 'officer', 'active', 'k@x')",
            [],
        )
        .unwrap();
        provision_account(&conn, PersonKind::Staff, 1).unwrap();
        let actor = auth::verify_credentials(&conn, "karimu", DEFAULT_PASSWORD)
            .unwrap()
            .unwrap();
        assert!(!actor.is_admin);
    }
}
