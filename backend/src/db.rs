//! SQLite access and schema.
//!
//! Every handler opens its own connection against the configured database
//! file (SQLite serialises writers; `busy_timeout` covers contention). The
//! two singleton invariants get database-level backstops on top of the
//! application checks: a partial unique index allows at most one
//! `chairman_terms` row with `is_current = 1`, and `department_statistics`
//! is pinned to a single row by `CHECK (id = 1)`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;

use crate::error::PortalError;

/// Shared application state handed to handlers via `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub db_path: PathBuf,
}

impl AppState {
    pub fn conn(&self) -> Result<Connection, PortalError> {
        Ok(open(&self.db_path)?)
    }
}

pub fn open(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS identities (
    id           INTEGER PRIMARY KEY,
    username     TEXT NOT NULL UNIQUE,
    email        TEXT NOT NULL,
    password_md5 TEXT NOT NULL,
    is_admin     INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS faculty_members (
    id                INTEGER PRIMARY KEY,
    user_id           INTEGER UNIQUE REFERENCES identities(id) ON DELETE SET NULL,
    name              TEXT NOT NULL,
    designation       TEXT NOT NULL,
    status            TEXT NOT NULL DEFAULT 'active',
    email             TEXT NOT NULL,
    phone             TEXT,
    room_no           TEXT,
    photo             TEXT,
    bio               TEXT,
    research_interest TEXT,
    joined_date       TEXT
);

CREATE TABLE IF NOT EXISTS faculty_education (
    id          INTEGER PRIMARY KEY,
    faculty_id  INTEGER NOT NULL REFERENCES faculty_members(id) ON DELETE CASCADE,
    degree      TEXT NOT NULL,
    institution TEXT NOT NULL,
    year        INTEGER,
    position    INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS faculty_experience (
    id           INTEGER PRIMARY KEY,
    faculty_id   INTEGER NOT NULL REFERENCES faculty_members(id) ON DELETE CASCADE,
    title        TEXT NOT NULL,
    organization TEXT NOT NULL,
    from_year    INTEGER,
    to_year      INTEGER,
    position     INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS staff_members (
    id          INTEGER PRIMARY KEY,
    user_id     INTEGER UNIQUE REFERENCES identities(id) ON DELETE SET NULL,
    name        TEXT NOT NULL,
    designation TEXT NOT NULL,
    status      TEXT NOT NULL DEFAULT 'active',
    email       TEXT NOT NULL,
    phone       TEXT,
    photo       TEXT
);

CREATE TABLE IF NOT EXISTS notices (
    id           INTEGER PRIMARY KEY,
    title        TEXT NOT NULL,
    content      TEXT NOT NULL,
    file_ref     TEXT,
    is_important INTEGER NOT NULL DEFAULT 0,
    created_by   INTEGER REFERENCES identities(id) ON DELETE SET NULL,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS scrolling_notices (
    id         INTEGER PRIMARY KEY,
    text       TEXT NOT NULL,
    is_active  INTEGER NOT NULL DEFAULT 0,
    created_by INTEGER REFERENCES identities(id) ON DELETE SET NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS publications (
    id               INTEGER PRIMARY KEY,
    title            TEXT NOT NULL,
    authors          TEXT NOT NULL,
    kind             TEXT NOT NULL,
    venue            TEXT,
    publisher        TEXT,
    publication_date TEXT NOT NULL,
    doi              TEXT,
    link             TEXT,
    abstract_text    TEXT,
    created_by       INTEGER REFERENCES identities(id) ON DELETE SET NULL,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS projects (
    id             INTEGER PRIMARY KEY,
    title          TEXT NOT NULL,
    description    TEXT NOT NULL,
    kind           TEXT NOT NULL,
    start_date     TEXT NOT NULL,
    end_date       TEXT,
    is_ongoing     INTEGER NOT NULL DEFAULT 0,
    funding_agency TEXT,
    budget         REAL,
    outcome        TEXT,
    created_by     INTEGER REFERENCES identities(id) ON DELETE SET NULL,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS events (
    id          INTEGER PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    venue       TEXT,
    start_date  TEXT NOT NULL,
    end_date    TEXT NOT NULL,
    is_upcoming INTEGER NOT NULL DEFAULT 1,
    created_by  INTEGER REFERENCES identities(id) ON DELETE SET NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tech_news (
    id             INTEGER PRIMARY KEY,
    title          TEXT NOT NULL,
    content        TEXT NOT NULL,
    source         TEXT,
    url            TEXT,
    published_date TEXT NOT NULL,
    image_ref      TEXT,
    created_by     INTEGER REFERENCES identities(id) ON DELETE SET NULL,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS gallery_images (
    id         INTEGER PRIMARY KEY,
    title      TEXT NOT NULL,
    image_ref  TEXT NOT NULL,
    created_by INTEGER REFERENCES identities(id) ON DELETE SET NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS carousel_items (
    id            INTEGER PRIMARY KEY,
    title         TEXT NOT NULL,
    caption       TEXT,
    image_ref     TEXT NOT NULL,
    is_active     INTEGER NOT NULL DEFAULT 0,
    display_order INTEGER NOT NULL DEFAULT 0,
    created_by    INTEGER REFERENCES identities(id) ON DELETE SET NULL,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS chairman_terms (
    id         INTEGER PRIMARY KEY,
    faculty_id INTEGER NOT NULL REFERENCES faculty_members(id),
    message    TEXT NOT NULL,
    from_date  TEXT NOT NULL,
    to_date    TEXT,
    is_current INTEGER NOT NULL DEFAULT 0
);

CREATE UNIQUE INDEX IF NOT EXISTS one_current_chairman
    ON chairman_terms (is_current) WHERE is_current = 1;

CREATE TABLE IF NOT EXISTS department_statistics (
    id                  INTEGER PRIMARY KEY CHECK (id = 1),
    faculty_count       INTEGER NOT NULL DEFAULT 0,
    research_area_count INTEGER NOT NULL DEFAULT 0,
    publication_count   INTEGER NOT NULL DEFAULT 0,
    project_count       INTEGER NOT NULL DEFAULT 0,
    updated_at          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS page_views (
    page_name    TEXT PRIMARY KEY,
    count        INTEGER NOT NULL DEFAULT 0,
    last_updated TEXT NOT NULL
);
"#;

/// In-memory database with the full schema, for tests across the crate.
#[cfg(test)]
pub fn memory_conn() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    conn.pragma_update(None, "foreign_keys", "ON").expect("pragma");
    init_schema(&conn).expect("schema");
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_init_is_idempotent() {
        let conn = memory_conn();
        init_schema(&conn).unwrap();
    }

    #[test]
    fn partial_index_rejects_second_current_term() {
        let conn = memory_conn();
        conn.execute(
            "INSERT INTO faculty_members (name, designation, status, email)
             VALUES ('A', 'professor', 'active', 'a@cse.edu')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO chairman_terms (faculty_id, message, from_date, is_current)
             VALUES (1, 'm', '2020-01-01', 1)",
            [],
        )
        .unwrap();
        let err = conn.execute(
            "INSERT INTO chairman_terms (faculty_id, message, from_date, is_current)
             VALUES (1, 'm', '2023-01-01', 1)",
            [],
        );
        assert!(err.is_err());
    }

    #[test]
    fn statistics_table_is_single_row() {
        let conn = memory_conn();
        conn.execute(
            "INSERT INTO department_statistics (id, updated_at) VALUES (1, '2026-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        let err = conn.execute(
            "INSERT INTO department_statistics (id, updated_at) VALUES (2, '2026-01-01T00:00:00Z')",
            [],
        );
        assert!(err.is_err());
    }

    #[test]
    fn identity_removal_orphans_owned_content() {
        let conn = memory_conn();
        conn.execute(
            "INSERT INTO identities (username, email, password_md5) VALUES ('u', 'u@x', 'h')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO notices (title, content, created_by, created_at, updated_at)
             VALUES ('t', 'c', 1, '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        conn.execute("DELETE FROM identities WHERE id = 1", []).unwrap();
        let owner: Option<i64> = conn
            .query_row("SELECT created_by FROM notices WHERE id = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(owner, None);
        // sanity: the row itself survives
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM notices", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 1);
    }
}
