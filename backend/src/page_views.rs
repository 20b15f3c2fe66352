//! Per-page visit counters.
//!
//! The increment is a single upsert statement so two requests hitting the
//! same key concurrently cannot lose an update; there is deliberately no
//! read-modify-write in application code, and no decrement or reset.

use chrono::Utc;
use log::warn;
use rusqlite::{params, Connection};

use common::model::view_count::ViewCount;

use crate::error::PortalError;

pub fn record_view(conn: &Connection, page_key: &str) -> Result<(), PortalError> {
    conn.execute(
        "INSERT INTO page_views (page_name, count, last_updated) VALUES (?1, 1, ?2)
         ON CONFLICT(page_name) DO UPDATE
             SET count = count + 1, last_updated = excluded.last_updated",
        params![page_key, Utc::now()],
    )?;
    Ok(())
}

/// Counter bookkeeping must never take a public page down with it.
pub fn record_view_best_effort(conn: &Connection, page_key: &str) {
    if let Err(e) = record_view(conn, page_key) {
        warn!("could not record view for '{}': {}", page_key, e);
    }
}

pub fn list(conn: &Connection) -> Result<Vec<ViewCount>, PortalError> {
    let mut stmt =
        conn.prepare("SELECT page_name, count, last_updated FROM page_views ORDER BY page_name")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ViewCount {
                page_name: row.get(0)?,
                count: row.get(1)?,
                last_updated: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
