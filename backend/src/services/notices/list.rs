use actix_web::{web, HttpResponse};
use rusqlite::Connection;
use serde::Deserialize;

use common::model::notice::Notice;

use crate::db::AppState;
use crate::error::PortalError;
use crate::page_views;

use super::{notice_from_row, NOTICE_COLUMNS};

#[derive(Deserialize)]
pub struct ListQuery {
    important: Option<bool>,
}

pub async fn process(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    let notices = list_notices(&conn, query.important.unwrap_or(false))?;
    page_views::record_view_best_effort(&conn, "notices");
    Ok(HttpResponse::Ok().json(notices))
}

/// Newest first, matching the board's display order.
pub fn list_notices(conn: &Connection, important_only: bool) -> Result<Vec<Notice>, PortalError> {
    let sql = if important_only {
        format!(
            "SELECT {} FROM notices WHERE is_important = 1 ORDER BY created_at DESC",
            NOTICE_COLUMNS
        )
    } else {
        format!("SELECT {} FROM notices ORDER BY created_at DESC", NOTICE_COLUMNS)
    };
    let mut stmt = conn.prepare(&sql)?;
    let notices = stmt
        .query_map([], notice_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(notices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::services::notices::create::create_notice;
    use crate::session::Actor;
    use common::requests::NoticePayload;

    #[test]
    fn important_filter_narrows_the_listing() {
        let conn = db::memory_conn();
        conn.execute(
            "INSERT INTO identities (username, email, password_md5) VALUES ('s', 's@x', 'h')",
            [],
        )
        .unwrap();
        let actor = Actor { identity_id: 1, is_admin: false };
        for (title, important) in [("a", true), ("b", false), ("c", true)] {
            let payload = NoticePayload {
                title: title.into(),
                content: "c".into(),
                is_important: important,
            };
            create_notice(&conn, actor, &payload, None).unwrap();
        }

        assert_eq!(list_notices(&conn, false).unwrap().len(), 3);
        let important = list_notices(&conn, true).unwrap();
        assert_eq!(important.len(), 2);
        assert!(important.iter().all(|n| n.is_important));
    }
}
