use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use rusqlite::{params, Connection, Row};

use common::model::tech_news::TechNews;
use common::outcome::ActionReply;
use common::requests::TechNewsPayload;

use crate::content::{self, require_text, ContentTable};
use crate::db::AppState;
use crate::error::PortalError;
use crate::page_views;
use crate::session::{self, Actor, SessionsState};

fn from_row(row: &Row) -> rusqlite::Result<TechNews> {
    Ok(TechNews {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        source: row.get(3)?,
        url: row.get(4)?,
        published_date: row.get(5)?,
        image_ref: row.get(6)?,
        created_by: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    let rows = list_news(&conn)?;
    page_views::record_view_best_effort(&conn, "tech_news");
    Ok(HttpResponse::Ok().json(rows))
}

pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    payload: web::Json<TechNewsPayload>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let conn = state.conn()?;
    let id = create_news(&conn, actor, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("news item created", Some(id))))
}

pub async fn edit(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    path: web::Path<i64>,
    payload: web::Json<TechNewsPayload>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let id = path.into_inner();
    let conn = state.conn()?;
    edit_news(&conn, actor, id, &payload)?;
    Ok(HttpResponse::Ok().json(ActionReply::success("news item updated", Some(id))))
}

pub async fn delete(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let conn = state.conn()?;
    delete_news(&conn, actor, path.into_inner())?;
    Ok(HttpResponse::Ok().json(ActionReply::success("news item deleted", None)))
}

pub fn list_news(conn: &Connection) -> Result<Vec<TechNews>, PortalError> {
    let mut stmt = conn.prepare(
        "SELECT id, title, content, source, url, published_date, image_ref,
                created_by, created_at, updated_at
         FROM tech_news ORDER BY published_date DESC",
    )?;
    let rows = stmt.query_map([], from_row)?.collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn create_news(
    conn: &Connection,
    actor: Actor,
    payload: &TechNewsPayload,
) -> Result<i64, PortalError> {
    require_text(&payload.title, "title")?;
    require_text(&payload.content, "content")?;
    let now = Utc::now();
    // a missing publish date means "published now"
    let published = payload.published_date.unwrap_or(now);
    conn.execute(
        "INSERT INTO tech_news (title, content, source, url, published_date, image_ref,
                                created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        params![
            payload.title,
            payload.content,
            payload.source,
            payload.url,
            published,
            payload.image_ref,
            actor.identity_id,
            now
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn edit_news(
    conn: &Connection,
    actor: Actor,
    id: i64,
    payload: &TechNewsPayload,
) -> Result<(), PortalError> {
    content::authorize_mutation(conn, ContentTable::TechNews, id, actor)?;
    require_text(&payload.title, "title")?;
    require_text(&payload.content, "content")?;
    let now = Utc::now();
    let published = payload.published_date.unwrap_or(now);
    conn.execute(
        "UPDATE tech_news SET title = ?1, content = ?2, source = ?3, url = ?4,
                published_date = ?5, image_ref = ?6, updated_at = ?7
         WHERE id = ?8",
        params![
            payload.title,
            payload.content,
            payload.source,
            payload.url,
            published,
            payload.image_ref,
            now,
            id
        ],
    )?;
    Ok(())
}

pub fn delete_news(conn: &Connection, actor: Actor, id: i64) -> Result<(), PortalError> {
    content::authorize_mutation(conn, ContentTable::TechNews, id, actor)?;
    conn.execute("DELETE FROM tech_news WHERE id = ?1", params![id])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn missing_publish_date_defaults_to_now() {
        let conn = db::memory_conn();
        conn.execute(
            "INSERT INTO identities (username, email, password_md5) VALUES ('s', 's@x', 'h')",
            [],
        )
        .unwrap();
        let actor = Actor { identity_id: 1, is_admin: false };
        let payload = TechNewsPayload {
            title: "Rust 1.90 released".into(),
            content: "Highlights...".into(),
            source: Some("blog".into()),
            url: None,
            published_date: None,
            image_ref: None,
        };
        let id = create_news(&conn, actor, &payload).unwrap();
        let news = list_news(&conn).unwrap();
        assert_eq!(news.len(), 1);
        assert_eq!(news[0].id, id);
        assert!(news[0].published_date <= Utc::now());
    }
}
