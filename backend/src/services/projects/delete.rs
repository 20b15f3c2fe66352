use actix_web::{web, HttpRequest, HttpResponse};
use rusqlite::{params, Connection};

use common::outcome::ActionReply;

use crate::content::{self, ContentTable};
use crate::db::AppState;
use crate::error::PortalError;
use crate::session::{self, Actor, SessionsState};

pub async fn process(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, PortalError> {
    let actor = session::require_actor(&req, &sessions).await?;
    let conn = state.conn()?;
    delete_project(&conn, actor, path.into_inner())?;
    Ok(HttpResponse::Ok().json(ActionReply::success("project deleted", None)))
}

pub fn delete_project(conn: &Connection, actor: Actor, id: i64) -> Result<(), PortalError> {
    content::authorize_mutation(conn, ContentTable::Projects, id, actor)?;
    conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
    Ok(())
}
