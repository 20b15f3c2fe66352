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
    delete_publication(&conn, actor, path.into_inner())?;
    Ok(HttpResponse::Ok().json(ActionReply::success("publication deleted", None)))
}

pub fn delete_publication(conn: &Connection, actor: Actor, id: i64) -> Result<(), PortalError> {
    content::authorize_mutation(conn, ContentTable::Publications, id, actor)?;
    conn.execute("DELETE FROM publications WHERE id = ?1", params![id])?;
    Ok(())
}
