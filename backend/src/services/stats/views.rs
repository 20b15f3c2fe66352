use actix_web::{web, HttpRequest, HttpResponse};

use crate::db::AppState;
use crate::error::PortalError;
use crate::page_views;
use crate::session::{self, SessionsState};

pub async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
) -> Result<HttpResponse, PortalError> {
    session::require_admin(&req, &sessions).await?;
    let conn = state.conn()?;
    Ok(HttpResponse::Ok().json(page_views::list(&conn)?))
}
