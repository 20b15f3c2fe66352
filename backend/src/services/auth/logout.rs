use actix_web::{web, HttpRequest, HttpResponse};

use common::outcome::ActionReply;

use crate::session::{SessionsState, SESSION_HEADER};

/// Dropping an unknown token is still a successful logout.
pub async fn process(req: HttpRequest, sessions: web::Data<SessionsState>) -> HttpResponse {
    if let Some(token) = req
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        sessions.remove(token).await;
    }
    HttpResponse::Ok().json(ActionReply::success("logged out", None))
}
