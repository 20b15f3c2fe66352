use actix_web::{web, HttpResponse};
use serde::Serialize;
use uuid::Uuid;

use common::requests::LoginRequest;

use crate::db::AppState;
use crate::error::PortalError;
use crate::session::SessionsState;

use super::identity::verify_credentials;

#[derive(Serialize)]
struct LoginReply {
    token: String,
}

pub async fn process(
    state: web::Data<AppState>,
    sessions: web::Data<SessionsState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, PortalError> {
    let conn = state.conn()?;
    let actor = verify_credentials(&conn, &payload.username, &payload.password)?
        .ok_or_else(|| PortalError::validation("invalid username or password"))?;

    let token = Uuid::new_v4().to_string();
    sessions.insert(token.clone(), actor).await;
    Ok(HttpResponse::Ok().json(LoginReply { token }))
}
