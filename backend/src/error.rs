//! Error taxonomy for the portal core.
//!
//! Expected, user-correctable failures (bad payload, not the owner, unknown
//! id, invariant conflict) map to 4xx responses carrying an `ActionReply`
//! body, so the presentation layer can show them as form feedback rather
//! than treating them as faults. Database and storage trouble surfaces as
//! an opaque 500.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use common::outcome::{ActionReply, Outcome};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("{0}")]
    Validation(String),

    #[error("you are not allowed to modify this record")]
    Forbidden,

    #[error("record not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl PortalError {
    pub fn validation(msg: impl Into<String>) -> Self {
        PortalError::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        PortalError::Conflict(msg.into())
    }

    fn outcome(&self) -> Option<Outcome> {
        match self {
            PortalError::Validation(_) => Some(Outcome::ValidationFailed),
            PortalError::Forbidden => Some(Outcome::Forbidden),
            PortalError::NotFound => Some(Outcome::NotFound),
            PortalError::Conflict(_) => Some(Outcome::Conflict),
            PortalError::Database(_) | PortalError::Storage(_) => None,
        }
    }
}

impl actix_web::ResponseError for PortalError {
    fn status_code(&self) -> StatusCode {
        match self {
            PortalError::Validation(_) => StatusCode::BAD_REQUEST,
            PortalError::Forbidden => StatusCode::FORBIDDEN,
            PortalError::NotFound => StatusCode::NOT_FOUND,
            PortalError::Conflict(_) => StatusCode::CONFLICT,
            PortalError::Database(_) | PortalError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self.outcome() {
            Some(outcome) => HttpResponse::build(self.status_code()).json(ActionReply {
                outcome,
                message: self.to_string(),
                id: None,
            }),
            // Database details stay in the log, not in the response.
            None => HttpResponse::InternalServerError().body("internal error"),
        }
    }
}
