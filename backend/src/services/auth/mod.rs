//! Login/logout for the staff and faculty dashboards.
//!
//! Sessions are held in the shared `SessionsState` map; the other services
//! resolve the acting identity from the `X-Session-Token` header through
//! `crate::session::require_actor`.

mod identity;
mod login;
mod logout;

pub use identity::{create_identity, verify_credentials};

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/auth";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/login", post().to(login::process))
        .route("/logout", post().to(logout::process))
}
