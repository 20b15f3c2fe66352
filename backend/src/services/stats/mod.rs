//! Department statistics singleton and visit counters.

mod statistics;
mod views;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/stats";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(statistics::effective))
        .route("", post().to(statistics::create))
        .route("", put().to(statistics::update))
        .route("", delete().to(statistics::refuse_delete))
}

/// Counters get their own top-level path; they are a read-only admin view.
pub fn page_view_routes() -> Scope {
    scope("/api/page-views").route("", get().to(views::list))
}
