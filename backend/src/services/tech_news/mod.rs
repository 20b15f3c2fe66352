//! Tech-news feed shown on the home page.

mod news;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/tech-news";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(news::list))
        .route("", post().to(news::create))
        .route("/{id}", post().to(news::edit))
        .route("/{id}/delete", post().to(news::delete))
}
