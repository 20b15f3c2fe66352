//! Image gallery and home-page carousel.

mod carousel;
mod images;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/gallery";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(images::list))
        .route("", post().to(images::create))
        .route("/carousel", get().to(carousel::list))
        .route("/carousel", post().to(carousel::create))
        .route("/carousel/{id}", post().to(carousel::edit))
        .route("/carousel/{id}/delete", post().to(carousel::delete))
        .route("/{id}", post().to(images::edit))
        .route("/{id}/delete", post().to(images::delete))
}
