//! Faculty and staff directory.
//!
//! Listing and detail pages are public. An admin may create and edit any
//! entry; a person with a linked login may edit their own row. Education
//! and experience sub-records are replaced wholesale on every faculty
//! write, keeping their submitted order.

mod faculty;
mod staff;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

use crate::error::PortalError;
use crate::session::Actor;

const API_PATH: &str = "/api/directory";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/faculty", get().to(faculty::list))
        .route("/faculty", post().to(faculty::create))
        .route("/faculty/{id}", get().to(faculty::detail))
        .route("/faculty/{id}", post().to(faculty::edit))
        .route("/staff", get().to(staff::list))
        .route("/staff", post().to(staff::create))
        .route("/staff/{id}", get().to(staff::detail))
        .route("/staff/{id}", post().to(staff::edit))
}

/// Directory rows are editable by an admin or by the person the row
/// belongs to.
fn authorize_profile_edit(actor: Actor, user_id: Option<i64>) -> Result<(), PortalError> {
    if actor.is_admin || user_id == Some(actor.identity_id) {
        Ok(())
    } else {
        Err(PortalError::Forbidden)
    }
}
