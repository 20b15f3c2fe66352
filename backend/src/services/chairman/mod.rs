//! Chairman succession.
//!
//! At most one term is current at any time. Appointing a new chairman
//! demotes whoever holds the post in the same transaction, so readers
//! never observe zero-or-two current terms. The partial unique index on
//! `chairman_terms` backstops the invariant at the database level.

mod appoint;
mod current;
mod end_term;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/chairman";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/current", get().to(current::process))
        .route("/appoint", post().to(appoint::process))
        .route("/terms", get().to(current::history))
        .route("/terms/{id}/end", post().to(end_term::process))
}
