//! Linking directory people to login identities.
//!
//! A directory row (faculty or staff) may carry at most one identity, and
//! an identity belongs to at most one person across both tables. The auto
//! pass links by exact email match and refuses anything ambiguous; the
//! manual endpoint lets an admin resolve what the heuristic skipped. All
//! routes are admin-only.

mod accounts;
mod auto;
mod manual;
mod report;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/linking";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/auto", post().to(auto::process))
        .route("/manual", post().to(manual::process))
        .route("/accounts", post().to(accounts::process))
        .route("/report", get().to(report::process))
}
