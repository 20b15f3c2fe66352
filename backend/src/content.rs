//! Shared pieces of the content lifecycle: the ownership rule and the small
//! field validations every content service applies before persisting.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::PortalError;
use crate::session::Actor;

/// Content tables whose rows carry a `created_by` owner.
#[derive(Debug, Clone, Copy)]
pub enum ContentTable {
    Notices,
    ScrollingNotices,
    Publications,
    Projects,
    Events,
    TechNews,
    GalleryImages,
    CarouselItems,
}

impl ContentTable {
    pub fn name(&self) -> &'static str {
        match self {
            ContentTable::Notices => "notices",
            ContentTable::ScrollingNotices => "scrolling_notices",
            ContentTable::Publications => "publications",
            ContentTable::Projects => "projects",
            ContentTable::Events => "events",
            ContentTable::TechNews => "tech_news",
            ContentTable::GalleryImages => "gallery_images",
            ContentTable::CarouselItems => "carousel_items",
        }
    }
}

/// The owner of a row, or `NotFound` when the id is unknown.
pub fn fetch_owner(
    conn: &Connection,
    table: ContentTable,
    id: i64,
) -> Result<Option<i64>, PortalError> {
    let sql = format!("SELECT created_by FROM {} WHERE id = ?1", table.name());
    conn.query_row(&sql, params![id], |row| row.get(0))
        .optional()?
        .ok_or(PortalError::NotFound)
}

/// The mutation rule of the lifecycle manager: the creator may mutate their
/// own rows; an administrator may additionally mutate orphaned rows (owner
/// removed), which would otherwise be uneditable forever. Nobody else.
pub fn check_ownership(actor: Actor, created_by: Option<i64>) -> Result<(), PortalError> {
    match created_by {
        Some(owner) if owner == actor.identity_id => Ok(()),
        None if actor.is_admin => Ok(()),
        _ => Err(PortalError::Forbidden),
    }
}

/// Combined lookup + ownership check used by every edit/delete path.
pub fn authorize_mutation(
    conn: &Connection,
    table: ContentTable,
    id: i64,
    actor: Actor,
) -> Result<(), PortalError> {
    let owner = fetch_owner(conn, table, id)?;
    check_ownership(actor, owner)
}

pub fn require_text(value: &str, field: &str) -> Result<(), PortalError> {
    if value.trim().is_empty() {
        Err(PortalError::validation(format!("{} must not be empty", field)))
    } else {
        Ok(())
    }
}
