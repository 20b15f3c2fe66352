use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notice-board entry. `file_ref` points into the media store when an
/// attachment was uploaded with the notice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub file_ref: Option<String>,
    pub is_important: bool,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Short ticker text shown site-wide while `is_active` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollingNotice {
    pub id: i64,
    pub text: String,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
