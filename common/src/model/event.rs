use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A department event. `is_upcoming` is derived from `end_date` every time
/// the row is written; it is not recomputed in the background, so an event
/// that is never touched after it ends keeps its last written value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub venue: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_upcoming: bool,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
