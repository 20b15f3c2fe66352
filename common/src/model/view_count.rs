use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Monotonic per-page visit counter. Created lazily on the first view of a
/// page key, incremented on every subsequent one, never reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewCount {
    pub page_name: String,
    pub count: i64,
    pub last_updated: DateTime<Utc>,
}
