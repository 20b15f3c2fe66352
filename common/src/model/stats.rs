use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The department-statistics singleton as stored. A zero in any numeric
/// field means "no manual override, compute the live value on read".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentStatistics {
    pub faculty_count: i64,
    pub research_area_count: i64,
    pub publication_count: i64,
    pub project_count: i64,
    pub updated_at: DateTime<Utc>,
}

/// What the presentation layer gets: every field resolved, with a marker
/// telling which ones were computed rather than manually entered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveStatistics {
    pub faculty_count: i64,
    pub research_area_count: i64,
    pub publication_count: i64,
    pub project_count: i64,
    pub computed_fields: Vec<String>,
}
