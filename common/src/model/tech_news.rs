use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechNews {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub source: Option<String>,
    pub url: Option<String>,
    pub published_date: DateTime<Utc>,
    pub image_ref: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
