use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: i64,
    pub title: String,
    pub image_ref: String,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Home-page carousel slide. Ordering is by ascending `display_order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselItem {
    pub id: i64,
    pub title: String,
    pub caption: Option<String>,
    pub image_ref: String,
    pub is_active: bool,
    pub display_order: i64,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
