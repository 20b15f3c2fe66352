use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::faculty::{EducationEntry, ExperienceEntry};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Notice fields as submitted; the attachment travels beside this struct as
/// a separate multipart field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticePayload {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_important: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollingNoticePayload {
    pub text: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventPayload {
    pub title: String,
    pub description: String,
    pub venue: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationPayload {
    pub title: String,
    pub authors: String,
    pub kind: String,
    pub venue: Option<String>,
    pub publisher: Option<String>,
    pub publication_date: NaiveDate,
    pub doi: Option<String>,
    pub link: Option<String>,
    pub abstract_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPayload {
    pub title: String,
    pub description: String,
    pub kind: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_ongoing: bool,
    pub funding_agency: Option<String>,
    pub budget: Option<f64>,
    pub outcome: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechNewsPayload {
    pub title: String,
    pub content: String,
    pub source: Option<String>,
    pub url: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub image_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImagePayload {
    pub title: String,
    pub image_ref: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselItemPayload {
    pub title: String,
    pub caption: Option<String>,
    pub image_ref: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointRequest {
    pub faculty_id: i64,
    pub from_date: NaiveDate,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndTermRequest {
    pub to_date: NaiveDate,
}

/// Which directory table a person id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonKind {
    Faculty,
    Staff,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualLinkRequest {
    pub person: PersonKind,
    pub person_id: i64,
    pub identity_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacultyPayload {
    pub name: String,
    pub designation: String,
    pub status: String,
    pub email: String,
    pub phone: Option<String>,
    pub room_no: Option<String>,
    pub photo: Option<String>,
    pub bio: Option<String>,
    pub research_interest: Option<String>,
    pub joined_date: Option<NaiveDate>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffPayload {
    pub name: String,
    pub designation: String,
    pub status: String,
    pub email: String,
    pub phone: Option<String>,
    pub photo: Option<String>,
}

/// Manual statistics overrides; zero means "compute this one live".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsPayload {
    #[serde(default)]
    pub faculty_count: i64,
    #[serde(default)]
    pub research_area_count: i64,
    #[serde(default)]
    pub publication_count: i64,
    #[serde(default)]
    pub project_count: i64,
}
