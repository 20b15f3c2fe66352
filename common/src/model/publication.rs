use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationKind {
    Journal,
    Conference,
    Book,
    Chapter,
}

impl PublicationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationKind::Journal => "journal",
            PublicationKind::Conference => "conference",
            PublicationKind::Book => "book",
            PublicationKind::Chapter => "chapter",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "journal" => Some(PublicationKind::Journal),
            "conference" => Some(PublicationKind::Conference),
            "book" => Some(PublicationKind::Book),
            "chapter" => Some(PublicationKind::Chapter),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
    pub id: i64,
    pub title: String,
    pub authors: String,
    pub kind: PublicationKind,
    pub venue: Option<String>,
    pub publisher: Option<String>,
    pub publication_date: NaiveDate,
    pub doi: Option<String>,
    pub link: Option<String>,
    pub abstract_text: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
