use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    Research,
    Thesis,
    Industry,
    Academic,
}

impl ProjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectKind::Research => "research",
            ProjectKind::Thesis => "thesis",
            ProjectKind::Industry => "industry",
            ProjectKind::Academic => "academic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "research" => Some(ProjectKind::Research),
            "thesis" => Some(ProjectKind::Thesis),
            "industry" => Some(ProjectKind::Industry),
            "academic" => Some(ProjectKind::Academic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub kind: ProjectKind,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_ongoing: bool,
    pub funding_agency: Option<String>,
    pub budget: Option<f64>,
    pub outcome: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
