use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One chairmanship. System-wide at most one term has `is_current` set;
/// a current term never carries a `to_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChairmanTerm {
    pub id: i64,
    pub faculty_id: i64,
    pub message: String,
    pub from_date: NaiveDate,
    pub to_date: Option<NaiveDate>,
    pub is_current: bool,
}

/// Current term joined with the holder's directory entry, as served to the
/// chairman-message page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentChairman {
    pub term: ChairmanTerm,
    pub faculty_name: String,
    pub faculty_email: String,
    pub faculty_photo: Option<String>,
}
