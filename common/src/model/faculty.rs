use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Designation {
    Professor,
    AssociateProfessor,
    AssistantProfessor,
    Lecturer,
    Chairman,
}

impl Designation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Designation::Professor => "professor",
            Designation::AssociateProfessor => "associate_professor",
            Designation::AssistantProfessor => "assistant_professor",
            Designation::Lecturer => "lecturer",
            Designation::Chairman => "chairman",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "professor" => Some(Designation::Professor),
            "associate_professor" => Some(Designation::AssociateProfessor),
            "assistant_professor" => Some(Designation::AssistantProfessor),
            "lecturer" => Some(Designation::Lecturer),
            "chairman" => Some(Designation::Chairman),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Active,
    OnLeave,
    Past,
    ExChairman,
}

impl EmploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::Active => "active",
            EmploymentStatus::OnLeave => "on_leave",
            EmploymentStatus::Past => "past",
            EmploymentStatus::ExChairman => "ex_chairman",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(EmploymentStatus::Active),
            "on_leave" => Some(EmploymentStatus::OnLeave),
            "past" => Some(EmploymentStatus::Past),
            "ex_chairman" => Some(EmploymentStatus::ExChairman),
            _ => None,
        }
    }
}

/// A directory entry for a faculty member. `user_id` is the optional 1:1
/// link to a login identity; at most one person may hold a given identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacultyMember {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub designation: Designation,
    pub status: EmploymentStatus,
    pub email: String,
    pub phone: Option<String>,
    pub room_no: Option<String>,
    pub photo: Option<String>,
    pub bio: Option<String>,
    pub research_interest: Option<String>,
    pub joined_date: Option<NaiveDate>,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub organization: String,
    pub from_year: Option<i32>,
    pub to_year: Option<i32>,
}

/// Officer/staff directory entry. Same identity-link rules as faculty,
/// free-text designation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub designation: String,
    pub status: EmploymentStatus,
    pub email: String,
    pub phone: Option<String>,
    pub photo: Option<String>,
}
