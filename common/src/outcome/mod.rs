use serde::{Deserialize, Serialize};

/// How a write operation ended, as reported back to the submitting actor.
/// Expected failures (bad payload, not the owner, unknown id) are ordinary
/// outcomes here, not transport-level faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    ValidationFailed,
    Forbidden,
    NotFound,
    Conflict,
}

/// JSON body returned by every mutating endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionReply {
    pub outcome: Outcome,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl ActionReply {
    pub fn success(message: impl Into<String>, id: Option<i64>) -> Self {
        ActionReply {
            outcome: Outcome::Success,
            message: message.into(),
            id,
        }
    }
}

/// Summary returned by the identity auto-linking pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LinkReport {
    /// Links created in this run.
    pub linked: u32,
    /// Candidates left untouched: no email match, ambiguous match, or the
    /// matched identity already belongs to someone else.
    pub skipped: u32,
}
