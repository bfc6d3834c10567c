use crate::diff::SuggestionDiff;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Review lifecycle of a persisted suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SuggestionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// A reviewer-submitted proposed change to one question, as the persistence
/// collaborator stores it. Timestamps are RFC3339 strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Suggestion {
    pub id: String,
    pub question_ref: String,
    pub submitter_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitter_email: Option<String>,
    pub suggestion_text: String,
    pub reason: String,
    pub status: SuggestionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_changes: Option<SuggestionDiff>,
    pub created_at: String,
    pub updated_at: String,
}

/// One threaded discussion entry under a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Comment {
    pub suggestion_id: String,
    pub author: String,
    pub message: String,
    pub created_at: String,
}
