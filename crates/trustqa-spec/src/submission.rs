use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::diff::{HelpChanges, SuggestionDiff};
use crate::spec::question::{ItemType, Question};

/// Helper types whose value must be a well-formed URL.
pub const WEBLINK_HELPER_TYPES: &[&str] = &["weblink", "web-link", "url"];

/// The four independent change categories, plus the submission envelope
/// (submitter/reason) so every validation message has a home.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Settings,
    Content,
    Help,
    Logic,
    Submission,
}

/// One validation problem, keyed by the facet whose tab should surface it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FacetError {
    pub facet: Facet,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Read-only validation projection over a diff. Never thrown; the UI gates
/// the submit control on `valid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SuggestionValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FacetError>,
}

impl SuggestionValidation {
    pub fn errors_for(&self, facet: Facet) -> impl Iterator<Item = &FacetError> {
        self.errors.iter().filter(move |error| error.facet == facet)
    }
}

/// Length band for the reviewer's notes/reason text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SubmissionLimits {
    pub reason_min_len: usize,
    pub reason_max_len: usize,
}

impl Default for SubmissionLimits {
    fn default() -> Self {
        Self {
            reason_min_len: 1,
            reason_max_len: 2000,
        }
    }
}

/// Validates a diff against its originating question and the submission
/// envelope. Pure projection to an error list; the diff is never mutated.
pub fn validate_suggestion(
    diff: &SuggestionDiff,
    question: &Question,
    submitter_name: &str,
    reason: &str,
    limits: &SubmissionLimits,
) -> SuggestionValidation {
    let mut errors = Vec::new();

    check_option_count(diff, question, &mut errors);
    if let Some(help) = &diff.help {
        check_helper_link(help, question, &mut errors);
    }

    if submitter_name.trim().is_empty() {
        errors.push(FacetError {
            facet: Facet::Submission,
            message: "submitter name is required".into(),
            code: Some("missing_submitter".into()),
        });
    }
    let reason_len = reason.trim().chars().count();
    if reason_len < limits.reason_min_len {
        errors.push(FacetError {
            facet: Facet::Submission,
            message: format!(
                "reason must be at least {} character(s)",
                limits.reason_min_len
            ),
            code: Some("reason_too_short".into()),
        });
    } else if reason_len > limits.reason_max_len {
        errors.push(FacetError {
            facet: Facet::Submission,
            message: format!(
                "reason must be at most {} characters",
                limits.reason_max_len
            ),
            code: Some("reason_too_long".into()),
        });
    }

    SuggestionValidation {
        valid: errors.is_empty(),
        errors,
    }
}

fn check_option_count(diff: &SuggestionDiff, question: &Question, errors: &mut Vec<FacetError>) {
    let Some(content) = &diff.content else {
        return;
    };

    // The suggested answer type governs the option rule, falling back to the
    // question's current type when the diff leaves it alone.
    let effective_type = content
        .answer_type
        .as_ref()
        .map_or(question.item_type, |change| change.to);
    if !effective_type.is_some_and(ItemType::requires_options) {
        return;
    }

    let (added, removed) = content
        .options
        .as_ref()
        .map_or((0, 0), |options| (options.added.len(), options.removed.len()));
    let resulting = (question.options.len() + added).saturating_sub(removed);
    if resulting < 2 {
        errors.push(FacetError {
            facet: Facet::Content,
            message: format!(
                "a choice question needs at least 2 options ({} would remain)",
                resulting
            ),
            code: Some("too_few_options".into()),
        });
    }
}

fn check_helper_link(help: &HelpChanges, question: &Question, errors: &mut Vec<FacetError>) {
    let effective_type = help
        .helper_type
        .as_ref()
        .map_or(question.helper_type.clone(), |change| change.to.clone());
    let is_weblink = effective_type
        .as_deref()
        .is_some_and(|kind| WEBLINK_HELPER_TYPES.contains(&kind.to_ascii_lowercase().as_str()));
    if !is_weblink {
        return;
    }

    // Only a value supplied by the diff itself is checked; an unchanged
    // stored value is the upload validator's problem.
    if let Some(change) = &help.helper_value
        && let Some(value) = &change.to
        && Url::parse(value).is_err()
    {
        errors.push(FacetError {
            facet: Facet::Help,
            message: format!("helper link '{}' is not a valid URL", value),
            code: Some("invalid_helper_url".into()),
        });
    }
}

/// The shape a suggestion submission travels in: the human summary and the
/// full structured diff, always emitted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SubmissionPayload {
    pub summary: String,
    pub changes: SuggestionDiff,
}

pub fn submission_payload(diff: &SuggestionDiff) -> SubmissionPayload {
    SubmissionPayload {
        summary: summarize(diff),
        changes: diff.clone(),
    }
}

/// Collapses the populated diff fields into one display string, one clause
/// per field, joined by "; ".
pub fn summarize(diff: &SuggestionDiff) -> String {
    let mut clauses = Vec::new();

    if let Some(settings) = &diff.settings
        && let Some(change) = &settings.required
    {
        clauses.push(format!("required: {} -> {}", change.from, change.to));
    }

    if let Some(content) = &diff.content {
        if let Some(change) = &content.question_text {
            clauses.push(format!(
                "question text: '{}' -> '{}'",
                change.from, change.to
            ));
        }
        if let Some(change) = &content.answer_type {
            clauses.push(format!(
                "answer type: {} -> {}",
                item_type_label(change.from),
                item_type_label(change.to)
            ));
        }
        if let Some(options) = &content.options {
            if !options.added.is_empty() {
                clauses.push(format!("{} option(s) added", options.added.len()));
            }
            if !options.modified.is_empty() {
                clauses.push(format!("{} option(s) modified", options.modified.len()));
            }
            if !options.removed.is_empty() {
                let indices: Vec<String> =
                    options.removed.iter().map(usize::to_string).collect();
                clauses.push(format!("option(s) removed: {}", indices.join(", ")));
            }
        }
    }

    if let Some(help) = &diff.help {
        if let Some(change) = &help.has_helper {
            clauses.push(if change.to {
                "helper enabled".to_string()
            } else {
                "helper disabled".to_string()
            });
        }
        if let Some(change) = &help.helper_type {
            clauses.push(format!(
                "helper type: {} -> {}",
                optional_label(&change.from),
                optional_label(&change.to)
            ));
        }
        if let Some(change) = &help.helper_name {
            clauses.push(format!(
                "helper name: {} -> {}",
                optional_label(&change.from),
                optional_label(&change.to)
            ));
        }
        if let Some(change) = &help.helper_value {
            clauses.push(format!(
                "helper value: {} -> {}",
                optional_label(&change.from),
                optional_label(&change.to)
            ));
        }
    }

    if let Some(logic) = &diff.logic
        && let Some(description) = &logic.description
    {
        clauses.push(format!("logic: {}", description));
    }

    if clauses.is_empty() {
        "no changes".to_string()
    } else {
        clauses.join("; ")
    }
}

fn item_type_label(kind: Option<ItemType>) -> &'static str {
    kind.map_or("-", ItemType::as_str)
}

fn optional_label(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}
