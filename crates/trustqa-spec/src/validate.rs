use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spec::question::{ItemType, Question};

pub const QUESTION_TEXT_MAX_LEN: usize = 1000;
pub const OPTION_VALUE_MAX_LEN: usize = 100;
pub const OPTION_COUNT_WARN_THRESHOLD: usize = 20;

/// Batch-size cap for one upload surface. The cap is configuration, not a
/// universal constant: master creation and instance copies use different
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UploadLimits {
    pub max_questions: usize,
}

impl UploadLimits {
    pub const MASTER: Self = Self { max_questions: 500 };
    pub const INSTANCE: Self = Self {
        max_questions: 2000,
    };
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self::MASTER
    }
}

/// Hard errors reject the whole batch, fail-fast on the first one found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("questionnaire name must not be empty")]
    EmptyName,
    #[error("questionnaire contains no questions")]
    EmptyBatch,
    #[error("questionnaire exceeds the {limit}-question limit ({count} supplied)")]
    TooManyQuestions { limit: usize, count: usize },
    #[error("question at position {index} has an empty id")]
    MissingId { index: usize },
    #[error("question '{question_id}' has an empty section")]
    MissingSection { question_id: String },
    #[error("question '{question_id}' has a missing or unsupported item type")]
    UnsupportedItemType { question_id: String },
    #[error("question '{question_id}' needs at least 2 options")]
    TooFewOptions { question_id: String },
    #[error("question '{question_id}' text exceeds {max} characters")]
    QuestionTextTooLong { question_id: String, max: usize },
}

/// Soft warning: collected across the whole batch, never blocking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BatchWarning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    pub message: String,
    pub code: String,
}

/// Validates an assembled question batch against one upload surface's
/// limits.
///
/// Check order: blank name, empty batch, size cap, then per question (in
/// batch order) id, section, item type, option count, text length. The
/// first hard error aborts; warnings accumulate across the entire batch and
/// are returned alongside success.
pub fn validate_batch(
    name: &str,
    questions: &[Question],
    limits: &UploadLimits,
) -> Result<Vec<BatchWarning>, BatchError> {
    if name.trim().is_empty() {
        return Err(BatchError::EmptyName);
    }
    if questions.is_empty() {
        return Err(BatchError::EmptyBatch);
    }
    if questions.len() > limits.max_questions {
        return Err(BatchError::TooManyQuestions {
            limit: limits.max_questions,
            count: questions.len(),
        });
    }

    for (index, question) in questions.iter().enumerate() {
        if question.id.trim().is_empty() {
            return Err(BatchError::MissingId { index });
        }
        if question.section.trim().is_empty() {
            return Err(BatchError::MissingSection {
                question_id: question.id.clone(),
            });
        }
        let Some(item_type) = question.item_type else {
            return Err(BatchError::UnsupportedItemType {
                question_id: question.id.clone(),
            });
        };
        if item_type.requires_options() && question.options.len() < 2 {
            return Err(BatchError::TooFewOptions {
                question_id: question.id.clone(),
            });
        }
        if question.question_text.chars().count() > QUESTION_TEXT_MAX_LEN {
            return Err(BatchError::QuestionTextTooLong {
                question_id: question.id.clone(),
                max: QUESTION_TEXT_MAX_LEN,
            });
        }
    }

    Ok(collect_warnings(questions))
}

fn collect_warnings(questions: &[Question]) -> Vec<BatchWarning> {
    let mut warnings = Vec::new();

    for question in questions {
        if question
            .item_type
            .is_some_and(ItemType::forbids_options)
            && !question.options.is_empty()
        {
            warnings.push(BatchWarning {
                question_id: Some(question.id.clone()),
                message: format!(
                    "question '{}' has options but its item type does not use them",
                    question.id
                ),
                code: "unexpected_options".into(),
            });
        }
        if question.has_helper
            && (question.helper_type.is_none() || question.helper_value.is_none())
        {
            warnings.push(BatchWarning {
                question_id: Some(question.id.clone()),
                message: format!(
                    "question '{}' enables a helper without a helper type or value",
                    question.id
                ),
                code: "incomplete_helper".into(),
            });
        }
        if question.options.len() > OPTION_COUNT_WARN_THRESHOLD {
            warnings.push(BatchWarning {
                question_id: Some(question.id.clone()),
                message: format!(
                    "question '{}' has more than {} options",
                    question.id, OPTION_COUNT_WARN_THRESHOLD
                ),
                code: "too_many_options".into(),
            });
        }
        for option in &question.options {
            if option.value.chars().count() > OPTION_VALUE_MAX_LEN {
                warnings.push(BatchWarning {
                    question_id: Some(question.id.clone()),
                    message: format!(
                        "option '{}…' on question '{}' exceeds {} characters",
                        option.value.chars().take(20).collect::<String>(),
                        question.id,
                        OPTION_VALUE_MAX_LEN
                    ),
                    code: "option_value_too_long".into(),
                });
            }
        }
    }

    let mut section_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for question in questions {
        *section_counts.entry(question.section.as_str()).or_default() += 1;
    }
    for (section, count) in section_counts {
        if count == 1 {
            warnings.push(BatchWarning {
                question_id: None,
                message: format!("section '{}' has only 1 question", section),
                code: "lonely_section".into(),
            });
        }
    }

    warnings
}
