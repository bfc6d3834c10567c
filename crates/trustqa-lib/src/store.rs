use std::collections::BTreeMap;

use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use trustqa_spec::diff::SuggestionDiff;
use trustqa_spec::spec::question::Question;
use trustqa_spec::spec::suggestion::{Comment, Suggestion, SuggestionStatus};
use trustqa_spec::validate::{BatchError, UploadLimits, validate_batch};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("questionnaire '{0}' not found")]
    QuestionnaireNotFound(String),
    #[error("suggestion '{0}' not found")]
    SuggestionNotFound(String),
    #[error("question batch rejected: {0}")]
    RejectedBatch(#[from] BatchError),
}

/// Scope filter for suggestion listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    All,
    Question(String),
    Status(SuggestionStatus),
}

/// Input for a new suggestion record; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSuggestion {
    pub question_ref: String,
    pub submitter_name: String,
    pub submitter_email: Option<String>,
    pub suggestion_text: String,
    pub reason: String,
    pub component_changes: Option<SuggestionDiff>,
}

/// The persistence collaborator, as the core consumes it. Implementations
/// are plain CRUD; multi-step workflows and their rollback live in helpers
/// like [`provision_instance`].
pub trait ReviewStore {
    fn create_questionnaire(
        &mut self,
        name: &str,
        questions: Vec<Question>,
    ) -> Result<String, StoreError>;
    /// Creates an empty trust-specific copy shell; questions arrive via
    /// [`ReviewStore::copy_questions`].
    fn create_instance(&mut self, master_id: &str, trust_name: &str)
    -> Result<String, StoreError>;
    fn copy_questions(
        &mut self,
        questionnaire_id: &str,
        questions: &[Question],
    ) -> Result<(), StoreError>;
    fn questionnaire_questions(&self, questionnaire_id: &str)
    -> Result<Vec<Question>, StoreError>;
    fn delete_questionnaire(&mut self, questionnaire_id: &str) -> Result<(), StoreError>;

    fn create_suggestion(&mut self, suggestion: NewSuggestion) -> Result<String, StoreError>;
    fn update_suggestion_status(
        &mut self,
        suggestion_id: &str,
        status: SuggestionStatus,
        response_message: Option<&str>,
    ) -> Result<(), StoreError>;
    fn list_suggestions(&self, scope: &ListScope) -> Result<Vec<Suggestion>, StoreError>;

    fn add_comment(
        &mut self,
        suggestion_id: &str,
        author: &str,
        message: &str,
    ) -> Result<(), StoreError>;
    fn comments(&self, suggestion_id: &str) -> Result<Vec<Comment>, StoreError>;
}

/// Creates a trust instance of a master questionnaire with the
/// at-most-one-partial-write guarantee: when validating or copying the
/// questions fails after the instance shell exists, the shell is deleted
/// before the error propagates.
pub fn provision_instance<S: ReviewStore>(
    store: &mut S,
    master_id: &str,
    trust_name: &str,
    limits: &UploadLimits,
) -> Result<String, StoreError> {
    let questions = store.questionnaire_questions(master_id)?;
    let instance_id = store.create_instance(master_id, trust_name)?;

    let copied = validate_batch(trust_name, &questions, limits)
        .map_err(StoreError::from)
        .and_then(|_warnings| store.copy_questions(&instance_id, &questions));

    if let Err(error) = copied {
        tracing::warn!(%instance_id, %error, "rolling back instance after failed question copy");
        store.delete_questionnaire(&instance_id)?;
        return Err(error);
    }
    Ok(instance_id)
}

#[derive(Debug, Clone)]
struct StoredQuestionnaire {
    name: String,
    master_ref: Option<String>,
    questions: Vec<Question>,
}

/// In-memory store used by tests and local tooling.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    questionnaires: BTreeMap<String, StoredQuestionnaire>,
    suggestions: BTreeMap<String, Suggestion>,
    comments: BTreeMap<String, Vec<Comment>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn questionnaire_count(&self) -> usize {
        self.questionnaires.len()
    }

    fn suggestion_mut(&mut self, id: &str) -> Result<&mut Suggestion, StoreError> {
        self.suggestions
            .get_mut(id)
            .ok_or_else(|| StoreError::SuggestionNotFound(id.to_string()))
    }
}

impl ReviewStore for InMemoryStore {
    fn create_questionnaire(
        &mut self,
        name: &str,
        questions: Vec<Question>,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.questionnaires.insert(
            id.clone(),
            StoredQuestionnaire {
                name: name.to_string(),
                master_ref: None,
                questions,
            },
        );
        Ok(id)
    }

    fn create_instance(
        &mut self,
        master_id: &str,
        trust_name: &str,
    ) -> Result<String, StoreError> {
        if !self.questionnaires.contains_key(master_id) {
            return Err(StoreError::QuestionnaireNotFound(master_id.to_string()));
        }
        let id = Uuid::new_v4().to_string();
        self.questionnaires.insert(
            id.clone(),
            StoredQuestionnaire {
                name: trust_name.to_string(),
                master_ref: Some(master_id.to_string()),
                questions: Vec::new(),
            },
        );
        Ok(id)
    }

    fn copy_questions(
        &mut self,
        questionnaire_id: &str,
        questions: &[Question],
    ) -> Result<(), StoreError> {
        let stored = self
            .questionnaires
            .get_mut(questionnaire_id)
            .ok_or_else(|| StoreError::QuestionnaireNotFound(questionnaire_id.to_string()))?;
        stored.questions = questions.to_vec();
        Ok(())
    }

    fn questionnaire_questions(
        &self,
        questionnaire_id: &str,
    ) -> Result<Vec<Question>, StoreError> {
        self.questionnaires
            .get(questionnaire_id)
            .map(|stored| stored.questions.clone())
            .ok_or_else(|| StoreError::QuestionnaireNotFound(questionnaire_id.to_string()))
    }

    fn delete_questionnaire(&mut self, questionnaire_id: &str) -> Result<(), StoreError> {
        self.questionnaires
            .remove(questionnaire_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::QuestionnaireNotFound(questionnaire_id.to_string()))
    }

    fn create_suggestion(&mut self, suggestion: NewSuggestion) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let now = now_rfc3339();
        self.suggestions.insert(
            id.clone(),
            Suggestion {
                id: id.clone(),
                question_ref: suggestion.question_ref,
                submitter_name: suggestion.submitter_name,
                submitter_email: suggestion.submitter_email,
                suggestion_text: suggestion.suggestion_text,
                reason: suggestion.reason,
                status: SuggestionStatus::Pending,
                internal_comment: None,
                response_message: None,
                component_changes: suggestion.component_changes,
                created_at: now.clone(),
                updated_at: now,
            },
        );
        Ok(id)
    }

    fn update_suggestion_status(
        &mut self,
        suggestion_id: &str,
        status: SuggestionStatus,
        response_message: Option<&str>,
    ) -> Result<(), StoreError> {
        let suggestion = self.suggestion_mut(suggestion_id)?;
        suggestion.status = status;
        if let Some(message) = response_message {
            suggestion.response_message = Some(message.to_string());
        }
        suggestion.updated_at = now_rfc3339();
        Ok(())
    }

    fn list_suggestions(&self, scope: &ListScope) -> Result<Vec<Suggestion>, StoreError> {
        let matches = |suggestion: &Suggestion| match scope {
            ListScope::All => true,
            ListScope::Question(question_ref) => &suggestion.question_ref == question_ref,
            ListScope::Status(status) => suggestion.status == *status,
        };
        Ok(self
            .suggestions
            .values()
            .filter(|suggestion| matches(suggestion))
            .cloned()
            .collect())
    }

    fn add_comment(
        &mut self,
        suggestion_id: &str,
        author: &str,
        message: &str,
    ) -> Result<(), StoreError> {
        if !self.suggestions.contains_key(suggestion_id) {
            return Err(StoreError::SuggestionNotFound(suggestion_id.to_string()));
        }
        self.comments
            .entry(suggestion_id.to_string())
            .or_default()
            .push(Comment {
                suggestion_id: suggestion_id.to_string(),
                author: author.to_string(),
                message: message.to_string(),
                created_at: now_rfc3339(),
            });
        Ok(())
    }

    fn comments(&self, suggestion_id: &str) -> Result<Vec<Comment>, StoreError> {
        if !self.suggestions.contains_key(suggestion_id) {
            return Err(StoreError::SuggestionNotFound(suggestion_id.to_string()));
        }
        Ok(self
            .comments
            .get(suggestion_id)
            .cloned()
            .unwrap_or_default())
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

/// Instances keep a back-reference to their master; expose it, and the
/// stored name, for listings.
impl InMemoryStore {
    #[must_use]
    pub fn master_of(&self, questionnaire_id: &str) -> Option<&str> {
        self.questionnaires
            .get(questionnaire_id)
            .and_then(|stored| stored.master_ref.as_deref())
    }

    #[must_use]
    pub fn questionnaire_name(&self, questionnaire_id: &str) -> Option<&str> {
        self.questionnaires
            .get(questionnaire_id)
            .map(|stored| stored.name.as_str())
    }
}
