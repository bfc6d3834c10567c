use thiserror::Error;

use trustqa_spec::diff::{
    ContentPatch, FieldChange, HelpPatch, OptionModification, SettingsPatch, SuggestionDiff,
    add_option, apply_content, apply_help, apply_logic, apply_settings, modify_option,
    toggle_removed,
};
use trustqa_spec::spec::question::{ItemType, Question};
use trustqa_spec::submission::{
    Facet, SubmissionLimits, SubmissionPayload, SuggestionValidation, submission_payload,
    validate_suggestion,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no question selected")]
    NoSelection,
    #[error("pending changes on question '{question_id}' must be discarded or submitted first")]
    PendingChanges { question_id: String },
    #[error("question has no option at index {index}")]
    UnknownOption { index: usize },
    #[error("suggestion is not submittable ({} problem(s))", validation.errors.len())]
    NotSubmittable { validation: SuggestionValidation },
}

/// Framework-free edit-panel state machine.
///
/// At most one question is under edit at a time. Every field update computes
/// its `from` value from the selected question, so a reviewer reverting an
/// edit clears the pending change instead of recording a no-op. Switching
/// away while changes are pending requires the caller to confirm the
/// discard; nothing is dropped silently.
#[derive(Debug, Default)]
pub struct EditSession {
    selected: Option<Question>,
    diff: SuggestionDiff,
}

impl EditSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn selected_question(&self) -> Option<&Question> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn diff(&self) -> &SuggestionDiff {
        &self.diff
    }

    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        !self.diff.is_empty()
    }

    /// Selects a question for editing. Re-selecting the current question
    /// refreshes it and keeps the pending diff; switching to a different
    /// question with a non-empty diff fails unless `discard_pending` is set.
    pub fn select_question(
        &mut self,
        question: Question,
        discard_pending: bool,
    ) -> Result<(), SessionError> {
        if let Some(current) = &self.selected {
            if current.id == question.id {
                self.selected = Some(question);
                return Ok(());
            }
            if !self.diff.is_empty() && !discard_pending {
                return Err(SessionError::PendingChanges {
                    question_id: current.id.clone(),
                });
            }
        }
        tracing::debug!(question_id = %question.id, "selecting question for editing");
        self.selected = Some(question);
        self.diff = SuggestionDiff::default();
        Ok(())
    }

    pub fn set_required(&mut self, to: bool) -> Result<(), SessionError> {
        let question = self.require_selection()?;
        let patch = SettingsPatch {
            required: Some(FieldChange {
                from: question.required,
                to,
            }),
        };
        self.diff.settings = apply_settings(self.diff.settings.take(), patch);
        Ok(())
    }

    pub fn set_question_text(&mut self, to: &str) -> Result<(), SessionError> {
        let question = self.require_selection()?;
        let patch = ContentPatch {
            question_text: Some(FieldChange {
                from: question.question_text.clone(),
                to: to.to_string(),
            }),
            ..ContentPatch::default()
        };
        self.diff.content = apply_content(self.diff.content.take(), patch);
        Ok(())
    }

    pub fn set_answer_type(&mut self, to: ItemType) -> Result<(), SessionError> {
        let question = self.require_selection()?;
        let patch = ContentPatch {
            answer_type: Some(FieldChange {
                from: question.item_type,
                to: Some(to),
            }),
            ..ContentPatch::default()
        };
        self.diff.content = apply_content(self.diff.content.take(), patch);
        Ok(())
    }

    pub fn add_option(
        &mut self,
        text: &str,
        characteristic: Option<&str>,
        comment: Option<&str>,
    ) -> Result<(), SessionError> {
        self.require_selection()?;
        self.diff.content = add_option(self.diff.content.take(), text, characteristic, comment);
        Ok(())
    }

    /// Records an edit to the option at `index`, filling the `from` side
    /// from the selected question. Editing back to the original clears it.
    pub fn modify_option(
        &mut self,
        index: usize,
        to_text: &str,
        to_characteristic: Option<&str>,
        comment: Option<&str>,
    ) -> Result<(), SessionError> {
        let question = self.require_selection()?;
        let original = question
            .options
            .get(index)
            .ok_or(SessionError::UnknownOption { index })?;
        let modification = OptionModification {
            index,
            from: original.value.clone(),
            to: to_text.to_string(),
            from_characteristic: original.characteristic.clone(),
            to_characteristic: to_characteristic.map(str::to_string),
            comment: comment.map(str::to_string),
        };
        self.diff.content = modify_option(self.diff.content.take(), modification);
        Ok(())
    }

    pub fn toggle_remove_option(&mut self, index: usize) -> Result<(), SessionError> {
        let question = self.require_selection()?;
        if index >= question.options.len() {
            return Err(SessionError::UnknownOption { index });
        }
        self.diff.content = toggle_removed(self.diff.content.take(), index);
        Ok(())
    }

    pub fn set_has_helper(&mut self, to: bool) -> Result<(), SessionError> {
        let question = self.require_selection()?;
        let patch = HelpPatch {
            has_helper: Some(FieldChange {
                from: question.has_helper,
                to,
            }),
            ..HelpPatch::default()
        };
        self.diff.help = apply_help(self.diff.help.take(), patch);
        Ok(())
    }

    pub fn set_helper_type(&mut self, to: Option<&str>) -> Result<(), SessionError> {
        let question = self.require_selection()?;
        let patch = HelpPatch {
            helper_type: Some(FieldChange {
                from: question.helper_type.clone(),
                to: to.map(str::to_string),
            }),
            ..HelpPatch::default()
        };
        self.diff.help = apply_help(self.diff.help.take(), patch);
        Ok(())
    }

    pub fn set_helper_name(&mut self, to: Option<&str>) -> Result<(), SessionError> {
        let question = self.require_selection()?;
        let patch = HelpPatch {
            helper_name: Some(FieldChange {
                from: question.helper_name.clone(),
                to: to.map(str::to_string),
            }),
            ..HelpPatch::default()
        };
        self.diff.help = apply_help(self.diff.help.take(), patch);
        Ok(())
    }

    pub fn set_helper_value(&mut self, to: Option<&str>) -> Result<(), SessionError> {
        let question = self.require_selection()?;
        let patch = HelpPatch {
            helper_value: Some(FieldChange {
                from: question.helper_value.clone(),
                to: to.map(str::to_string),
            }),
            ..HelpPatch::default()
        };
        self.diff.help = apply_help(self.diff.help.take(), patch);
        Ok(())
    }

    pub fn set_logic_note(&mut self, note: Option<&str>) -> Result<(), SessionError> {
        self.require_selection()?;
        self.diff.logic = apply_logic(self.diff.logic.take(), note);
        Ok(())
    }

    /// Clears one facet outright.
    pub fn clear_facet(&mut self, facet: Facet) {
        match facet {
            Facet::Settings => self.diff.settings = None,
            Facet::Content => self.diff.content = None,
            Facet::Help => self.diff.help = None,
            Facet::Logic => self.diff.logic = None,
            Facet::Submission => {}
        }
    }

    pub fn validate(
        &self,
        submitter_name: &str,
        reason: &str,
        limits: &SubmissionLimits,
    ) -> Result<SuggestionValidation, SessionError> {
        let question = self.selected.as_ref().ok_or(SessionError::NoSelection)?;
        Ok(validate_suggestion(
            &self.diff,
            question,
            submitter_name,
            reason,
            limits,
        ))
    }

    /// Builds the submission payload after a passing validation.
    pub fn submission_payload(
        &self,
        submitter_name: &str,
        reason: &str,
        limits: &SubmissionLimits,
    ) -> Result<SubmissionPayload, SessionError> {
        let validation = self.validate(submitter_name, reason, limits)?;
        if !validation.valid {
            return Err(SessionError::NotSubmittable { validation });
        }
        let payload = submission_payload(&self.diff);
        tracing::debug!(summary = %payload.summary, "built submission payload");
        Ok(payload)
    }

    /// Discards the pending diff; call after an explicit discard or a
    /// successful submission.
    pub fn reset(&mut self) {
        self.diff = SuggestionDiff::default();
    }

    fn require_selection(&self) -> Result<&Question, SessionError> {
        self.selected.as_ref().ok_or(SessionError::NoSelection)
    }
}
