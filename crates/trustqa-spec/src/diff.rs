use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::ItemType;

pub const AUTO_CHARACTERISTIC_MAX_LEN: usize = 30;

/// A changed field stored with its original value, so diffs render and roll
/// back without consulting the source question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldChange<T> {
    pub from: T,
    pub to: T,
}

impl<T: PartialEq> FieldChange<T> {
    /// A change back to the original value must clear the field rather than
    /// persist as `{from: x, to: x}`, or "has changes" indicators lie.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Settings facet: per-question toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SettingsChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<FieldChange<bool>>,
}

impl SettingsChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.required.is_none()
    }
}

/// Partial patch for the settings facet. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub required: Option<FieldChange<bool>>,
}

/// Shallow-merges a patch onto the settings facet. No-op changes clear their
/// field; a facet with no remaining fields collapses to `None`.
pub fn apply_settings(
    current: Option<SettingsChanges>,
    patch: SettingsPatch,
) -> Option<SettingsChanges> {
    let mut next = current.unwrap_or_default();
    if let Some(change) = patch.required {
        next.required = if change.is_noop() { None } else { Some(change) };
    }
    if next.is_empty() { None } else { Some(next) }
}

/// A proposed new option. `characteristic` is auto-derived from the text
/// when the reviewer supplies none; collisions are deliberately unchecked
/// and left to the reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OptionAddition {
    pub text: String,
    pub characteristic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A proposed edit to an existing option, referenced by original index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OptionModification {
    pub index: usize,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_characteristic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_characteristic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl OptionModification {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.from == self.to && self.from_characteristic == self.to_characteristic
    }
}

/// Option edits: appended additions, index-referenced modifications, and a
/// toggle-able set of removed original indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OptionChanges {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<OptionAddition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modified: Vec<OptionModification>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub removed: BTreeSet<usize>,
}

impl OptionChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }
}

/// Content facet: question text, answer type, and option edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ContentChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_text: Option<FieldChange<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_type: Option<FieldChange<Option<ItemType>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionChanges>,
}

impl ContentChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.question_text.is_none() && self.answer_type.is_none() && self.options.is_none()
    }
}

/// Partial patch for the content facet's scalar fields. Option edits go
/// through [`add_option`], [`modify_option`], and [`toggle_removed`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPatch {
    pub question_text: Option<FieldChange<String>>,
    pub answer_type: Option<FieldChange<Option<ItemType>>>,
}

pub fn apply_content(
    current: Option<ContentChanges>,
    patch: ContentPatch,
) -> Option<ContentChanges> {
    let mut next = current.unwrap_or_default();
    if let Some(change) = patch.question_text {
        next.question_text = if change.is_noop() { None } else { Some(change) };
    }
    if let Some(change) = patch.answer_type {
        next.answer_type = if change.is_noop() { None } else { Some(change) };
    }
    collapse_content(next)
}

/// Appends a proposed option, deriving a characteristic token from the text
/// when none is supplied.
pub fn add_option(
    current: Option<ContentChanges>,
    text: &str,
    characteristic: Option<&str>,
    comment: Option<&str>,
) -> Option<ContentChanges> {
    let mut next = current.unwrap_or_default();
    let options = next.options.get_or_insert_with(OptionChanges::default);
    let token = match characteristic {
        Some(token) if !token.trim().is_empty() => token.trim().to_string(),
        _ => derive_characteristic_token(text),
    };
    options.added.push(OptionAddition {
        text: text.to_string(),
        characteristic: token,
        comment: comment.map(str::to_string),
    });
    collapse_content(next)
}

/// Records an edit to an existing option, replacing any earlier edit of the
/// same index. A modification back to the original drops the entry.
pub fn modify_option(
    current: Option<ContentChanges>,
    modification: OptionModification,
) -> Option<ContentChanges> {
    let mut next = current.unwrap_or_default();
    let options = next.options.get_or_insert_with(OptionChanges::default);
    options.modified.retain(|entry| entry.index != modification.index);
    if !modification.is_noop() {
        options.modified.push(modification);
    }
    collapse_content(next)
}

/// Toggles removal of the option at an original index: removing an already
/// removed index acts as "undo removal".
pub fn toggle_removed(current: Option<ContentChanges>, index: usize) -> Option<ContentChanges> {
    let mut next = current.unwrap_or_default();
    let options = next.options.get_or_insert_with(OptionChanges::default);
    if !options.removed.remove(&index) {
        options.removed.insert(index);
    }
    collapse_content(next)
}

fn collapse_content(mut changes: ContentChanges) -> Option<ContentChanges> {
    if changes.options.as_ref().is_some_and(OptionChanges::is_empty) {
        changes.options = None;
    }
    if changes.is_empty() { None } else { Some(changes) }
}

/// Lower-cases the option text and replaces every non-alphanumeric character
/// with `_`, capped at [`AUTO_CHARACTERISTIC_MAX_LEN`] characters.
#[must_use]
pub fn derive_characteristic_token(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { '_' })
        .take(AUTO_CHARACTERISTIC_MAX_LEN)
        .collect()
}

/// Help facet: helper toggle and its type/name/value fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HelpChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_helper: Option<FieldChange<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_type: Option<FieldChange<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_name: Option<FieldChange<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_value: Option<FieldChange<Option<String>>>,
}

impl HelpChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.has_helper.is_none()
            && self.helper_type.is_none()
            && self.helper_name.is_none()
            && self.helper_value.is_none()
    }
}

/// Partial patch for the help facet. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpPatch {
    pub has_helper: Option<FieldChange<bool>>,
    pub helper_type: Option<FieldChange<Option<String>>>,
    pub helper_name: Option<FieldChange<Option<String>>>,
    pub helper_value: Option<FieldChange<Option<String>>>,
}

pub fn apply_help(current: Option<HelpChanges>, patch: HelpPatch) -> Option<HelpChanges> {
    let mut next = current.unwrap_or_default();
    if let Some(change) = patch.has_helper {
        next.has_helper = if change.is_noop() { None } else { Some(change) };
    }
    if let Some(change) = patch.helper_type {
        next.helper_type = if change.is_noop() { None } else { Some(change) };
    }
    if let Some(change) = patch.helper_name {
        next.helper_name = if change.is_noop() { None } else { Some(change) };
    }
    if let Some(change) = patch.helper_value {
        next.helper_value = if change.is_noop() { None } else { Some(change) };
    }
    if next.is_empty() { None } else { Some(next) }
}

/// Logic facet: a free-text description of the proposed visibility change.
/// No structured logic editing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LogicChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LogicChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.description.as_deref().is_none_or(|text| text.trim().is_empty())
    }
}

/// Replaces the logic note. A blank note clears the facet.
pub fn apply_logic(
    _current: Option<LogicChanges>,
    description: Option<&str>,
) -> Option<LogicChanges> {
    let next = LogicChanges {
        description: description
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string),
    };
    if next.is_empty() { None } else { Some(next) }
}

/// A proposed edit to one question, partitioned into four optional facets.
/// A facet is `None` when untouched, never an empty object; that is the
/// invariant "does this tab have pending changes" reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SuggestionDiff {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SettingsChanges>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentChanges>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<HelpChanges>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<LogicChanges>,
}

impl SuggestionDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_none()
            && self.content.is_none()
            && self.help.is_none()
            && self.logic.is_none()
    }
}
