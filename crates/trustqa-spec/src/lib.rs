#![allow(missing_docs)]

pub mod characteristics;
pub mod diff;
pub mod enable_when;
pub mod rows;
pub mod spec;
pub mod submission;
pub mod translate;
pub mod validate;
pub mod visibility;

pub use characteristics::{CharacteristicMap, CharacteristicRef, build_characteristic_map};
pub use diff::{
    ContentChanges, ContentPatch, FieldChange, HelpChanges, HelpPatch, LogicChanges,
    OptionAddition, OptionChanges, OptionModification, SettingsChanges, SettingsPatch,
    SuggestionDiff, add_option, apply_content, apply_help, apply_logic, apply_settings,
    derive_characteristic_token, modify_option, toggle_removed,
};
pub use enable_when::{
    Comparator, Condition, Connective, EnableWhenExpression, parse_enable_when,
};
pub use rows::{RawRow, assemble_questions};
pub use spec::{
    Comment, ItemType, Question, QuestionOption, Suggestion, SuggestionStatus,
};
pub use submission::{
    Facet, FacetError, SubmissionLimits, SubmissionPayload, SuggestionValidation,
    submission_payload, summarize, validate_suggestion,
};
pub use translate::{TranslatedCondition, TranslatedEnableWhen, translate_enable_when};
pub use validate::{BatchError, BatchWarning, UploadLimits, validate_batch};
pub use visibility::{
    VisibilityMap, VisibilityMode, build_fact_context, resolve_visibility,
};
