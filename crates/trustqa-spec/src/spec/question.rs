use crate::enable_when::EnableWhenExpression;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Answer-widget kinds a question can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ItemType {
    Radio,
    Checkbox,
    TextField,
    TextArea,
    PhoneNumber,
    Age,
    NumberInput,
    AllergyList,
    TextParagraph,
}

impl ItemType {
    /// Parses a raw CSV token. Tokens are matched lower-cased; hyphen and
    /// underscore spellings are both accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "radio" => Some(Self::Radio),
            "checkbox" => Some(Self::Checkbox),
            "text-field" => Some(Self::TextField),
            "text-area" => Some(Self::TextArea),
            "phone-number" => Some(Self::PhoneNumber),
            "age" => Some(Self::Age),
            "number-input" => Some(Self::NumberInput),
            "allergy-list" => Some(Self::AllergyList),
            "text-paragraph" => Some(Self::TextParagraph),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::TextField => "text-field",
            Self::TextArea => "text-area",
            Self::PhoneNumber => "phone-number",
            Self::Age => "age",
            Self::NumberInput => "number-input",
            Self::AllergyList => "allergy-list",
            Self::TextParagraph => "text-paragraph",
        }
    }

    /// Choice widgets must carry at least two options.
    #[must_use]
    pub const fn requires_options(self) -> bool {
        matches!(self, Self::Radio | Self::Checkbox)
    }

    /// Non-choice widgets are expected to carry no options at all.
    #[must_use]
    pub const fn forbids_options(self) -> bool {
        !self.requires_options()
    }
}

/// A single selectable answer option, optionally naming the characteristic
/// that picking it establishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionOption {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characteristic: Option<String>,
}

/// A logical question assembled from one or more raw upload rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Question {
    pub id: String,
    pub section: String,
    pub page: String,
    /// `None` when the upload named a widget kind outside the supported set;
    /// batch validation reports it, assembly never fails on it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemType>,
    pub question_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,
    /// Single characteristic for non-option questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characteristic: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_when: Option<EnableWhenExpression>,
    #[serde(default)]
    pub has_helper: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_value: Option<String>,
}

impl Question {
    /// True when the resolved widget kind expects an option list.
    #[must_use]
    pub fn expects_options(&self) -> bool {
        self.item_type.is_some_and(ItemType::requires_options)
    }
}
