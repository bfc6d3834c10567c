use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static CONDITION_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^()]*)\)").expect("condition group pattern"));

/// Comparison operator inside one condition group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Comparator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">=")]
    Gte,
}

impl Comparator {
    #[must_use]
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Lte => "<=",
            Self::Gte => ">=",
        }
    }
}

/// Logical connective joining the condition list. Flat, no nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Connective {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl Connective {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// One `(characteristic operator value)` comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Condition {
    pub characteristic: String,
    pub comparator: Comparator,
    pub value: String,
}

/// Parsed conditional-visibility expression. `logic` is `None` for a single
/// condition, and stays `None` when no connective token was found between
/// groups (evaluation then treats the list conjunctively).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EnableWhenExpression {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<Connective>,
    pub conditions: Vec<Condition>,
}

/// Parses a raw `EnableWhen` string into a structured expression.
///
/// Returns `None` for blank input or when no condition group parses. Groups
/// that cannot be split at an operator are skipped rather than failing, so
/// partially authored expressions still yield whatever structure they have.
/// Connectives are recognised only in the gap text between groups; spaced
/// and concatenated forms (`) AND (`, `)AND(`) are both accepted.
pub fn parse_enable_when(raw: &str) -> Option<EnableWhenExpression> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut conditions = Vec::new();
    let mut logic = None;
    let mut prev_end: Option<usize> = None;

    for group in CONDITION_GROUP.find_iter(trimmed) {
        if let Some(end) = prev_end
            && logic.is_none()
        {
            logic = parse_connective(&trimmed[end..group.start()]);
        }
        prev_end = Some(group.end());

        let inner = &trimmed[group.start() + 1..group.end() - 1];
        if let Some(condition) = parse_condition(inner) {
            conditions.push(condition);
        }
    }

    if conditions.is_empty() {
        return None;
    }
    Some(EnableWhenExpression { logic, conditions })
}

fn parse_connective(gap: &str) -> Option<Connective> {
    let token = gap.trim();
    if token.eq_ignore_ascii_case("AND") {
        Some(Connective::And)
    } else if token.eq_ignore_ascii_case("OR") {
        Some(Connective::Or)
    } else {
        None
    }
}

fn parse_condition(inner: &str) -> Option<Condition> {
    for (idx, _) in inner.char_indices() {
        let rest = &inner[idx..];
        // Longest match first so `<=`/`>=` win over `<`/`>`.
        let comparator = if rest.starts_with("<=") {
            Some((Comparator::Lte, 2))
        } else if rest.starts_with(">=") {
            Some((Comparator::Gte, 2))
        } else if rest.starts_with('=') {
            Some((Comparator::Eq, 1))
        } else if rest.starts_with('<') {
            Some((Comparator::Lt, 1))
        } else if rest.starts_with('>') {
            Some((Comparator::Gt, 1))
        } else {
            None
        };

        if let Some((comparator, width)) = comparator {
            let characteristic = inner[..idx].trim();
            if characteristic.is_empty() {
                return None;
            }
            return Some(Condition {
                characteristic: characteristic.to_string(),
                comparator,
                value: inner[idx + width..].trim().to_string(),
            });
        }
    }
    None
}

impl EnableWhenExpression {
    /// Evaluates the expression against a characteristic-fact context.
    ///
    /// Returns `None` when the outcome cannot be decided (a referenced
    /// characteristic is absent, or operands do not compare); callers pick a
    /// fallback via [`crate::visibility::VisibilityMode`].
    pub fn evaluate(&self, facts: &Value) -> Option<bool> {
        match self.logic {
            Some(Connective::Or) => {
                let mut seen_none = false;
                for condition in &self.conditions {
                    match condition.evaluate(facts) {
                        Some(true) => return Some(true),
                        Some(false) => continue,
                        None => seen_none = true,
                    }
                }
                if seen_none { None } else { Some(false) }
            }
            // AND, and connective-less multi-condition lists, are conjunctive.
            _ => {
                let mut seen_none = false;
                for condition in &self.conditions {
                    match condition.evaluate(facts) {
                        Some(false) => return Some(false),
                        Some(true) => continue,
                        None => seen_none = true,
                    }
                }
                if seen_none { None } else { Some(true) }
            }
        }
    }
}

impl Condition {
    /// Evaluates one comparison against the fact context. `None` when the
    /// characteristic is not present or the operands are incomparable.
    pub fn evaluate(&self, facts: &Value) -> Option<bool> {
        let actual = facts.get(&self.characteristic)?;
        match self.comparator {
            Comparator::Eq => Some(value_equals(actual, &self.value)),
            Comparator::Lt => compare_values(actual, &self.value).map(Ordering::is_lt),
            Comparator::Lte => compare_values(actual, &self.value).map(Ordering::is_le),
            Comparator::Gt => compare_values(actual, &self.value).map(Ordering::is_gt),
            Comparator::Gte => compare_values(actual, &self.value).map(Ordering::is_ge),
        }
    }
}

fn value_equals(actual: &Value, expected: &str) -> bool {
    match actual {
        Value::Bool(flag) => coerce_bool(expected) == Some(*flag),
        Value::Number(number) => expected
            .parse::<f64>()
            .ok()
            .zip(number.as_f64())
            .is_some_and(|(lhs, rhs)| lhs == rhs),
        Value::String(text) => text == expected,
        Value::Null => coerce_bool(expected) == Some(false),
        _ => false,
    }
}

fn compare_values(actual: &Value, expected: &str) -> Option<Ordering> {
    match actual {
        Value::Number(number) => {
            let lhs = number.as_f64()?;
            let rhs = expected.parse::<f64>().ok()?;
            lhs.partial_cmp(&rhs)
        }
        Value::String(text) => {
            if let (Ok(lhs), Ok(rhs)) = (text.parse::<f64>(), expected.parse::<f64>()) {
                lhs.partial_cmp(&rhs)
            } else {
                Some(text.as_str().cmp(expected))
            }
        }
        _ => None,
    }
}

fn coerce_bool(text: &str) -> Option<bool> {
    match text.to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
