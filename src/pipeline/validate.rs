//! Expected-value validation.
//!
//! Each expectation is a `{token: expected}` pair. The token resolves
//! against fields first (exact id, then decoded label equality, then label
//! prefix), then against text fragments. String expecteds compare trimmed
//! and decoded; structured expecteds use recursive subset equality against
//! the match's serialized form, so extra keys on the actual value are
//! ignored while missing ones fail.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{FieldFragment, TextFragment};
use crate::pipeline::normalize::field_value_string;
use crate::text::unescape;

/// A single `{token: expected}` assertion against the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Expectation {
    /// Field id, label text, literal text value, or `"TextBlock"`.
    pub token: String,
    /// Expected value; `null` or an empty string makes this a lookup-only
    /// assertion (presence is checked, the value is not compared).
    pub expected: Value,
}

impl Expectation {
    /// Create an expectation from a token and expected value.
    pub fn new(token: impl Into<String>, expected: Value) -> Self {
        Self {
            token: token.into(),
            expected,
        }
    }

    /// Build an expectation from a caller-supplied one-entry map such as
    /// `{"Family_Name_Text_Box": "Solomon"}`. Empty maps yield `None`.
    pub fn from_map(map: &serde_json::Map<String, Value>) -> Option<Self> {
        let (token, expected) = map.iter().next()?;
        Some(Self::new(token.clone(), expected.clone()))
    }
}

/// One resolved match: either a field or a text fragment.
#[derive(Clone, Copy)]
enum Match<'a> {
    Field(&'a FieldFragment),
    Text(&'a TextFragment),
}

impl Match<'_> {
    /// The match's display value for string comparison.
    fn value_string(&self) -> String {
        match self {
            Match::Field(f) => field_value_string(&f.value),
            Match::Text(t) => t.value.clone(),
        }
    }

    /// The match serialized for structural comparison and diagnostics.
    fn to_json(&self) -> Value {
        match self {
            Match::Field(f) => serde_json::to_value(f).unwrap_or(Value::Null),
            Match::Text(t) => serde_json::to_value(t).unwrap_or(Value::Null),
        }
    }
}

/// Validate one expectation against the run's fields and texts.
///
/// Returns `Ok(())` on match; fails with a not-found error when the token
/// resolves to nothing, or a validation error when the value differs.
pub fn validate(
    token: &str,
    expected: &Value,
    fields: &[&FieldFragment],
    texts: &[&TextFragment],
) -> Result<()> {
    let expected_str = expected.as_str().map(unescape);

    let mut matches: Vec<Match<'_>> = fields
        .iter()
        .copied()
        .filter(|field| field_matches(field, token))
        .map(Match::Field)
        .collect();

    if matches.is_empty() {
        matches = texts
            .iter()
            .copied()
            .filter(|text| text_matches(text, token, expected_str.as_deref()))
            .map(Match::Text)
            .collect();
    }

    if matches.is_empty() {
        if token == "TextBlock" {
            return Err(Error::TextBlockNotFound {
                expected: expected_str.unwrap_or_else(|| expected.to_string()),
            });
        }
        return Err(Error::FieldNotFound {
            token: token.to_string(),
        });
    }

    // Multiple matches: narrow to exact value matches when any exist,
    // otherwise keep all and use the first (permissive, not an error).
    if matches.len() >= 2 {
        log::warn!("token [{}] matched {} fragments", token, matches.len());
        if let Some(expected_str) = &expected_str {
            let exact: Vec<Match<'_>> = matches
                .iter()
                .copied()
                .filter(|m| &m.value_string() == expected_str)
                .collect();
            if !exact.is_empty() {
                matches = exact;
            }
        }
    }

    let actual = &matches[0];

    // Null or empty expected: lookup-only assertion.
    if expected.is_null() || expected.as_str() == Some("") {
        return Ok(());
    }

    match expected {
        Value::String(expected_raw) => {
            let want = unescape(expected_raw);
            let got = unescape(&actual.value_string());
            if want.trim() != got.trim() {
                return Err(Error::Validation {
                    token: token.to_string(),
                    expected: want,
                    actual: got,
                });
            }
        }
        _ => {
            let actual_json = actual.to_json();
            if !subset_eq(expected, &actual_json) {
                return Err(Error::Validation {
                    token: token.to_string(),
                    expected: expected.to_string(),
                    actual: actual_json.to_string(),
                });
            }
        }
    }

    Ok(())
}

fn field_matches(field: &FieldFragment, token: &str) -> bool {
    if field.id == token {
        return true;
    }
    if let Some(label) = &field.label {
        let label_value = unescape(&label.value);
        let token_value = unescape(token);
        return label_value == token_value || label_value.starts_with(&token_value);
    }
    false
}

fn text_matches(text: &TextFragment, token: &str, expected_str: Option<&str>) -> bool {
    if token == "TextBlock" {
        // TextBlock tokens match the text value against the expected value
        let Some(expected) = expected_str else {
            return false;
        };
        let value = unescape(&text.value);
        value == expected || value.starts_with(expected)
    } else {
        let value = unescape(&text.value);
        let token_value = unescape(token);
        value == token_value || value.starts_with(&token_value)
    }
}

/// Recursive subset equality: every key present on `expected` must exist
/// and match on `actual`; extra keys on `actual` are ignored.
fn subset_eq(expected: &Value, actual: &Value) -> bool {
    if expected == actual {
        return true;
    }
    match (expected, actual) {
        (Value::Object(e), Value::Object(a)) => e
            .iter()
            .all(|(key, value)| a.get(key).is_some_and(|av| subset_eq(value, av))),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subset_eq_extra_actual_keys_ignored() {
        let expected = json!({"w": 9.375});
        let actual = json!({"w": 9.375, "h": 0.887});
        assert!(subset_eq(&expected, &actual));
    }

    #[test]
    fn test_subset_eq_missing_key_fails() {
        let expected = json!({"w": 9.375, "missingProp": 1});
        let actual = json!({"w": 9.375, "h": 0.887});
        assert!(!subset_eq(&expected, &actual));
    }

    #[test]
    fn test_subset_eq_nested() {
        let expected = json!({"a": {"b": 1}});
        let actual = json!({"a": {"b": 1, "c": 2}, "d": 3});
        assert!(subset_eq(&expected, &actual));

        let wrong = json!({"a": {"b": 2}});
        assert!(!subset_eq(&wrong, &actual));
    }

    #[test]
    fn test_subset_eq_scalar_mismatch() {
        assert!(!subset_eq(&json!(1), &json!({"a": 1})));
        assert!(subset_eq(&json!("x"), &json!("x")));
    }

    #[test]
    fn test_expectation_from_map() {
        let map = json!({"Family_Name_Text_Box": "Solomon"});
        let expectation = Expectation::from_map(map.as_object().unwrap()).unwrap();
        assert_eq!(expectation.token, "Family_Name_Text_Box");
        assert_eq!(expectation.expected, json!("Solomon"));

        let empty = serde_json::Map::new();
        assert!(Expectation::from_map(&empty).is_none());
    }
}
