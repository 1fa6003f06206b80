//! Normalized fragment types.
//!
//! Normalization derives bounding-box edges (`top=y`, `left=x`,
//! `bottom=y+h`, `right=x+w`) and a decoded display value from each raw
//! fragment. Serialized keys keep the decoder-era casing (`Page`, `Value`,
//! `Top`, plus the raw lowercase geometry) so structured expected values can
//! address both derived and raw coordinates.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::raw::{RawField, RawText};
use crate::text::unescape;

/// A normalized text fragment with derived geometry and decoded value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// Page index (0-based, matching the decoder tree).
    #[serde(rename = "Page")]
    pub page: u32,

    /// Reconstructed line number (1-based, shared across the whole run).
    #[serde(rename = "LineNumber")]
    pub line_number: u32,

    /// Decoded display value of the first run.
    #[serde(rename = "Value")]
    pub value: String,

    /// Top edge (`y`).
    #[serde(rename = "Top")]
    pub top: f64,
    /// Left edge (`x`).
    #[serde(rename = "Left")]
    pub left: f64,
    /// Bottom edge (`y + h`).
    #[serde(rename = "Bottom")]
    pub bottom: f64,
    /// Right edge (`x + w`).
    #[serde(rename = "Right")]
    pub right: f64,

    /// Raw left coordinate.
    pub x: f64,
    /// Raw top coordinate.
    pub y: f64,
    /// Raw width.
    pub w: f64,
    /// Raw height.
    pub h: f64,
}

impl TextFragment {
    /// Normalize a raw text fragment.
    ///
    /// Returns `None` when the fragment carries no text run; such fragments
    /// are dropped (they still advance line clustering in the caller).
    pub fn from_raw(raw: &RawText, page: u32, line_number: u32) -> Option<Self> {
        let value = unescape(&raw.runs.first()?.text);
        Some(Self {
            page,
            line_number,
            value,
            top: raw.y,
            left: raw.x,
            bottom: raw.y + raw.h,
            right: raw.x + raw.w,
            x: raw.x,
            y: raw.y,
            w: raw.w,
            h: raw.h,
        })
    }
}

/// A normalized form-field fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFragment {
    /// Page index (0-based, matching the decoder tree).
    #[serde(rename = "Page")]
    pub page: u32,

    /// Stable field identifier, unique within a page.
    #[serde(rename = "Id")]
    pub id: String,

    /// Nearest qualifying label text, assigned once by the field labeler.
    /// Fields on pages other than the first processed page never receive a
    /// label (known limitation).
    #[serde(rename = "Label")]
    pub label: Option<TextFragment>,

    /// Current stored value; an empty string when the field carries none.
    #[serde(rename = "Value")]
    pub value: Value,

    /// Top edge (`y`).
    #[serde(rename = "Top")]
    pub top: f64,
    /// Left edge (`x`).
    #[serde(rename = "Left")]
    pub left: f64,
    /// Bottom edge (`y + h`).
    #[serde(rename = "Bottom")]
    pub bottom: f64,
    /// Right edge (`x + w`).
    #[serde(rename = "Right")]
    pub right: f64,

    /// Raw left coordinate.
    pub x: f64,
    /// Raw top coordinate.
    pub y: f64,
    /// Raw width.
    pub w: f64,
    /// Raw height.
    pub h: f64,
}

impl FieldFragment {
    /// Normalize a raw field fragment.
    ///
    /// Returns `None` when the nested identifier is missing (malformed
    /// fragment, skipped without aborting the page).
    pub fn from_raw(raw: &RawField, page: u32) -> Option<Self> {
        let id = raw.id.as_ref()?.id.clone();
        let value = raw
            .value
            .clone()
            .unwrap_or_else(|| Value::String(String::new()));
        Some(Self {
            page,
            id,
            label: None,
            value,
            top: raw.y,
            left: raw.x,
            bottom: raw.y + raw.h,
            right: raw.x + raw.w,
            x: raw.x,
            y: raw.y,
            w: raw.w,
            h: raw.h,
        })
    }
}

/// One baseline entry: `{"TextBlock": value}` for texts, `{<id>: value}`
/// for fields. The flat list of these mirrors processing order and can be
/// pasted back in as expected values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActualValue(serde_json::Map<String, Value>);

impl ActualValue {
    /// Baseline entry for a text fragment.
    pub fn text(value: &str) -> Self {
        let mut map = serde_json::Map::with_capacity(1);
        map.insert("TextBlock".to_string(), Value::String(value.to_string()));
        Self(map)
    }

    /// Baseline entry for a field fragment.
    pub fn field(id: &str, value: Value) -> Self {
        let mut map = serde_json::Map::with_capacity(1);
        map.insert(id.to_string(), value);
        Self(map)
    }

    /// The entry's token (field id or `"TextBlock"`).
    pub fn token(&self) -> &str {
        self.0.keys().next().map(String::as_str).unwrap_or_default()
    }

    /// The entry's observed value.
    pub fn value(&self) -> &Value {
        self.0.values().next().unwrap_or(&Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::raw::{RawFieldId, RawRun};

    fn raw_text(x: f64, y: f64, w: f64, h: f64, encoded: &str) -> RawText {
        RawText {
            x,
            y,
            w,
            h,
            runs: vec![RawRun {
                text: encoded.to_string(),
            }],
        }
    }

    #[test]
    fn test_text_fragment_bounding_box() {
        let raw = raw_text(3.3, 27.163, 52.547, 0.5, "Address%201%3A");
        let frag = TextFragment::from_raw(&raw, 0, 7).unwrap();
        assert_eq!(frag.value, "Address 1:");
        assert_eq!(frag.top, 27.163);
        assert_eq!(frag.left, 3.3);
        assert_eq!(frag.bottom, 27.663);
        assert_eq!(frag.right, 55.847);
        assert_eq!(frag.line_number, 7);
    }

    #[test]
    fn test_text_fragment_without_runs_dropped() {
        let raw = RawText {
            x: 1.0,
            y: 2.0,
            w: 3.0,
            h: 0.0,
            runs: vec![],
        };
        assert!(TextFragment::from_raw(&raw, 0, 1).is_none());
    }

    #[test]
    fn test_field_fragment_from_raw() {
        let raw = RawField {
            id: Some(RawFieldId {
                id: "Given_Name_Text_Box".to_string(),
            }),
            value: Some(Value::String("Barry".to_string())),
            x: 10.356,
            y: 23.381,
            w: 9.375,
            h: 0.887,
        };
        let frag = FieldFragment::from_raw(&raw, 0).unwrap();
        assert_eq!(frag.id, "Given_Name_Text_Box");
        assert_eq!(frag.value, Value::String("Barry".to_string()));
        assert!(frag.label.is_none());
        assert_eq!(frag.bottom, 23.381 + 0.887);
    }

    #[test]
    fn test_field_fragment_missing_id_dropped() {
        let raw = RawField::default();
        assert!(FieldFragment::from_raw(&raw, 0).is_none());
    }

    #[test]
    fn test_field_fragment_missing_value_defaults_empty() {
        let raw = RawField {
            id: Some(RawFieldId {
                id: "Empty_Box".to_string(),
            }),
            ..RawField::default()
        };
        let frag = FieldFragment::from_raw(&raw, 0).unwrap();
        assert_eq!(frag.value, Value::String(String::new()));
    }

    #[test]
    fn test_serialized_keys_keep_decoder_casing() {
        let raw = raw_text(1.0, 2.0, 3.0, 0.5, "Hi");
        let frag = TextFragment::from_raw(&raw, 0, 1).unwrap();
        let json = serde_json::to_value(&frag).unwrap();
        assert_eq!(json["Value"], "Hi");
        assert_eq!(json["Top"], 2.0);
        assert_eq!(json["w"], 3.0);
    }

    #[test]
    fn test_actual_value_accessors() {
        let text = ActualValue::text("PDF Form Example");
        assert_eq!(text.token(), "TextBlock");
        assert_eq!(text.value(), &Value::String("PDF Form Example".into()));

        let field = ActualValue::field("Height_Formatted_Field", Value::String("150".into()));
        assert_eq!(field.token(), "Height_Formatted_Field");
        assert_eq!(
            serde_json::to_string(&field).unwrap(),
            r#"{"Height_Formatted_Field":"150"}"#
        );
    }
}
