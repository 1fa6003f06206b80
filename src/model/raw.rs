//! Raw document tree types.
//!
//! These mirror the JSON tree produced by the external decoder: an ordered
//! list of pages, each with unordered positioned text runs and form fields.
//! The tree is read-only input; all derived structures are built fresh per
//! run. Unknown keys are ignored so newer decoder output stays readable.

use serde::Deserialize;
use serde_json::Value;

/// A decoded document tree as emitted by the external decoder.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDocument {
    /// Ordered pages of the document.
    #[serde(rename = "Pages", default)]
    pub pages: Vec<RawPage>,
}

impl RawDocument {
    /// Number of pages in the tree.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }
}

/// A single raw page: positioned text runs plus form fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPage {
    /// Raw text fragments on the page.
    #[serde(rename = "Texts", default)]
    pub texts: Vec<RawText>,

    /// Raw form-field fragments on the page.
    #[serde(rename = "Fields", default)]
    pub fields: Vec<RawField>,
}

/// A raw positioned text fragment.
///
/// Example decoder output:
/// `{"x":3.3,"y":27.163,"w":52.547,"A":"left","R":[{"T":"Address%201%3A"}]}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawText {
    /// Left edge.
    #[serde(default)]
    pub x: f64,
    /// Top edge.
    #[serde(default)]
    pub y: f64,
    /// Width.
    #[serde(default)]
    pub w: f64,
    /// Height. Some decoders omit this on text runs.
    #[serde(default)]
    pub h: f64,
    /// Text runs; only the first run's content is used.
    #[serde(rename = "R", default)]
    pub runs: Vec<RawRun>,
}

/// One encoded run of text inside a raw text fragment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRun {
    /// Percent-encoded run content.
    #[serde(rename = "T", default)]
    pub text: String,
}

/// A raw form-field fragment.
///
/// Example decoder output:
/// `{"id":{"Id":"Given_Name_Text_Box"},"x":10.356,"y":23.381,"w":9.375,"h":0.887,"V":"Barry"}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawField {
    /// Nested stable identifier. Missing identifiers mark the fragment as
    /// malformed and it is skipped during normalization.
    #[serde(default)]
    pub id: Option<RawFieldId>,
    /// Current stored value, any JSON shape.
    #[serde(rename = "V", default)]
    pub value: Option<Value>,
    /// Left edge.
    #[serde(default)]
    pub x: f64,
    /// Top edge.
    #[serde(default)]
    pub y: f64,
    /// Width.
    #[serde(default)]
    pub w: f64,
    /// Height.
    #[serde(default)]
    pub h: f64,
}

/// The nested identifier object of a raw field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFieldId {
    /// The stable field id, unique within a page.
    #[serde(rename = "Id", default)]
    pub id: String,
}
