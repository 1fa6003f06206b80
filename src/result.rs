//! Run results: derived collections, statistics, and JSON output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{ActualValue, FieldFragment, TextFragment};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation.
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace.
    Compact,
}

/// Everything one pipeline run derives from the document tree.
///
/// Built fresh per run and owned exclusively by it; re-running over the
/// same tree and page spec yields an identical report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessReport {
    /// Normalized field fragments, grouped by processed page.
    pub fields: Vec<Vec<FieldFragment>>,

    /// Normalized text fragments, grouped by processed page.
    pub texts: Vec<Vec<TextFragment>>,

    /// Flat baseline list of observed values, in processing order (a
    /// page's texts before its fields, pages in target order).
    pub actual_values: Vec<ActualValue>,

    /// Reconstructed text lines keyed by line number. Sparse: lines that
    /// attracted no text are absent or empty.
    pub lines: BTreeMap<u32, String>,

    /// Processing statistics.
    pub stats: ProcessStats,
}

impl ProcessReport {
    /// Serialize the whole report.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        serialize(self, format)
    }

    /// Serialize only the baseline list, ready to be pasted back in as
    /// expected values.
    pub fn baseline_json(&self, format: JsonFormat) -> Result<String> {
        serialize(&self.actual_values, format)
    }

    /// Iterate all field fragments across pages.
    pub fn all_fields(&self) -> impl Iterator<Item = &FieldFragment> {
        self.fields.iter().flatten()
    }

    /// Iterate all text fragments across pages.
    pub fn all_texts(&self) -> impl Iterator<Item = &TextFragment> {
        self.texts.iter().flatten()
    }

    /// Look up a field by its stable id.
    pub fn field_by_id(&self, id: &str) -> Option<&FieldFragment> {
        self.all_fields().find(|f| f.id == id)
    }

    /// Look up a reconstructed line by number.
    pub fn line(&self, number: u32) -> Option<&str> {
        self.lines.get(&number).map(String::as_str)
    }
}

fn serialize<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };
    result.map_err(|e| Error::Render(format!("JSON serialization error: {e}")))
}

/// Statistics collected during one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStats {
    /// Number of pages processed.
    pub page_count: u32,
    /// Number of text fragments kept.
    pub text_count: u32,
    /// Number of field fragments kept.
    pub field_count: u32,
    /// Number of reconstructed lines.
    pub line_count: u32,
}
