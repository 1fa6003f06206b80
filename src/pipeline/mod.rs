//! Processing pipeline.
//!
//! Data flows strictly forward over one decoded tree: page selection →
//! fragment normalization and line assembly (one pass) → field labeling →
//! validation. All derived state is owned by the run; nothing persists
//! between runs.

pub mod label;
pub mod normalize;
pub mod pages;
pub mod validate;

pub use label::label_fields;
pub use normalize::{normalize_page, LineAccumulator, PageFragments, LINE_SEPARATOR};
pub use pages::{PageSpec, TargetPages};
pub use validate::{validate, Expectation};

use serde_json::Value;

use crate::error::Result;
use crate::model::{FieldFragment, RawDocument, TextFragment};
use crate::result::ProcessReport;

/// Options for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Which pages to process.
    pub pages: PageSpec,

    /// Expected values to validate after processing. Empty means
    /// process-only (baseline capture).
    pub expectations: Vec<Expectation>,
}

impl ProcessOptions {
    /// Create options with defaults (all pages, no validation).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page spec.
    pub fn with_pages(mut self, pages: PageSpec) -> Self {
        self.pages = pages;
        self
    }

    /// Replace the expectation list.
    pub fn with_expectations(mut self, expectations: Vec<Expectation>) -> Self {
        self.expectations = expectations;
        self
    }

    /// Add one expectation.
    pub fn expect(mut self, token: impl Into<String>, expected: Value) -> Self {
        self.expectations.push(Expectation::new(token, expected));
        self
    }

    /// Add expectations from caller JSON: either a single `{token: value}`
    /// map or an array of them. Entries that are not one-entry maps are
    /// ignored with a warning.
    pub fn with_expectations_json(mut self, json: &Value) -> Self {
        self.expectations.extend(expectations_from_json(json));
        self
    }
}

/// Parse caller-supplied expected values into expectations.
pub fn expectations_from_json(json: &Value) -> Vec<Expectation> {
    let entries: Vec<&Value> = match json {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    let mut expectations = Vec::new();
    for entry in entries {
        match entry.as_object().and_then(Expectation::from_map) {
            Some(expectation) => expectations.push(expectation),
            None => log::warn!("ignoring malformed expected-value entry: {entry}"),
        }
    }
    expectations
}

/// Run the full pipeline over a decoded document tree.
///
/// Processes the target pages in ascending order, labels the first
/// processed page's fields, and validates any expectations. The first
/// mismatch or failed lookup aborts the run with an error; on success the
/// report holds all derived collections.
pub fn run(doc: &RawDocument, options: &ProcessOptions) -> Result<ProcessReport> {
    let target = options.pages.resolve(doc.page_count());
    log::debug!("target pages: {:?}", target.pages);

    let mut acc = LineAccumulator::new();
    let mut report = ProcessReport::default();

    for page_number in 1..=target.max_pages {
        if !target.contains(page_number) {
            continue;
        }
        let page = &doc.pages[(page_number - 1) as usize];
        let fragments = normalize_page(
            page,
            page_number - 1,
            &mut acc,
            &mut report.lines,
            &mut report.actual_values,
        );

        report.stats.page_count += 1;
        report.stats.text_count += fragments.texts.len() as u32;
        report.stats.field_count += fragments.fields.len() as u32;

        // Page groups exist only for pages that had raw fragments of that
        // kind.
        if !page.texts.is_empty() {
            report.texts.push(fragments.texts);
        }
        if !page.fields.is_empty() {
            report.fields.push(fragments.fields);
        }
    }
    report.stats.line_count = report.lines.len() as u32;

    // Only the first processed page's fields receive labels.
    if let (Some(fields), Some(texts)) = (report.fields.first_mut(), report.texts.first()) {
        label_fields(fields, texts);
    }

    let all_fields: Vec<&FieldFragment> = report.fields.iter().flatten().collect();
    let all_texts: Vec<&TextFragment> = report.texts.iter().flatten().collect();

    for expectation in &options.expectations {
        match expectation.token.as_str() {
            // Legacy reserved tokens, never validated.
            "Page" | "LineNumber" => continue,
            token => validate(token, &expectation.expected, &all_fields, &all_texts)?,
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expectations_from_json_array() {
        let json = json!([
            {"Family_Name_Text_Box": "Solomon"},
            {"TextBlock": "PDF Form Example"}
        ]);
        let expectations = expectations_from_json(&json);
        assert_eq!(expectations.len(), 2);
        assert_eq!(expectations[0].token, "Family_Name_Text_Box");
        assert_eq!(expectations[1].token, "TextBlock");
    }

    #[test]
    fn test_expectations_from_json_single_map() {
        let json = json!({"Gender_List_Box": "Man"});
        let expectations = expectations_from_json(&json);
        assert_eq!(expectations.len(), 1);
        assert_eq!(expectations[0].expected, json!("Man"));
    }

    #[test]
    fn test_expectations_from_json_malformed_entries_ignored() {
        let json = json!([{"A": 1}, "not a map", 42, {}]);
        let expectations = expectations_from_json(&json);
        assert_eq!(expectations.len(), 1);
    }

    #[test]
    fn test_options_builder() {
        let options = ProcessOptions::new()
            .with_pages(PageSpec::First(2))
            .expect("Given_Name_Text_Box", json!("Barry"));
        assert_eq!(options.pages, PageSpec::First(2));
        assert_eq!(options.expectations.len(), 1);
    }
}
