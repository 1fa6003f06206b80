//! Fragment normalization and line assembly.
//!
//! Both run in a single pass over each target page, in fragment order:
//! every raw text fragment advances the line clustering state, kept
//! fragments become [`TextFragment`]s with the current line number, and
//! their values are joined into per-line strings. Field fragments are
//! normalized in the same pass; malformed ones are skipped without
//! aborting the page.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::model::{ActualValue, FieldFragment, RawPage, TextFragment};

/// Separator inserted between consecutive fragment values on one line.
pub const LINE_SEPARATOR: &str = " ==> ";

/// Line clustering state threaded through the whole target-page range.
///
/// The counter is shared across pages (not reset per page) and increments
/// whenever a fragment's vertical position differs from the current line's,
/// compared after rounding to 3 decimal places. The vertical anchor resets
/// at every page boundary, so fragments at the same y on different pages
/// still land on different lines.
#[derive(Debug, Default)]
pub struct LineAccumulator {
    counter: u32,
    current_top: Option<i64>,
}

impl LineAccumulator {
    /// Create a fresh accumulator for one run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the vertical anchor at a page boundary. The counter keeps
    /// running; the next fragment always starts a new line.
    pub fn start_page(&mut self) {
        self.current_top = None;
    }

    /// Observe a fragment's vertical position and return its line number.
    pub fn observe(&mut self, y: f64) -> u32 {
        let key = round3(y);
        if self.current_top != Some(key) {
            self.current_top = Some(key);
            self.counter += 1;
        }
        self.counter
    }
}

/// Round a vertical position to the clustering tolerance (3 decimal places).
fn round3(v: f64) -> i64 {
    (v * 1000.0).round() as i64
}

/// Normalized fragments of one page.
#[derive(Debug, Default)]
pub struct PageFragments {
    /// Kept text fragments, in arrival order.
    pub texts: Vec<TextFragment>,
    /// Kept field fragments, in arrival order.
    pub fields: Vec<FieldFragment>,
}

/// Normalize one page's fragments.
///
/// `page_index` is the 0-based index into the decoder tree. Line numbers
/// come from `acc`; line text accumulates into `lines`; every kept fragment
/// appends one baseline entry to `actual_values` (texts before fields).
pub fn normalize_page(
    page: &RawPage,
    page_index: u32,
    acc: &mut LineAccumulator,
    lines: &mut BTreeMap<u32, String>,
    actual_values: &mut Vec<ActualValue>,
) -> PageFragments {
    let mut result = PageFragments::default();

    acc.start_page();

    for raw in &page.texts {
        let line_number = acc.observe(raw.y);
        let line = lines.entry(line_number).or_default();

        let Some(fragment) = TextFragment::from_raw(raw, page_index, line_number) else {
            // No text run: the fragment is dropped, but it has already
            // advanced the clustering state and consumed its line slot.
            log::debug!("dropping text fragment without runs on page {page_index}");
            continue;
        };

        if !fragment.value.is_empty() {
            if !line.is_empty() {
                line.push_str(LINE_SEPARATOR);
            }
            line.push_str(&fragment.value);
        }

        actual_values.push(ActualValue::text(&fragment.value));
        result.texts.push(fragment);
    }

    for raw in &page.fields {
        let Some(fragment) = FieldFragment::from_raw(raw, page_index) else {
            log::debug!("dropping malformed field fragment on page {page_index}");
            continue;
        };
        actual_values.push(ActualValue::field(&fragment.id, fragment.value.clone()));
        result.fields.push(fragment);
    }

    result
}

/// Convenience for tests and callers that only need the field value as JSON.
pub(crate) fn field_value_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::raw::{RawField, RawFieldId, RawRun, RawText};

    fn text(x: f64, y: f64, encoded: &str) -> RawText {
        RawText {
            x,
            y,
            w: 5.0,
            h: 0.5,
            runs: vec![RawRun {
                text: encoded.to_string(),
            }],
        }
    }

    fn field(id: &str, x: f64, y: f64, value: &str) -> RawField {
        RawField {
            id: Some(RawFieldId { id: id.to_string() }),
            value: Some(Value::String(value.to_string())),
            x,
            y,
            w: 9.375,
            h: 0.887,
        }
    }

    fn run_page(page: &RawPage) -> (PageFragments, BTreeMap<u32, String>, Vec<ActualValue>) {
        let mut acc = LineAccumulator::new();
        let mut lines = BTreeMap::new();
        let mut actuals = Vec::new();
        let frags = normalize_page(page, 0, &mut acc, &mut lines, &mut actuals);
        (frags, lines, actuals)
    }

    #[test]
    fn test_line_numbers_non_decreasing() {
        let page = RawPage {
            texts: vec![
                text(1.0, 10.0, "a"),
                text(6.0, 10.0, "b"),
                text(1.0, 12.0, "c"),
            ],
            fields: vec![],
        };
        let (frags, _, _) = run_page(&page);
        let numbers: Vec<u32> = frags.texts.iter().map(|t| t.line_number).collect();
        assert_eq!(numbers, vec![1, 1, 2]);
    }

    #[test]
    fn test_line_concatenation_with_separator() {
        let page = RawPage {
            texts: vec![
                text(1.0, 10.0, "Given%20Name"),
                text(6.0, 10.0, "Family%20Name"),
                text(1.0, 12.0, "Address%201%3A"),
            ],
            fields: vec![],
        };
        let (_, lines, _) = run_page(&page);
        assert_eq!(lines[&1], "Given Name ==> Family Name");
        assert_eq!(lines[&2], "Address 1:");
    }

    #[test]
    fn test_vertical_tolerance_three_decimals() {
        // Differs only in the 4th decimal place: same line
        let page = RawPage {
            texts: vec![text(1.0, 10.0001, "a"), text(6.0, 10.0004, "b")],
            fields: vec![],
        };
        let (frags, _, _) = run_page(&page);
        assert_eq!(frags.texts[0].line_number, frags.texts[1].line_number);

        // Differs in the 3rd decimal place: new line
        let page = RawPage {
            texts: vec![text(1.0, 10.001, "a"), text(6.0, 10.002, "b")],
            fields: vec![],
        };
        let (frags, _, _) = run_page(&page);
        assert_ne!(frags.texts[0].line_number, frags.texts[1].line_number);
    }

    #[test]
    fn test_counter_continues_across_pages() {
        let page_a = RawPage {
            texts: vec![text(1.0, 10.0, "a")],
            fields: vec![],
        };
        let page_b = RawPage {
            texts: vec![text(1.0, 4.0, "b")],
            fields: vec![],
        };

        let mut acc = LineAccumulator::new();
        let mut lines = BTreeMap::new();
        let mut actuals = Vec::new();
        let first = normalize_page(&page_a, 0, &mut acc, &mut lines, &mut actuals);
        let second = normalize_page(&page_b, 1, &mut acc, &mut lines, &mut actuals);

        assert_eq!(first.texts[0].line_number, 1);
        assert_eq!(second.texts[0].line_number, 2);
    }

    #[test]
    fn test_page_boundary_resets_vertical_anchor() {
        // Fragments at the same y on consecutive pages (a fixed header
        // position, say) must not share a line.
        let page_a = RawPage {
            texts: vec![text(1.0, 10.0, "header%20a")],
            fields: vec![],
        };
        let page_b = RawPage {
            texts: vec![text(1.0, 10.0, "header%20b")],
            fields: vec![],
        };

        let mut acc = LineAccumulator::new();
        let mut lines = BTreeMap::new();
        let mut actuals = Vec::new();
        let first = normalize_page(&page_a, 0, &mut acc, &mut lines, &mut actuals);
        let second = normalize_page(&page_b, 1, &mut acc, &mut lines, &mut actuals);

        assert_eq!(first.texts[0].line_number, 1);
        assert_eq!(second.texts[0].line_number, 2);
        assert_eq!(lines[&1], "header a");
        assert_eq!(lines[&2], "header b");
    }

    #[test]
    fn test_runless_fragment_advances_clustering() {
        let runless = RawText {
            x: 1.0,
            y: 10.0,
            w: 5.0,
            h: 0.5,
            runs: vec![],
        };
        let page = RawPage {
            texts: vec![runless, text(1.0, 12.0, "kept")],
            fields: vec![],
        };
        let (frags, lines, actuals) = run_page(&page);
        // The dropped fragment consumed line 1; the kept one lands on line 2.
        assert_eq!(frags.texts.len(), 1);
        assert_eq!(frags.texts[0].line_number, 2);
        assert_eq!(lines[&1], "");
        assert_eq!(lines[&2], "kept");
        assert_eq!(actuals.len(), 1);
    }

    #[test]
    fn test_baseline_order_texts_before_fields() {
        let page = RawPage {
            texts: vec![text(1.0, 10.0, "First%20name")],
            fields: vec![field("Given_Name_Text_Box", 10.0, 10.0, "Barry")],
        };
        let (_, _, actuals) = run_page(&page);
        assert_eq!(actuals.len(), 2);
        assert_eq!(actuals[0].token(), "TextBlock");
        assert_eq!(actuals[1].token(), "Given_Name_Text_Box");
        assert_eq!(actuals[1].value(), &Value::String("Barry".into()));
    }

    #[test]
    fn test_malformed_field_skipped_page_continues() {
        let page = RawPage {
            texts: vec![],
            fields: vec![RawField::default(), field("Ok_Field", 1.0, 2.0, "x")],
        };
        let (frags, _, _) = run_page(&page);
        assert_eq!(frags.fields.len(), 1);
        assert_eq!(frags.fields[0].id, "Ok_Field");
    }

    #[test]
    fn test_field_value_string() {
        assert_eq!(field_value_string(&Value::String("abc".into())), "abc");
        assert_eq!(field_value_string(&serde_json::json!(150)), "150");
    }
}
