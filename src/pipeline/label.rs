//! Field labeling.
//!
//! A field's label is the nearest qualifying text fragment visually
//! preceding it: on the same visual line (vertical delta at most 1 unit),
//! to the left of the field, and within 10 horizontal units. The smallest
//! positive horizontal gap wins; ties go to the first candidate
//! encountered. Only fields of the first processed page are labeled — a
//! known limitation, preserved deliberately.

use crate::model::{FieldFragment, TextFragment};

/// Candidates must sit on the same visual line as the field.
const MAX_VERTICAL_DELTA: f64 = 1.0;

/// Candidates must start within this many units left of the field.
const MAX_HORIZONTAL_DELTA: f64 = 10.0;

/// Assign labels to `fields` from the given text fragments.
///
/// Callers pass the first processed page's fields and texts. Fields with no
/// qualifying candidate keep `label = None`.
pub fn label_fields(fields: &mut [FieldFragment], texts: &[TextFragment]) {
    for field in fields.iter_mut() {
        let mut best: Option<&TextFragment> = None;
        for candidate in texts {
            if (field.top - candidate.top).abs() > MAX_VERTICAL_DELTA {
                continue;
            }
            if candidate.left >= field.left {
                continue;
            }
            let gap = field.left - candidate.left;
            if gap > MAX_HORIZONTAL_DELTA {
                continue;
            }
            // Strict improvement keeps the first-encountered candidate on ties.
            if best.map_or(true, |b| gap < field.left - b.left) {
                best = Some(candidate);
            }
        }
        field.label = best.cloned();
    }
}
