//! Document model types.
//!
//! `raw` mirrors the external decoder's page/fragment tree as deserialized
//! input; `fragment` holds the normalized, geometry-enriched types the
//! pipeline produces from it.

pub mod fragment;
pub mod raw;

pub use fragment::{ActualValue, FieldFragment, TextFragment};
pub use raw::{RawDocument, RawField, RawFieldId, RawPage, RawRun, RawText};
