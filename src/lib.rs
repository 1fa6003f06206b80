//! # pdfcheck
//!
//! Validate form fields and text in decoded PDF document trees.
//!
//! pdfcheck consumes the page/fragment JSON tree produced by an external
//! document decoder, reconstructs text lines from positioned fragments,
//! associates form fields with nearby label text, captures a baseline of
//! observed values, and optionally validates caller-supplied expected
//! values against the document.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfcheck::{Pdfcheck, PageSpec};
//! use serde_json::json;
//!
//! fn main() -> pdfcheck::Result<()> {
//!     let report = Pdfcheck::new()
//!         .with_pages(PageSpec::parse("1-3"))
//!         .expect_value("Given_Name_Text_Box", json!("Barry"))
//!         .expect_value("TextBlock", json!("PDF Form Example"))
//!         .process("tree.json")?;
//!
//!     println!("{}", report.baseline_json(pdfcheck::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Page selection**: all pages, the first N, or a comma/range token list
//! - **Normalization**: bounding boxes and decoded display values per fragment
//! - **Line assembly**: vertical-position clustering into `" ==> "`-joined lines
//! - **Field labeling**: nearest qualifying text left of each first-page field
//! - **Validation**: tolerant string and structural-subset comparison

pub mod decode;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod result;
pub mod text;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{ActualValue, FieldFragment, RawDocument, RawPage, TextFragment};
pub use pipeline::{
    expectations_from_json, Expectation, PageSpec, ProcessOptions, TargetPages, LINE_SEPARATOR,
};
pub use result::{JsonFormat, ProcessReport, ProcessStats};

use std::io::Read;
use std::path::Path;

use serde_json::Value;

/// Process a decoded document tree from a file with default options.
///
/// # Example
///
/// ```no_run
/// let report = pdfcheck::process_file("tree.json").unwrap();
/// println!("lines: {}", report.stats.line_count);
/// ```
pub fn process_file<P: AsRef<Path>>(path: P) -> Result<ProcessReport> {
    process_file_with_options(path, &ProcessOptions::default())
}

/// Process a decoded document tree from a file with custom options.
pub fn process_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ProcessOptions,
) -> Result<ProcessReport> {
    let doc = decode::tree_from_path(path)?;
    pipeline::run(&doc, options)
}

/// Process a decoded document tree from an in-memory buffer.
pub fn process_bytes(data: &[u8]) -> Result<ProcessReport> {
    process_bytes_with_options(data, &ProcessOptions::default())
}

/// Process a decoded document tree from an in-memory buffer with options.
pub fn process_bytes_with_options(data: &[u8], options: &ProcessOptions) -> Result<ProcessReport> {
    let doc = decode::tree_from_bytes(data)?;
    pipeline::run(&doc, options)
}

/// Process a decoded document tree from any reader.
pub fn process_reader<R: Read>(reader: R) -> Result<ProcessReport> {
    process_reader_with_options(reader, &ProcessOptions::default())
}

/// Process a decoded document tree from any reader with options.
pub fn process_reader_with_options<R: Read>(
    reader: R,
    options: &ProcessOptions,
) -> Result<ProcessReport> {
    let doc = decode::tree_from_reader(reader)?;
    pipeline::run(&doc, options)
}

/// Builder for processing and validating decoded document trees.
///
/// # Example
///
/// ```no_run
/// use pdfcheck::Pdfcheck;
/// use serde_json::json;
///
/// let report = Pdfcheck::new()
///     .expect_value("Family_Name_Text_Box", json!("Solomon"))
///     .process("tree.json")?;
/// # Ok::<(), pdfcheck::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pdfcheck {
    options: ProcessOptions,
}

impl Pdfcheck {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page spec.
    pub fn with_pages(mut self, pages: PageSpec) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Add one expected value.
    pub fn expect_value(mut self, token: impl Into<String>, expected: Value) -> Self {
        self.options = self.options.expect(token, expected);
        self
    }

    /// Add expected values from caller JSON (a `{token: value}` map or an
    /// array of them).
    pub fn expect_json(mut self, json: &Value) -> Self {
        self.options = self.options.with_expectations_json(json);
        self
    }

    /// Process a tree file.
    pub fn process<P: AsRef<Path>>(self, path: P) -> Result<ProcessReport> {
        process_file_with_options(path, &self.options)
    }

    /// Process a tree from bytes.
    pub fn process_bytes(self, data: &[u8]) -> Result<ProcessReport> {
        process_bytes_with_options(data, &self.options)
    }

    /// Run the pipeline over an already-decoded tree.
    pub fn process_tree(self, doc: &RawDocument) -> Result<ProcessReport> {
        pipeline::run(doc, &self.options)
    }
}
