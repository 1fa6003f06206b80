//! Page selection.
//!
//! A page spec limits processing to certain pages. An integer spec means
//! "the first N pages", not "page N" — a legacy quirk callers depend on,
//! preserved as-is. Token specs are a comma-separated
//! mix of literal page numbers and inclusive `start-end` ranges; malformed
//! tokens are skipped silently (a warning is logged) rather than failing
//! the run.

use std::sync::OnceLock;

use regex::Regex;

/// Which pages of the document to process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSpec {
    /// Process all pages.
    #[default]
    All,
    /// Process the first N pages (integer-spec quirk, preserved).
    First(u32),
    /// Comma-separated literal pages and `start-end` inclusive ranges,
    /// e.g. `"1,2,4-6"`.
    Tokens(String),
}

/// The resolved target-page set for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPages {
    /// Total page count of the document.
    pub max_pages: u32,
    /// Target pages, 1-based, in token order. Duplicates are tolerated;
    /// downstream only queries membership in one ascending page loop.
    pub pages: Vec<u32>,
}

impl TargetPages {
    /// Check whether a 1-based page number is targeted.
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }
}

fn number_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+)\s*$").unwrap())
}

fn range_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+)\s*-\s*(\d+)\s*$").unwrap())
}

impl PageSpec {
    /// Build a spec from caller text: an all-digits value selects the first
    /// N pages, anything else is treated as a token list.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return PageSpec::All;
        }
        if let Some(caps) = number_token().captures(trimmed) {
            if let Ok(n) = caps[1].parse() {
                return PageSpec::First(n);
            }
        }
        PageSpec::Tokens(trimmed.to_string())
    }

    /// Resolve the spec into a concrete target-page set for a document with
    /// `page_count` pages.
    pub fn resolve(&self, page_count: u32) -> TargetPages {
        let pages = match self {
            PageSpec::All => (1..=page_count).collect(),
            PageSpec::First(n) => (1..=(*n).min(page_count)).collect(),
            PageSpec::Tokens(spec) => {
                let mut pages = Vec::new();
                for token in spec.split(',') {
                    if let Some(caps) = number_token().captures(token) {
                        if let Ok(n) = caps[1].parse::<u32>() {
                            pages.push(n);
                            continue;
                        }
                    }
                    if let Some(caps) = range_token().captures(token) {
                        let start = caps[1].parse::<u32>();
                        let end = caps[2].parse::<u32>();
                        if let (Ok(start), Ok(end)) = (start, end) {
                            pages.extend(start..=end);
                            continue;
                        }
                    }
                    log::warn!("ignoring malformed page token: {:?}", token);
                }
                pages
            }
        };
        TargetPages {
            max_pages: page_count,
            pages,
        }
    }
}
