//! Prerequisite extraction from a manifest body.
//!
//! Prerequisites are declared in prose under a `## Prerequisites` heading as
//! references like `00_foundation` or `**01-data-extraction**`. Extraction is
//! purely syntactic: a token counts if it has the two-digit-rank identifier
//! shape. Tokens that turn out not to name a real skill are reported by the
//! consistency checker, not filtered here.

use once_cell::sync::Lazy;
use regex::Regex;

/// The heading that opens the prerequisite declarations.
pub const PREREQUISITES_HEADING: &str = "## Prerequisites";

/// A skill reference: two-digit rank, separator, lowercase slug.
static SKILL_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2}[_-][a-z0-9][a-z0-9_-]*").expect("valid regex"));

/// Slice out the `## Prerequisites` section: from the heading line to the
/// next top-level heading or end of document. `None` if the section is
/// absent, which is how foundation skills legitimately read.
pub fn prerequisites_section(body: &str) -> Option<&str> {
    let mut offset = 0;
    let mut start = None;
    for line in body.split_inclusive('\n') {
        let heading = line.trim_end();
        match start {
            None => {
                if heading == PREREQUISITES_HEADING {
                    start = Some(offset + line.len());
                }
            }
            Some(section_start) => {
                if heading.starts_with("## ") {
                    return Some(&body[section_start..offset]);
                }
            }
        }
        offset += line.len();
    }
    start.map(|section_start| &body[section_start..])
}

/// Extract prerequisite skill references from a manifest body, preserving
/// first-occurrence order and dropping exact duplicates.
pub fn extract_prerequisites(body: &str) -> Vec<String> {
    let Some(section) = prerequisites_section(body) else {
        return Vec::new();
    };

    let mut refs: Vec<String> = Vec::new();
    for m in SKILL_REF.find_iter(section) {
        let token = m.as_str();
        if !refs.iter().any(|r| r == token) {
            refs.push(token.to_string());
        }
    }
    refs
}
