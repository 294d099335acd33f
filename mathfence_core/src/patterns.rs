//! Forbidden lexical patterns
//!
//! The pattern definitions live in the `patterns` folder as YAML and are
//! embedded at build time. The set is parsed once and never mutated.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Result;

/// String with all patterns from `patterns` folder (prepared in build.rs) in YAML format.
const ALL_PATTERNS: &str = include_str!(concat!(env!("OUT_DIR"), "/all-patterns.yaml"));

/// Describes a single lexical construct that is never allowed in an expression
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ForbiddenPattern {
    /// Unique identifier, `<group>:<name>`
    pub id: String,
    /// Regular expression tested against the lower-cased expression
    #[serde(with = "serde_regex")]
    pub test: Regex,
    /// Human-readable description of what the pattern catches
    pub description: String,
    /// The group this pattern belongs to (e.g., "execution", "markup")
    pub from: String,
}

/// Parse all embedded forbidden patterns.
///
/// # Errors
/// Returns an error when there's a problem parsing the embedded YAML patterns
pub fn get_all_patterns() -> Result<Vec<ForbiddenPattern>> {
    Ok(serde_yaml::from_str(ALL_PATTERNS)?)
}

/// Return a cached reference to the embedded forbidden pattern set.
///
/// The YAML is parsed and regexes are compiled exactly once (on first call).
pub fn forbidden_patterns() -> &'static [ForbiddenPattern] {
    static PATTERNS: OnceLock<Vec<ForbiddenPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| get_all_patterns().expect("embedded forbidden patterns are valid YAML"))
}

/// Return every pattern that matches the expression, in declaration order.
///
/// Matching is case-insensitive.
#[must_use]
pub fn matching_patterns<'a>(
    patterns: &'a [ForbiddenPattern],
    expression: &str,
) -> Vec<&'a ForbiddenPattern> {
    let haystack = expression.to_lowercase();
    patterns
        .iter()
        .filter(|pattern| pattern.test.is_match(&haystack))
        .collect()
}

/// Return the first pattern (in declaration order) that matches the expression.
#[must_use]
pub fn first_match<'a>(
    patterns: &'a [ForbiddenPattern],
    expression: &str,
) -> Option<&'a ForbiddenPattern> {
    let haystack = expression.to_lowercase();
    patterns
        .iter()
        .find(|pattern| pattern.test.is_match(&haystack))
}

/// Sorted, de-duplicated list of pattern groups.
#[must_use]
pub fn groups(patterns: &[ForbiddenPattern]) -> Vec<&str> {
    let mut groups: Vec<&str> = patterns.iter().map(|p| p.from.as_str()).collect();
    groups.sort_unstable();
    groups.dedup();
    groups
}
