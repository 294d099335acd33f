//! Lexical/structural filter
//!
//! Runs before any parsing is attempted. It bounds the input length and rejects
//! code-injection-prone substrings using the [forbidden pattern set](crate::patterns).

use crate::patterns::{first_match, forbidden_patterns, ForbiddenPattern};
use crate::validate::Rejection;

/// Maximum accepted expression length, in characters.
pub const MAX_EXPRESSION_LEN: usize = 200;

/// Filter an expression against the embedded forbidden pattern set.
///
/// On success the trimmed expression is returned.
///
/// # Errors
/// Returns the [`Rejection`] describing why the expression was refused.
pub fn filter(expression: &str) -> Result<&str, Rejection> {
    filter_with(forbidden_patterns(), expression)
}

/// Like [`filter`] but against the given pattern set.
///
/// # Errors
/// Returns the [`Rejection`] describing why the expression was refused.
pub fn filter_with<'e>(
    patterns: &[ForbiddenPattern],
    expression: &'e str,
) -> Result<&'e str, Rejection> {
    let length = expression.chars().count();
    if length > MAX_EXPRESSION_LEN {
        return Err(Rejection::TooLong {
            length,
            max: MAX_EXPRESSION_LEN,
        });
    }

    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return Err(Rejection::Empty);
    }

    if let Some(pattern) = first_match(patterns, trimmed) {
        return Err(Rejection::ForbiddenPattern {
            id: pattern.id.clone(),
            description: pattern.description.clone(),
        });
    }

    Ok(trimmed)
}
