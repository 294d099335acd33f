//! Learner-facing explanations for rejection reasons.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::allowlist::describe_categories;
use crate::filter::MAX_EXPRESSION_LEN;

fn explanations() -> &'static HashMap<&'static str, String> {
    static EXPLANATIONS: OnceLock<HashMap<&'static str, String>> = OnceLock::new();
    EXPLANATIONS.get_or_init(|| {
        HashMap::from([
            (
                "empty input",
                "Type an expression to get started, for example x^2 + 1.".to_string(),
            ),
            (
                "input is too long",
                format!(
                    "That expression is longer than {MAX_EXPRESSION_LEN} characters. \
                     Try splitting it into smaller parts."
                ),
            ),
            (
                "expression contains a forbidden pattern",
                "The expression contains text that is not part of a math formula, such as \
                 code or markup. Stick to numbers, x, operators and math functions."
                    .to_string(),
            ),
            (
                "malformed expression",
                "The expression could not be read. Check that every parenthesis is closed \
                 and every operator has a value on both sides."
                    .to_string(),
            ),
        ])
    })
}

fn not_permitted() -> &'static Regex {
    static NOT_PERMITTED: OnceLock<Regex> = OnceLock::new();
    NOT_PERMITTED.get_or_init(|| {
        Regex::new(r"^function '(.+)' is not permitted$").expect("not-permitted regex is valid")
    })
}

/// Turn a rejection reason into guidance a learner can act on.
///
/// Reasons that aren't recognized are returned unchanged.
#[must_use]
pub fn explain_error(reason: &str) -> String {
    if let Some(explanation) = explanations().get(reason) {
        return explanation.clone();
    }

    if let Some(captures) = not_permitted().captures(reason) {
        return format!(
            "The function '{}' is not available here. You can use: {}.",
            &captures[1],
            describe_categories()
        );
    }

    reason.to_string()
}
