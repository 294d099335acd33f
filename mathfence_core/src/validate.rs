//! Validation orchestrator
//!
//! Runs the filter, the grammar parser and the allow-list in order. The first
//! stage that refuses the expression decides the [`Rejection`].

use serde::Serialize;
use tracing::{debug, trace};

use crate::allowlist::check_allowed;
use crate::explain::explain_error;
use crate::filter::filter;
use crate::syntax::{parse, Node};

/// Why an expression was refused.
///
/// The `Display` text is the stable reason message understood by
/// [`explain_error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Rejection {
    #[error("empty input")]
    Empty,

    #[error("input is too long")]
    TooLong { length: usize, max: usize },

    #[error("expression contains a forbidden pattern")]
    ForbiddenPattern { id: String, description: String },

    #[error("malformed expression")]
    Malformed { detail: String },

    #[error("function '{name}' is not permitted")]
    FunctionNotPermitted { name: String },
}

impl Rejection {
    /// Jargon-free guidance for this rejection.
    #[must_use]
    pub fn explain(&self) -> String {
        explain_error(&self.to_string())
    }
}

/// Result of [`validate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<Rejection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sanitized: Option<String>,
}

impl ValidationResult {
    /// Create a result accepting the given sanitized expression
    #[must_use]
    pub fn valid(sanitized: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            error: None,
            sanitized: Some(sanitized.into()),
        }
    }

    /// Create a result refusing the expression
    #[must_use]
    pub const fn invalid(rejection: Rejection) -> Self {
        Self {
            is_valid: false,
            error: Some(rejection),
            sanitized: None,
        }
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }

    #[must_use]
    pub const fn error(&self) -> Option<&Rejection> {
        self.error.as_ref()
    }

    /// Trimmed expression, present only when valid
    #[must_use]
    pub fn sanitized(&self) -> Option<&str> {
        self.sanitized.as_deref()
    }
}

/// A validated expression together with its parsed tree.
#[derive(Debug, Clone)]
pub(crate) struct Analysis {
    pub sanitized: String,
    pub ast: Node,
}

/// Run every validation stage, keeping the parsed tree for reuse.
pub(crate) fn analyze(expression: &str) -> Result<Analysis, Rejection> {
    let sanitized = filter(expression).map_err(|rejection| {
        debug!(reason = %rejection, "expression refused by lexical filter");
        rejection
    })?;

    let ast = parse(sanitized).map_err(|err| {
        debug!(error = %err, "expression could not be parsed");
        Rejection::Malformed {
            detail: err.to_string(),
        }
    })?;

    let check = check_allowed(&ast);
    if let Some(name) = check.offending_name {
        debug!(function = %name, "expression calls a function outside the allow-list");
        return Err(Rejection::FunctionNotPermitted { name });
    }

    trace!(expression = %sanitized, "expression accepted");
    Ok(Analysis {
        sanitized: sanitized.to_string(),
        ast,
    })
}

/// Validate an untrusted expression.
///
/// Never panics and never returns an error: every failure is encoded in the
/// returned [`ValidationResult`].
#[must_use]
pub fn validate(expression: &str) -> ValidationResult {
    match analyze(expression) {
        Ok(analysis) => ValidationResult::valid(analysis.sanitized),
        Err(rejection) => ValidationResult::invalid(rejection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::MAX_EXPRESSION_LEN;
    use rstest::rstest;

    #[test]
    fn accepts_polynomial() {
        let result = validate("x^2 + 1");
        assert_eq!(result, ValidationResult::valid("x^2 + 1"));
        assert!(result.is_valid());
        assert_eq!(result.sanitized(), Some("x^2 + 1"));
        assert!(result.error().is_none());
    }

    #[test]
    fn sanitized_is_trimmed_input() {
        let result = validate("   sin(x) + cos(x)  ");
        assert_eq!(result.sanitized(), Some("sin(x) + cos(x)"));
    }

    #[test]
    fn rejects_empty() {
        let result = validate("");
        assert!(!result.is_valid());
        assert_eq!(result.error(), Some(&Rejection::Empty));
        assert_eq!(result.error().map(ToString::to_string).as_deref(), Some("empty input"));
        assert!(result.sanitized().is_none());
    }

    #[test]
    fn rejects_code_injection() {
        let result = validate("eval('alert(1)')");
        assert!(!result.is_valid());
        assert!(matches!(
            result.error(),
            Some(Rejection::ForbiddenPattern { id, .. }) if id == "execution:eval"
        ));
    }

    #[rstest]
    #[case("x<x && x>0")]
    #[case("x < pi || x > 1")]
    #[case("x < e && x > -1")]
    fn accepts_mixed_comparisons(#[case] expression: &str) {
        let result = validate(expression);
        assert!(result.is_valid(), "{expression}: {result:?}");
    }

    #[test]
    fn rejects_markup_tag() {
        assert!(matches!(
            validate("<svg/onload=alert(1)>").error(),
            Some(Rejection::ForbiddenPattern { id, .. }) if id == "markup:tag"
        ));
    }

    #[rstest]
    #[case("x +")]
    #[case("(x")]
    #[case("x = 1")]
    #[case("\"x\"")]
    fn rejects_malformed(#[case] expression: &str) {
        let result = validate(expression);
        assert!(
            matches!(result.error(), Some(Rejection::Malformed { .. })),
            "{expression}: {result:?}"
        );
        assert_eq!(
            result.error().map(ToString::to_string).as_deref(),
            Some("malformed expression")
        );
    }

    #[test]
    fn rejects_disallowed_function() {
        let result = validate("alert(x)");
        assert_eq!(
            result.error(),
            Some(&Rejection::FunctionNotPermitted {
                name: "alert".to_string()
            })
        );
        assert_eq!(
            result.error().map(ToString::to_string).as_deref(),
            Some("function 'alert' is not permitted")
        );
    }

    #[test]
    fn length_boundary() {
        // "x+x+...+x" with 100 and 99 additions
        let too_long = format!("{}x", "x+".repeat(100));
        assert_eq!(too_long.len(), MAX_EXPRESSION_LEN + 1);
        assert!(matches!(
            validate(&too_long).error(),
            Some(Rejection::TooLong { .. })
        ));

        let accepted = format!("{}x", "x+".repeat(99));
        assert_eq!(accepted.len(), MAX_EXPRESSION_LEN - 1);
        assert!(validate(&accepted).is_valid());
    }

    #[test]
    fn validation_is_idempotent() {
        for expression in ["x^2 + 1", "eval(1)", "", "foo(x)", "x +"] {
            assert_eq!(validate(expression), validate(expression));
        }
    }

    #[test]
    fn serializes_for_hosts() {
        let valid = serde_json::to_value(validate("x")).expect("serializable");
        assert_eq!(valid, serde_json::json!({"isValid": true, "sanitized": "x"}));

        let invalid = serde_json::to_value(validate("")).expect("serializable");
        assert_eq!(
            invalid,
            serde_json::json!({"isValid": false, "error": {"code": "empty"}})
        );
    }
}
