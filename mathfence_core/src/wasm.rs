//! WASM bindings for `mathfence_core`
//!
//! Exposes the sandbox to Node.js and browser hosts. Structured results cross
//! the boundary as JSON strings so no Rust types leak into JavaScript.

use wasm_bindgen::prelude::*;

use crate::{
    allowlist::allowed_functions, explain_error, make_safe_function, score_complexity, validate,
    SafeFunction,
};

/// A validated expression that JavaScript can evaluate repeatedly.
#[wasm_bindgen]
pub struct WasmSafeFunction {
    inner: SafeFunction,
}

#[wasm_bindgen]
impl WasmSafeFunction {
    /// Builds the function from an untrusted expression.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(expression: &str) -> Self {
        Self {
            inner: make_safe_function(expression),
        }
    }

    /// Evaluates at `x`. Always returns a finite number.
    #[wasm_bindgen]
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.inner.evaluate(x)
    }

    #[wasm_bindgen(getter, js_name = isValid)]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.inner.is_valid()
    }

    /// The rejection reason, if the expression was refused.
    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.inner.error().map(ToString::to_string)
    }
}

/// Validates an expression and returns the result as JSON
/// (`{"isValid": bool, "error"?: {...}, "sanitized"?: string}`).
///
/// # Errors
///
/// Returns an error if serialization to JSON fails.
#[wasm_bindgen]
pub fn validate_wasm(expression: &str) -> Result<String, JsValue> {
    serde_json::to_string(&validate(expression))
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize validation result: {e}")))
}

/// Turns a rejection reason into learner-facing guidance.
#[wasm_bindgen]
#[must_use]
pub fn explain_error_wasm(reason: &str) -> String {
    explain_error(reason)
}

/// Scores an expression and returns the report as JSON.
///
/// # Errors
///
/// Returns an error if serialization to JSON fails.
#[wasm_bindgen]
pub fn score_complexity_wasm(expression: &str) -> Result<String, JsValue> {
    serde_json::to_string(&score_complexity(expression))
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize complexity report: {e}")))
}

/// Returns the allow-list as a JSON array of `{"name", "category"}` objects.
///
/// # Errors
///
/// Returns an error if serialization to JSON fails.
#[wasm_bindgen]
pub fn allowed_functions_wasm() -> Result<String, JsValue> {
    let entries: Vec<serde_json::Value> = allowed_functions()
        .iter()
        .map(|(name, category)| serde_json::json!({ "name": name, "category": category }))
        .collect();

    serde_json::to_string(&entries)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize allowed functions: {e}")))
}

/// Initializes the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in WASM
    console_error_panic_hook::set_once();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wasm_safe_function() {
        let f = WasmSafeFunction::new("x^2 + 1");
        assert!(f.is_valid());
        assert!(f.error().is_none());
        assert!((f.evaluate(3.0) - 10.0).abs() < 1e-9);

        let rejected = WasmSafeFunction::new("eval('alert(1)')");
        assert!(!rejected.is_valid());
        assert_eq!(
            rejected.error().as_deref(),
            Some("expression contains a forbidden pattern")
        );
        assert_eq!(rejected.evaluate(3.0), 0.0);
    }

    #[test]
    fn test_validate_wasm() {
        let json = validate_wasm("sin(x)").expect("Failed to validate");
        assert_eq!(json, r#"{"isValid":true,"sanitized":"sin(x)"}"#);

        let json = validate_wasm("alert(x)").expect("Failed to validate");
        assert!(json.contains(r#""isValid":false"#));
        assert!(json.contains(r#""code":"function_not_permitted""#));
    }

    #[test]
    fn test_score_complexity_wasm() {
        let json = score_complexity_wasm("sin(cos(tan(x)))").expect("Failed to score");
        assert!(json.contains(r#""level":"advanced""#));
        assert!(json.contains(r#""score":12"#));
    }

    #[test]
    fn test_allowed_functions_wasm() {
        let json = allowed_functions_wasm().expect("Failed to list functions");
        assert!(json.contains(r#"{"category":"trigonometric","name":"sin"}"#));
    }

    #[test]
    fn test_explain_error_wasm() {
        assert_eq!(explain_error_wasm("unknown"), "unknown");
    }
}
