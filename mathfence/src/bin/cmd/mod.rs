pub mod check_cmd;
pub mod completions_cmd;
pub mod config_cmd;
pub mod default;
pub mod eval_cmd;
pub mod functions_cmd;
pub mod patterns_cmd;
pub mod score_cmd;
pub mod table_cmd;

use mathfence::error::Result;
use mathfence::{CmdExit, OutputFormat};
use mathfence_core::Rejection;
use serde::Serialize;

/// Pretty JSON rendering shared by every command supporting `--output json`.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Fixed-decimal rendering of an evaluated value.
pub fn format_number(value: f64, precision: usize) -> String {
    format!("{value:.precision$}")
}

/// Exit for an expression the sandbox refused. Text output shows guidance
/// only; JSON output carries the raw rejection.
pub fn rejected(rejection: &Rejection, output: OutputFormat) -> Result<CmdExit> {
    let message = match output {
        OutputFormat::Text => rejection.explain(),
        OutputFormat::Json => to_json(&serde_json::json!({
            "isValid": false,
            "error": rejection,
            "explanation": rejection.explain(),
        }))?,
    };
    Ok(CmdExit::fail(exitcode::DATAERR, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_precision() {
        assert_eq!(format_number(10.0, 2), "10.00");
        assert_eq!(format_number(1.0 / 3.0, 4), "0.3333");
    }

    #[test]
    fn rejected_text_shows_explanation() {
        let exit = rejected(&Rejection::Empty, OutputFormat::Text).expect("renders");
        assert_eq!(exit.code, exitcode::DATAERR);
        assert_eq!(
            exit.message.as_deref(),
            Some("Type an expression to get started, for example x^2 + 1.")
        );
    }

    #[test]
    fn rejected_json_carries_the_reason() {
        let exit = rejected(&Rejection::Empty, OutputFormat::Json).expect("renders");
        let message = exit.message.expect("message is set");
        assert!(message.contains(r#""code": "empty""#), "{message}");
        assert!(message.contains(r#""isValid": false"#), "{message}");
    }
}
