use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse embedded forbidden patterns YAML: {source}")]
    PatternLoad {
        #[from]
        source: serde_yaml::Error,
    },

    #[error("could not parse expression: {source}")]
    Parse {
        #[from]
        source: evalexpr::EvalexprError,
    },

    #[error("unsupported syntax: {construct}")]
    UnsupportedSyntax { construct: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures raised while evaluating a parsed expression.
///
/// These never cross the [`crate::SafeFunction::evaluate`] boundary; they are
/// absorbed there and replaced by the fallback value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("unknown function: {name}")]
    UnknownFunction { name: String },

    #[error("function {name} expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: &'static str,
        got: usize,
    },

    #[error("{name} is not defined for {input}")]
    Domain { name: &'static str, input: f64 },

    #[error("expected a number, found a boolean")]
    NonNumeric,
}
