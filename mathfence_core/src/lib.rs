//! Mathfence Core - Sandbox for untrusted single-variable math expressions
//!
//! Expressions typed by learners are validated in three stages (a lexical
//! filter, a grammar parser and a function allow-list) before they are turned
//! into a [`SafeFunction`] that can be evaluated at any `x`. The crate is
//! platform-agnostic and compiles to WASM with the `wasm` feature.

pub mod allowlist;
pub mod complexity;
pub mod errors;
pub mod evaluate;
pub mod explain;
pub mod filter;
pub mod patterns;
pub mod syntax;
pub mod validate;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use allowlist::{allowed_functions, check_allowed, is_allowed, AllowCheck, FunctionCategory};
pub use complexity::{score_complexity, ComplexityLevel, ComplexityReport};
pub use errors::{Error, EvalError, Result};
pub use evaluate::{make_safe_function, SafeFunction};
pub use explain::explain_error;
pub use filter::MAX_EXPRESSION_LEN;
pub use patterns::{forbidden_patterns, get_all_patterns, ForbiddenPattern};
pub use syntax::{parse, Node, NodeKind, Op};
pub use validate::{validate, Rejection, ValidationResult};
