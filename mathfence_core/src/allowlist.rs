//! Semantic allow-list
//!
//! Every function called by an expression must be listed here. The list is
//! compiled into the binary and can't be extended at runtime.

use serde::Serialize;
use strum::{EnumIter, IntoEnumIterator};

use crate::syntax::Node;

/// Category of an allowed identifier, used when explaining the allow-list.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum FunctionCategory {
    Trigonometric,
    Exponential,
    Rounding,
    Comparison,
    Constant,
}

impl std::fmt::Display for FunctionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trigonometric => write!(f, "trigonometry"),
            Self::Exponential => write!(f, "powers, roots and logarithms"),
            Self::Rounding => write!(f, "rounding and sign"),
            Self::Comparison => write!(f, "comparison"),
            Self::Constant => write!(f, "constants"),
        }
    }
}

const ALLOWED: &[(&str, FunctionCategory)] = &[
    ("sin", FunctionCategory::Trigonometric),
    ("cos", FunctionCategory::Trigonometric),
    ("tan", FunctionCategory::Trigonometric),
    ("asin", FunctionCategory::Trigonometric),
    ("acos", FunctionCategory::Trigonometric),
    ("atan", FunctionCategory::Trigonometric),
    ("atan2", FunctionCategory::Trigonometric),
    ("sinh", FunctionCategory::Trigonometric),
    ("cosh", FunctionCategory::Trigonometric),
    ("tanh", FunctionCategory::Trigonometric),
    ("sec", FunctionCategory::Trigonometric),
    ("csc", FunctionCategory::Trigonometric),
    ("cot", FunctionCategory::Trigonometric),
    ("exp", FunctionCategory::Exponential),
    ("log", FunctionCategory::Exponential),
    ("ln", FunctionCategory::Exponential),
    ("log10", FunctionCategory::Exponential),
    ("log2", FunctionCategory::Exponential),
    ("sqrt", FunctionCategory::Exponential),
    ("cbrt", FunctionCategory::Exponential),
    ("pow", FunctionCategory::Exponential),
    ("abs", FunctionCategory::Rounding),
    ("sign", FunctionCategory::Rounding),
    ("round", FunctionCategory::Rounding),
    ("floor", FunctionCategory::Rounding),
    ("ceil", FunctionCategory::Rounding),
    ("trunc", FunctionCategory::Rounding),
    ("min", FunctionCategory::Comparison),
    ("max", FunctionCategory::Comparison),
    ("pi", FunctionCategory::Constant),
    ("e", FunctionCategory::Constant),
];

/// All allowed identifiers with their category, in declaration order.
#[must_use]
pub const fn allowed_functions() -> &'static [(&'static str, FunctionCategory)] {
    ALLOWED
}

/// Names in the given category, in declaration order.
#[must_use]
pub fn names_in(category: FunctionCategory) -> Vec<&'static str> {
    ALLOWED
        .iter()
        .filter(|(_, c)| *c == category)
        .map(|(name, _)| *name)
        .collect()
}

#[must_use]
pub fn is_allowed(name: &str) -> bool {
    ALLOWED.iter().any(|(allowed, _)| *allowed == name)
}

/// Human-readable listing of every category and its members.
#[must_use]
pub fn describe_categories() -> String {
    FunctionCategory::iter()
        .map(|category| format!("{category} ({})", names_in(category).join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Outcome of [`check_allowed`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowCheck {
    pub allowed: bool,
    pub offending_name: Option<String>,
}

/// Statically check that every function called by the tree is allowed.
///
/// Nothing is evaluated. The first offending name in traversal order is
/// reported.
#[must_use]
pub fn check_allowed(node: &Node) -> AllowCheck {
    let mut called = Vec::new();
    node.walk(&mut |n, _| {
        if let Node::Call { name, .. } = n {
            called.push(name.as_str());
        }
    });

    match called.into_iter().find(|name| !is_allowed(name)) {
        Some(name) => AllowCheck {
            allowed: false,
            offending_name: Some(name.to_string()),
        },
        None => AllowCheck {
            allowed: true,
            offending_name: None,
        },
    }
}
