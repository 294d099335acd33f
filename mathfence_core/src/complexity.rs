//! Complexity scoring
//!
//! Gives learners a rough feel for how involved an expression is. The score
//! is a weighted count over the parsed tree plus the deepest nesting level.

use serde::Serialize;
use strum::EnumIter;

use crate::syntax::{Node, NodeKind};
use crate::validate::analyze;

const CALL_WEIGHT: u32 = 3;
const OPERATOR_WEIGHT: u32 = 2;
const GROUP_WEIGHT: u32 = 1;

const BASIC_MAX: u32 = 3;
const INTERMEDIATE_MAX: u32 = 7;

/// Feedback given when the expression could not be analyzed.
pub const UNSCORED_FEEDBACK: &str = "could not be evaluated";

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Basic,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

impl ComplexityLevel {
    const fn from_score(score: u32) -> Self {
        if score <= BASIC_MAX {
            Self::Basic
        } else if score <= INTERMEDIATE_MAX {
            Self::Intermediate
        } else {
            Self::Advanced
        }
    }

    #[must_use]
    pub const fn feedback(self) -> &'static str {
        match self {
            Self::Basic => "A simple expression. Try wrapping it in a function like sin or sqrt.",
            Self::Intermediate => {
                "Nice work combining operations. Nesting functions will take it further."
            }
            Self::Advanced => "An advanced expression with nested functions. Impressive!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexityReport {
    pub level: ComplexityLevel,
    pub score: u32,
    pub feedback: String,
}

impl ComplexityReport {
    fn unscored() -> Self {
        Self {
            level: ComplexityLevel::Basic,
            score: 0,
            feedback: UNSCORED_FEEDBACK.to_string(),
        }
    }
}

/// Score the complexity of an untrusted expression.
///
/// The expression goes through the same validation as [`crate::validate`];
/// anything that does not validate scores 0.
#[must_use]
pub fn score_complexity(expression: &str) -> ComplexityReport {
    analyze(expression).map_or_else(
        |_| ComplexityReport::unscored(),
        |analysis| {
            let score = score_tree(&analysis.ast);
            let level = ComplexityLevel::from_score(score);
            ComplexityReport {
                level,
                score,
                feedback: level.feedback().to_string(),
            }
        },
    )
}

/// Weighted node count plus the maximum call/parenthesis nesting depth.
#[must_use]
pub fn score_tree(node: &Node) -> u32 {
    let mut score = 0;
    let mut max_depth = 0;
    node.walk(&mut |n, depth| {
        score += match n.kind() {
            NodeKind::FunctionCall => CALL_WEIGHT,
            NodeKind::Operator => OPERATOR_WEIGHT,
            NodeKind::Parenthesis => GROUP_WEIGHT,
            NodeKind::Symbol | NodeKind::Literal => 0,
        };
        if matches!(n.kind(), NodeKind::FunctionCall | NodeKind::Parenthesis) {
            max_depth = max_depth.max(depth + 1);
        }
    });
    score + u32::try_from(max_depth).unwrap_or(u32::MAX)
}
