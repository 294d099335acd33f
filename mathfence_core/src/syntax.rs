//! Grammar parser adapter
//!
//! Parsing is delegated to [`evalexpr`]. Its operator tree is converted into
//! the closed [`Node`] type so the rest of the crate matches over a fixed set
//! of node kinds and never sees evalexpr internals.

use std::fmt;

use evalexpr::{Node as OperatorTree, Operator, Value};

use crate::{Error, Result};

/// Operators an expression may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Neg,
    Eq,
    Neq,
    Lt,
    Leq,
    Gt,
    Geq,
    And,
    Or,
    Not,
}

impl Op {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub | Self::Neg => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Pow => "^",
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::Lt => "<",
            Self::Leq => "<=",
            Self::Gt => ">",
            Self::Geq => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::Not => "!",
        }
    }

    #[must_use]
    pub const fn is_unary(self) -> bool {
        matches!(self, Self::Neg | Self::Not)
    }
}

/// Kind of a parsed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    FunctionCall,
    Operator,
    Parenthesis,
    Symbol,
    Literal,
}

/// Abstract syntax tree of a single-variable expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `name(args...)`
    Call { name: String, args: Vec<Node> },
    /// Unary or binary operator application
    Operator { op: Op, operands: Vec<Node> },
    /// Parenthesized sub-expression
    Group(Box<Node>),
    /// Variable or named constant
    Symbol(String),
    /// Numeric literal
    Number(f64),
}

impl Node {
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Call { .. } => NodeKind::FunctionCall,
            Self::Operator { .. } => NodeKind::Operator,
            Self::Group(_) => NodeKind::Parenthesis,
            Self::Symbol(_) => NodeKind::Symbol,
            Self::Number(_) => NodeKind::Literal,
        }
    }

    /// Direct children of this node, left to right.
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        match self {
            Self::Call { args: nodes, .. }
            | Self::Operator {
                operands: nodes, ..
            } => nodes.iter().collect(),
            Self::Group(inner) => vec![inner.as_ref()],
            Self::Symbol(_) | Self::Number(_) => Vec::new(),
        }
    }

    /// Visit every node depth-first, exactly once.
    ///
    /// The visitor receives the nesting depth of the node, i.e. how many
    /// function calls and parenthesis groups enclose it.
    pub fn walk<'a, F: FnMut(&'a Self, usize)>(&'a self, visitor: &mut F) {
        self.walk_at(0, visitor);
    }

    fn walk_at<'a, F: FnMut(&'a Self, usize)>(&'a self, depth: usize, visitor: &mut F) {
        visitor(self, depth);
        let child_depth = match self.kind() {
            NodeKind::FunctionCall | NodeKind::Parenthesis => depth + 1,
            _ => depth,
        };
        for child in self.children() {
            child.walk_at(child_depth, visitor);
        }
    }
}

impl Node {
    /// Source text of the tree with every literal written as a float, so an
    /// evaluator never applies integer arithmetic (`1 / 2` stays `0.5`).
    #[must_use]
    pub fn to_float_source(&self) -> String {
        FloatSource(self).to_string()
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, float_literals: bool) -> fmt::Result {
        match self {
            Self::Call { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    arg.render(f, float_literals)?;
                }
                write!(f, ")")
            }
            Self::Operator { op, operands } => match operands.as_slice() {
                [operand] if op.is_unary() => {
                    write!(f, "{}", op.symbol())?;
                    operand.render(f, float_literals)
                }
                [lhs, rhs] => {
                    lhs.render(f, float_literals)?;
                    write!(f, " {} ", op.symbol())?;
                    rhs.render(f, float_literals)
                }
                _ => write!(f, "<{}>", op.symbol()),
            },
            Self::Group(inner) => {
                write!(f, "(")?;
                inner.render(f, float_literals)?;
                write!(f, ")")
            }
            Self::Symbol(name) => write!(f, "{name}"),
            Self::Number(value) if float_literals && value.fract() == 0.0 => {
                write!(f, "{value:.1}")
            }
            Self::Number(value) => write!(f, "{value}"),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false)
    }
}

struct FloatSource<'a>(&'a Node);

impl fmt::Display for FloatSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.render(f, true)
    }
}

/// Parse an expression into a [`Node`] tree.
///
/// # Errors
/// [`Error::Parse`] when the grammar parser refuses the input, and
/// [`Error::UnsupportedSyntax`] when it parses into a construct outside the
/// supported node kinds (assignments, strings, booleans, tuples, ...).
pub fn parse(expression: &str) -> Result<Node> {
    let tree = evalexpr::build_operator_tree(expression)?;
    match tree.operator() {
        Operator::RootNode => single_child(&tree, "empty expression"),
        _ => convert(&tree),
    }
}

fn unsupported(construct: impl Into<String>) -> Error {
    Error::UnsupportedSyntax {
        construct: construct.into(),
    }
}

fn single_child(root: &OperatorTree, empty: &str) -> Result<Node> {
    match root.children() {
        [only] => convert(only),
        [] => Err(unsupported(empty)),
        _ => Err(unsupported("multiple expressions")),
    }
}

fn convert(tree: &OperatorTree) -> Result<Node> {
    let op = match tree.operator() {
        Operator::RootNode => {
            return Ok(Node::Group(Box::new(single_child(
                tree,
                "empty parentheses",
            )?)))
        }
        Operator::Const { value } => return literal(value),
        Operator::VariableIdentifierRead { identifier } => {
            return Ok(Node::Symbol(identifier.clone()))
        }
        Operator::FunctionIdentifier { identifier } => {
            return Ok(Node::Call {
                name: identifier.clone(),
                args: call_arguments(tree)?,
            })
        }
        Operator::Add => Op::Add,
        Operator::Sub => Op::Sub,
        Operator::Neg => Op::Neg,
        Operator::Mul => Op::Mul,
        Operator::Div => Op::Div,
        Operator::Mod => Op::Rem,
        Operator::Exp => Op::Pow,
        Operator::Eq => Op::Eq,
        Operator::Neq => Op::Neq,
        Operator::Gt => Op::Gt,
        Operator::Lt => Op::Lt,
        Operator::Geq => Op::Geq,
        Operator::Leq => Op::Leq,
        Operator::And => Op::And,
        Operator::Or => Op::Or,
        Operator::Not => Op::Not,
        Operator::Tuple => return Err(unsupported("tuple outside of a function call")),
        Operator::Chain => return Err(unsupported("expression chain")),
        Operator::VariableIdentifierWrite { .. } => return Err(unsupported("assignment")),
        other => return Err(unsupported(format!("{other:?}"))),
    };

    let operands = tree
        .children()
        .iter()
        .map(convert)
        .collect::<Result<Vec<_>>>()?;
    let expected = if op.is_unary() { 1 } else { 2 };
    if operands.len() != expected {
        return Err(unsupported(format!("incomplete '{}' operator", op.symbol())));
    }
    Ok(Node::Operator { op, operands })
}

#[allow(clippy::cast_precision_loss)]
fn literal(value: &Value) -> Result<Node> {
    match value {
        Value::Int(int) => Ok(Node::Number(*int as f64)),
        Value::Float(float) => Ok(Node::Number(*float)),
        Value::String(_) => Err(unsupported("string literal")),
        Value::Boolean(_) => Err(unsupported("boolean literal")),
        _ => Err(unsupported("non-numeric literal")),
    }
}

/// Unwrap the parenthesized argument list of a call and split tuple arguments.
fn call_arguments(call: &OperatorTree) -> Result<Vec<Node>> {
    match call.children() {
        [] => Ok(Vec::new()),
        [argument] => match argument.operator() {
            Operator::RootNode => match argument.children() {
                [] => Ok(Vec::new()),
                [inner] => tuple_items(inner),
                _ => Err(unsupported("multiple expressions")),
            },
            _ => tuple_items(argument),
        },
        _ => Err(unsupported("malformed call")),
    }
}

fn tuple_items(tree: &OperatorTree) -> Result<Vec<Node>> {
    match tree.operator() {
        Operator::Tuple => {
            let mut items = Vec::new();
            for child in tree.children() {
                items.extend(tuple_items(child)?);
            }
            Ok(items)
        }
        _ => Ok(vec![convert(tree)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sym(name: &str) -> Node {
        Node::Symbol(name.to_string())
    }

    fn call(name: &str, args: Vec<Node>) -> Node {
        Node::Call {
            name: name.to_string(),
            args,
        }
    }

    fn binary(op: Op, lhs: Node, rhs: Node) -> Node {
        Node::Operator {
            op,
            operands: vec![lhs, rhs],
        }
    }

    #[test]
    fn can_parse_polynomial() {
        let node = parse("x^2 + 1").expect("valid expression");
        assert_eq!(
            node,
            binary(
                Op::Add,
                binary(Op::Pow, sym("x"), Node::Number(2.0)),
                Node::Number(1.0)
            )
        );
    }

    #[test]
    fn can_parse_nested_calls() {
        let node = parse("sin(cos(x))").expect("valid expression");
        assert_eq!(node, call("sin", vec![call("cos", vec![sym("x")])]));
    }

    #[test]
    fn can_parse_multi_argument_call() {
        let node = parse("max(x, 2, 3)").expect("valid expression");
        assert_eq!(
            node,
            call(
                "max",
                vec![sym("x"), Node::Number(2.0), Node::Number(3.0)]
            )
        );
    }

    #[test]
    fn keeps_parenthesis_groups() {
        let node = parse("(x + 1) * 2").expect("valid expression");
        assert_eq!(
            node,
            binary(
                Op::Mul,
                Node::Group(Box::new(binary(Op::Add, sym("x"), Node::Number(1.0)))),
                Node::Number(2.0)
            )
        );
        assert_eq!(node.to_string(), "(x + 1) * 2");
    }

    #[test]
    fn can_parse_negation() {
        let node = parse("-x").expect("valid expression");
        assert_eq!(
            node,
            Node::Operator {
                op: Op::Neg,
                operands: vec![sym("x")]
            }
        );
        assert_eq!(node.to_string(), "-x");
    }

    #[rstest]
    #[case("1/2 + x", "1.0 / 2.0 + x")]
    #[case("sin(3) * 0.5", "sin(3.0) * 0.5")]
    #[case("-(x - 10)", "-(x - 10.0)")]
    #[case("max(x, 2, 3.25)", "max(x, 2.0, 3.25)")]
    #[case("pi()", "pi()")]
    fn float_source_writes_float_literals(#[case] input: &str, #[case] expected: &str) {
        let node = parse(input).expect("valid expression");
        assert_eq!(node.to_float_source(), expected);
        assert_eq!(parse(expected).expect("reparses"), node);
    }

    #[rstest]
    #[case("(x + 1")]
    #[case("x + 1)")]
    fn rejects_unbalanced_parentheses(#[case] input: &str) {
        assert!(matches!(parse(input), Err(Error::Parse { .. })), "{input}");
    }

    #[rstest]
    #[case("x +")]
    #[case("*")]
    #[case("x * * 2")]
    #[case("sin(")]
    fn rejects_incomplete_expressions(#[case] input: &str) {
        assert!(parse(input).is_err(), "{input}");
    }

    #[rstest]
    #[case("y = 2")]
    #[case("x; 1")]
    #[case("\"text\"")]
    #[case("true")]
    #[case("1, 2")]
    #[case("()")]
    #[case("")]
    fn rejects_unsupported_constructs(#[case] input: &str) {
        assert!(
            matches!(parse(input), Err(Error::UnsupportedSyntax { .. })),
            "{input}: {:?}",
            parse(input)
        );
    }

    #[test]
    fn kinds_cover_closed_set() {
        let node = parse("sin((x + 1)) * 2").expect("valid expression");
        let mut kinds = Vec::new();
        node.walk(&mut |n, _| kinds.push(n.kind()));
        assert!(kinds.contains(&NodeKind::FunctionCall));
        assert!(kinds.contains(&NodeKind::Operator));
        assert!(kinds.contains(&NodeKind::Parenthesis));
        assert!(kinds.contains(&NodeKind::Symbol));
        assert!(kinds.contains(&NodeKind::Literal));
    }

    #[test]
    fn walk_visits_every_node_once_with_depth() {
        let node = parse("sin(cos(x)) + 1").expect("valid expression");
        let mut visited = Vec::new();
        node.walk(&mut |n, depth| visited.push((n.kind(), depth)));
        assert_eq!(
            visited,
            vec![
                (NodeKind::Operator, 0),
                (NodeKind::FunctionCall, 0),
                (NodeKind::FunctionCall, 1),
                (NodeKind::Symbol, 2),
                (NodeKind::Literal, 0),
            ]
        );
    }
}
