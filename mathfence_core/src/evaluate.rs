//! Safe evaluator
//!
//! A [`SafeFunction`] is built once from an untrusted expression and can then
//! be evaluated any number of times. The validated tree is compiled into an
//! [`evalexpr`] operator tree with float literals; each evaluation binds `x`,
//! the named constants and the allow-listed functions the expression calls in
//! a fresh [`HashMapContext`]. Nothing escapes [`SafeFunction::evaluate`] but
//! a finite number.

use std::f64::consts;
use std::sync::Arc;

use evalexpr::{
    ContextWithMutableFunctions, ContextWithMutableVariables, EvalexprError, EvalexprResult,
    Function, HashMapContext, Node as Program, Value,
};
use serde::Serialize;
use tracing::trace;

use crate::allowlist::allowed_functions;
use crate::errors::EvalError;
use crate::syntax::Node;
use crate::validate::{analyze, Rejection};

/// Name of the single free variable.
pub const VARIABLE: &str = "x";

/// Value returned by every failed or undefined evaluation.
pub const FALLBACK: f64 = 0.0;

/// Named constants bound as variables in every evaluation context.
const CONSTANTS: &[(&str, f64)] = &[("pi", consts::PI), ("e", consts::E)];

/// A callable built from a validated expression.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeFunction {
    is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<Rejection>,
    expression: String,
    #[serde(skip)]
    compiled: Option<Arc<Compiled>>,
}

#[derive(Debug)]
struct Compiled {
    ast: Node,
    program: Program,
    functions: Vec<&'static str>,
}

impl Compiled {
    fn new(ast: Node) -> crate::Result<Self> {
        let program = evalexpr::build_operator_tree(&ast.to_float_source())?;

        let mut called = Vec::new();
        ast.walk(&mut |n, _| {
            if let Node::Call { name, .. } = n {
                called.push(name.as_str());
            }
        });
        let functions = allowed_functions()
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| called.contains(name))
            .collect();

        Ok(Self {
            ast,
            program,
            functions,
        })
    }

    fn run(&self, x: f64) -> EvalexprResult<f64> {
        let context = scope(x, &self.functions)?;
        self.program.eval_number_with_context(&context)
    }
}

/// Build a [`SafeFunction`] from an untrusted expression.
///
/// The expression is validated once here. An invalid expression still
/// produces a function; it evaluates to [`FALLBACK`] everywhere and carries
/// the rejection.
#[must_use]
pub fn make_safe_function(expression: &str) -> SafeFunction {
    let compiled = analyze(expression).and_then(|analysis| {
        let sanitized = analysis.sanitized;
        Compiled::new(analysis.ast)
            .map(|compiled| (sanitized, compiled))
            .map_err(|err| Rejection::Malformed {
                detail: err.to_string(),
            })
    });

    match compiled {
        Ok((sanitized, compiled)) => SafeFunction {
            is_valid: true,
            error: None,
            expression: sanitized,
            compiled: Some(Arc::new(compiled)),
        },
        Err(rejection) => SafeFunction {
            is_valid: false,
            error: Some(rejection),
            expression: expression.to_string(),
            compiled: None,
        },
    }
}

impl SafeFunction {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }

    #[must_use]
    pub const fn error(&self) -> Option<&Rejection> {
        self.error.as_ref()
    }

    /// The sanitized expression when valid, the raw input otherwise.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Parsed tree, present only when valid.
    #[must_use]
    pub fn tree(&self) -> Option<&Node> {
        self.compiled.as_deref().map(|compiled| &compiled.ast)
    }

    /// Evaluate at `x`.
    ///
    /// Always returns a finite number. Non-finite input, evaluation errors,
    /// boolean results and non-finite results all yield [`FALLBACK`].
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        let Some(compiled) = self.compiled.as_deref() else {
            return FALLBACK;
        };
        if !x.is_finite() {
            return FALLBACK;
        }

        match compiled.run(x) {
            Ok(y) if y.is_finite() => y,
            Ok(y) => {
                trace!(x, y, "non-finite result replaced by fallback");
                FALLBACK
            }
            Err(err) => {
                trace!(x, error = %err, "evaluation failed");
                FALLBACK
            }
        }
    }

    /// Evaluate over `steps` evenly spaced points from `from` to `to`, both ends
    /// included.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn sample(&self, from: f64, to: f64, steps: usize) -> Vec<(f64, f64)> {
        match steps {
            0 => Vec::new(),
            1 => vec![(from, self.evaluate(from))],
            _ => {
                let step = (to - from) / (steps - 1) as f64;
                (0..steps)
                    .map(|i| {
                        let x = if i == steps - 1 {
                            to
                        } else {
                            from + step * i as f64
                        };
                        (x, self.evaluate(x))
                    })
                    .collect()
            }
        }
    }
}

/// Evaluation context binding `x`, the named constants and `functions`.
fn scope(x: f64, functions: &[&'static str]) -> EvalexprResult<HashMapContext> {
    let mut context = HashMapContext::new();
    context.set_value(VARIABLE.to_string(), Value::Float(x))?;
    for (name, value) in CONSTANTS {
        context.set_value((*name).to_string(), Value::Float(*value))?;
    }
    for &name in functions {
        context.set_function(
            name.to_string(),
            Function::new(move |argument: &Value| call(name, argument)),
        )?;
    }
    Ok(context)
}

/// Entry point of a registered function. evalexpr hands over no argument as
/// `Empty`, several as a `Tuple`.
fn call(name: &str, argument: &Value) -> EvalexprResult<Value> {
    arguments(argument)
        .and_then(|args| apply(name, &args))
        .map(Value::Float)
        .map_err(|err| EvalexprError::CustomMessage(err.to_string()))
}

fn arguments(argument: &Value) -> Result<Vec<f64>, EvalError> {
    match argument {
        Value::Empty => Ok(Vec::new()),
        Value::Tuple(items) => items.iter().map(number).collect(),
        single => Ok(vec![number(single)?]),
    }
}

fn number(value: &Value) -> Result<f64, EvalError> {
    value.as_number().map_err(|_| EvalError::NonNumeric)
}

fn arity(name: &str, expected: &'static str, got: usize) -> EvalError {
    EvalError::Arity {
        name: name.to_string(),
        expected,
        got,
    }
}

fn nullary(name: &str, args: &[f64], value: f64) -> Result<f64, EvalError> {
    if args.is_empty() {
        Ok(value)
    } else {
        Err(arity(name, "0", args.len()))
    }
}

fn unary(name: &str, args: &[f64]) -> Result<f64, EvalError> {
    match args {
        [value] => Ok(*value),
        _ => Err(arity(name, "1", args.len())),
    }
}

fn binary(name: &str, args: &[f64]) -> Result<(f64, f64), EvalError> {
    match args {
        [lhs, rhs] => Ok((*lhs, *rhs)),
        _ => Err(arity(name, "2", args.len())),
    }
}

fn positive(name: &'static str, input: f64) -> Result<f64, EvalError> {
    if input > 0.0 {
        Ok(input)
    } else {
        Err(EvalError::Domain { name, input })
    }
}

fn non_negative(name: &'static str, input: f64) -> Result<f64, EvalError> {
    if input >= 0.0 {
        Ok(input)
    } else {
        Err(EvalError::Domain { name, input })
    }
}

fn unit_interval(name: &'static str, input: f64) -> Result<f64, EvalError> {
    if (-1.0..=1.0).contains(&input) {
        Ok(input)
    } else {
        Err(EvalError::Domain { name, input })
    }
}

/// Apply an allow-listed function.
fn apply(name: &str, args: &[f64]) -> Result<f64, EvalError> {
    let value = match name {
        "sin" => unary(name, args)?.sin(),
        "cos" => unary(name, args)?.cos(),
        "tan" => unary(name, args)?.tan(),
        "asin" => unit_interval("asin", unary(name, args)?)?.asin(),
        "acos" => unit_interval("acos", unary(name, args)?)?.acos(),
        "atan" => unary(name, args)?.atan(),
        "atan2" => {
            let (y, x) = binary(name, args)?;
            y.atan2(x)
        }
        "sinh" => unary(name, args)?.sinh(),
        "cosh" => unary(name, args)?.cosh(),
        "tanh" => unary(name, args)?.tanh(),
        "sec" => unary(name, args)?.cos().recip(),
        "csc" => unary(name, args)?.sin().recip(),
        "cot" => unary(name, args)?.tan().recip(),
        "exp" => unary(name, args)?.exp(),
        "log" => match args {
            [value] => positive("log", *value)?.ln(),
            [value, base] => positive("log", *value)?.log(positive("log", *base)?),
            _ => return Err(arity(name, "1 or 2", args.len())),
        },
        "ln" => positive("ln", unary(name, args)?)?.ln(),
        "log10" => positive("log10", unary(name, args)?)?.log10(),
        "log2" => positive("log2", unary(name, args)?)?.log2(),
        "sqrt" => non_negative("sqrt", unary(name, args)?)?.sqrt(),
        "cbrt" => unary(name, args)?.cbrt(),
        "pow" => {
            let (base, exponent) = binary(name, args)?;
            base.powf(exponent)
        }
        "abs" => unary(name, args)?.abs(),
        "sign" => {
            let value = unary(name, args)?;
            if value == 0.0 {
                0.0
            } else {
                value.signum()
            }
        }
        "round" => unary(name, args)?.round(),
        "floor" => unary(name, args)?.floor(),
        "ceil" => unary(name, args)?.ceil(),
        "trunc" => unary(name, args)?.trunc(),
        "min" | "max" => {
            let (first, rest) = args
                .split_first()
                .ok_or_else(|| arity(name, "at least 1", 0))?;
            rest.iter().fold(*first, |acc, value| {
                if name == "min" {
                    acc.min(*value)
                } else {
                    acc.max(*value)
                }
            })
        }
        "pi" => nullary(name, args, consts::PI)?,
        "e" => nullary(name, args, consts::E)?,
        _ => {
            return Err(EvalError::UnknownFunction {
                name: name.to_string(),
            })
        }
    };
    Ok(value)
}
