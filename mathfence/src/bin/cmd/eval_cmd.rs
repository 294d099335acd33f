use clap::{Arg, ArgAction, ArgMatches, Command};
use mathfence::error::Result;
use mathfence::{CmdExit, OutputFormat, Settings};
use mathfence_core::make_safe_function;
use serde_json::json;

use super::default::expression_arg;
use super::{format_number, rejected, to_json};

pub fn command() -> Command {
    Command::new("eval")
        .about("Evaluate an expression at one or more values of x")
        .arg(expression_arg())
        .arg(
            Arg::new("x")
                .short('x')
                .help("Value of x (repeatable)")
                .value_name("VALUE")
                .value_parser(clap::value_parser!(f64))
                .allow_negative_numbers(true)
                .action(ArgAction::Append)
                .required(true),
        )
}

pub fn run(matches: &ArgMatches, settings: &Settings, output: OutputFormat) -> Result<CmdExit> {
    let expression = matches
        .get_one::<String>("expression")
        .map_or("", String::as_str);
    let points: Vec<f64> = matches
        .get_many::<f64>("x")
        .map_or_else(Vec::new, |values| values.copied().collect());
    run_eval(expression, &points, settings.precision, output)
}

pub fn run_eval(
    expression: &str,
    points: &[f64],
    precision: usize,
    output: OutputFormat,
) -> Result<CmdExit> {
    let function = make_safe_function(expression);
    if let Some(rejection) = function.error() {
        return rejected(rejection, output);
    }

    let message = match output {
        OutputFormat::Text => points
            .iter()
            .map(|x| format!("f({x}) = {}", format_number(function.evaluate(*x), precision)))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => to_json(
            &points
                .iter()
                .map(|x| json!({ "x": x, "y": function.evaluate(*x) }))
                .collect::<Vec<_>>(),
        )?,
    };
    Ok(CmdExit::ok(message))
}
