use clap::{Arg, ArgMatches, Command};
use mathfence::error::Result;
use mathfence::{CmdExit, OutputFormat, Settings, TableSettings};
use mathfence_core::make_safe_function;
use serde_json::json;

use super::default::expression_arg;
use super::{format_number, rejected, to_json};

pub fn command() -> Command {
    Command::new("table")
        .about("Tabulate an expression over an evenly spaced range of x")
        .arg(expression_arg())
        .arg(
            Arg::new("from")
                .long("from")
                .help("First value of x (default: from settings)")
                .value_parser(clap::value_parser!(f64))
                .allow_negative_numbers(true),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .help("Last value of x (default: from settings)")
                .value_parser(clap::value_parser!(f64))
                .allow_negative_numbers(true),
        )
        .arg(
            Arg::new("steps")
                .long("steps")
                .help("Number of rows (default: from settings)")
                .value_parser(clap::value_parser!(usize)),
        )
}

pub fn run(matches: &ArgMatches, settings: &Settings, output: OutputFormat) -> Result<CmdExit> {
    let expression = matches
        .get_one::<String>("expression")
        .map_or("", String::as_str);
    let range = TableSettings {
        from: matches
            .get_one::<f64>("from")
            .copied()
            .unwrap_or(settings.table.from),
        to: matches
            .get_one::<f64>("to")
            .copied()
            .unwrap_or(settings.table.to),
        steps: matches
            .get_one::<usize>("steps")
            .copied()
            .unwrap_or(settings.table.steps),
    };
    run_table(expression, &range, settings.precision, output)
}

pub fn run_table(
    expression: &str,
    range: &TableSettings,
    precision: usize,
    output: OutputFormat,
) -> Result<CmdExit> {
    let function = make_safe_function(expression);
    if let Some(rejection) = function.error() {
        return rejected(rejection, output);
    }

    let points = function.sample(range.from, range.to, range.steps);
    let message = match output {
        OutputFormat::Text => {
            let rows: Vec<(String, String)> = points
                .iter()
                .map(|(x, y)| (format_number(*x, precision), format_number(*y, precision)))
                .collect();
            let width = rows
                .iter()
                .map(|(x, _)| x.len())
                .max()
                .unwrap_or(0)
                .max(1);
            std::iter::once(format!("{:<width$}  f(x)", "x"))
                .chain(rows.iter().map(|(x, y)| format!("{x:<width$}  {y}")))
                .collect::<Vec<_>>()
                .join("\n")
        }
        OutputFormat::Json => to_json(
            &points
                .iter()
                .map(|(x, y)| json!({ "x": x, "y": y }))
                .collect::<Vec<_>>(),
        )?,
    };
    Ok(CmdExit::ok(message))
}
