use clap::{ArgMatches, Command};
use mathfence::error::Result;
use mathfence::{CmdExit, OutputFormat};
use mathfence_core::validate;

use super::default::expression_arg;
use super::{rejected, to_json};

pub fn command() -> Command {
    Command::new("check")
        .about("Check whether an expression is accepted by the sandbox")
        .arg(expression_arg())
}

pub fn run(matches: &ArgMatches, output: OutputFormat) -> Result<CmdExit> {
    let expression = matches
        .get_one::<String>("expression")
        .map_or("", String::as_str);
    run_check(expression, output)
}

pub fn run_check(expression: &str, output: OutputFormat) -> Result<CmdExit> {
    let result = validate(expression);

    if let (OutputFormat::Json, true) = (output, result.is_valid()) {
        return Ok(CmdExit::ok(to_json(&result)?));
    }

    match (result.error(), result.sanitized()) {
        (Some(rejection), _) => rejected(rejection, output),
        (None, Some(sanitized)) => Ok(CmdExit::ok(format!("valid: {sanitized}"))),
        (None, None) => Ok(CmdExit::ok("valid")),
    }
}
