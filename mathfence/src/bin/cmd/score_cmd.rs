use clap::{ArgMatches, Command};
use mathfence::error::Result;
use mathfence::{CmdExit, OutputFormat};
use mathfence_core::score_complexity;

use super::default::expression_arg;
use super::to_json;

pub fn command() -> Command {
    Command::new("score")
        .about("Rate how complex an expression is")
        .arg(expression_arg())
}

pub fn run(matches: &ArgMatches, output: OutputFormat) -> Result<CmdExit> {
    let expression = matches
        .get_one::<String>("expression")
        .map_or("", String::as_str);
    run_score(expression, output)
}

pub fn run_score(expression: &str, output: OutputFormat) -> Result<CmdExit> {
    let report = score_complexity(expression);
    let message = match output {
        OutputFormat::Text => format!(
            "level: {}\nscore: {}\n{}",
            report.level, report.score, report.feedback
        ),
        OutputFormat::Json => to_json(&report)?,
    };
    Ok(CmdExit::ok(message))
}

#[cfg(test)]
mod test_score_cli_command {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn can_score_expression() {
        let exit = run_score("sin(cos(tan(x)))", OutputFormat::Text).expect("score runs");
        assert_snapshot!(exit.message.unwrap_or_default(), @r"
        level: advanced
        score: 12
        An advanced expression with nested functions. Impressive!
        ");
    }

    #[test]
    fn unscored_expression() {
        let exit = run_score("", OutputFormat::Text).expect("score runs");
        assert_snapshot!(exit.message.unwrap_or_default(), @r"
        level: basic
        score: 0
        could not be evaluated
        ");
    }

    #[test]
    fn can_score_expression_as_json() {
        let exit = run_score("x", OutputFormat::Json).expect("score runs");
        let value: serde_json::Value =
            serde_json::from_str(&exit.message.unwrap_or_default()).expect("valid json");
        assert_eq!(value["level"], "basic");
        assert_eq!(value["score"], 0);
    }
}
