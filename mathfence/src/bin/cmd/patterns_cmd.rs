use clap::{Arg, ArgMatches, Command};
use mathfence::error::Result;
use mathfence::{CmdExit, OutputFormat};
use mathfence_core::patterns::{forbidden_patterns, groups, ForbiddenPattern};

use super::to_json;

pub fn command() -> Command {
    Command::new("patterns")
        .about("List the forbidden patterns rejected before parsing")
        .arg(
            Arg::new("group")
                .short('g')
                .long("group")
                .help("Only list patterns of this group"),
        )
}

pub fn run(matches: &ArgMatches, output: OutputFormat) -> Result<CmdExit> {
    let group = matches.get_one::<String>("group").map(String::as_str);
    run_patterns(forbidden_patterns(), group, output)
}

pub fn run_patterns(
    patterns: &[ForbiddenPattern],
    group: Option<&str>,
    output: OutputFormat,
) -> Result<CmdExit> {
    let known_groups = groups(patterns);
    if let Some(group) = group {
        if !known_groups.contains(&group) {
            return Ok(CmdExit::fail(
                exitcode::USAGE,
                format!(
                    "Unknown group: {group}. Available groups: {}",
                    known_groups.join(", ")
                ),
            ));
        }
    }

    let selected: Vec<&ForbiddenPattern> = patterns
        .iter()
        .filter(|p| group.is_none_or(|g| p.from == g))
        .collect();

    let message = match output {
        OutputFormat::Text => selected
            .iter()
            .map(|p| format!("{}: {}", p.id, p.description))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => to_json(&selected)?,
    };
    Ok(CmdExit::ok(message))
}

#[cfg(test)]
mod test_patterns_cli_command {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn can_list_group() {
        let exit = run_patterns(forbidden_patterns(), Some("scheme"), OutputFormat::Text)
            .expect("patterns runs");
        assert_snapshot!(exit.message.unwrap_or_default(), @r"
        scheme:javascript: Contains a script URI scheme
        scheme:vbscript: Contains a script URI scheme
        scheme:data: Contains a data URI scheme
        ");
    }

    #[test]
    fn lists_every_pattern_without_group() {
        let exit =
            run_patterns(forbidden_patterns(), None, OutputFormat::Text).expect("patterns runs");
        assert_eq!(
            exit.message.unwrap_or_default().lines().count(),
            forbidden_patterns().len()
        );
    }

    #[test]
    fn unknown_group_is_a_usage_error() {
        let exit = run_patterns(forbidden_patterns(), Some("nope"), OutputFormat::Text)
            .expect("patterns runs");
        assert_eq!(exit.code, exitcode::USAGE);
        assert_eq!(
            exit.message.as_deref(),
            Some("Unknown group: nope. Available groups: execution, markup, reflection, scheme, template")
        );
    }

    #[test]
    fn can_list_group_as_json() {
        let exit = run_patterns(forbidden_patterns(), Some("template"), OutputFormat::Json)
            .expect("patterns runs");
        let value: serde_json::Value =
            serde_json::from_str(&exit.message.unwrap_or_default()).expect("valid json");
        assert_eq!(value[0]["id"], "template:interpolation");
        assert_eq!(value[0]["test"], r"\$\{");
    }
}
