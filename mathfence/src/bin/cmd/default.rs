use clap::{crate_version, Arg, Command};

pub const LOG_LEVELS: [&str; 6] = ["off", "trace", "debug", "info", "warn", "error"];

pub fn command() -> Command {
    Command::new("mathfence")
        .version(crate_version!())
        .about("Validate, evaluate and score untrusted single-variable math expressions")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log")
                .long("log")
                .help("Set logging level (overrides MATHFENCE_LOG, default: warn)")
                .value_name("LEVEL")
                .value_parser(LOG_LEVELS)
                .ignore_case(true)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Configuration folder (default: the user config dir)")
                .value_name("DIR")
                .global(true),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .help("Output format (default: from settings)")
                .value_name("FORMAT")
                .value_parser(["text", "json"])
                .global(true),
        )
}

/// Shared `--expression` argument.
pub fn expression_arg() -> Arg {
    Arg::new("expression")
        .short('e')
        .long("expression")
        .help("Expression in the variable x, e.g. \"x^2 + 1\"")
        .value_name("EXPR")
        .allow_hyphen_values(true)
        .required(true)
}
