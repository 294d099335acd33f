mod cmd;

use console::{style, Style};
use mathfence::{CmdExit, Config, OutputFormat, Settings};
use std::process::exit;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_ERR_EXIT_CODE: i32 = 1;
const DEFAULT_LOG_LEVEL: &str = "warn";
const LOG_ENV: &str = "MATHFENCE_LOG";

fn main() {
    let app = cmd::default::command()
        .subcommand(cmd::check_cmd::command())
        .subcommand(cmd::eval_cmd::command())
        .subcommand(cmd::table_cmd::command())
        .subcommand(cmd::score_cmd::command())
        .subcommand(cmd::functions_cmd::command())
        .subcommand(cmd::patterns_cmd::command())
        .subcommand(cmd::config_cmd::command())
        .subcommand(cmd::completions_cmd::command());

    let matches = app.clone().get_matches();

    init_logging(matches.get_one::<String>("log").map(String::as_str));

    if let Some(("completions", subcommand_matches)) = matches.subcommand() {
        let mut app = app;
        print_and_exit(cmd::completions_cmd::run(subcommand_matches, &mut app));
    }

    let config = match Config::new(matches.get_one::<String>("config").map(String::as_str)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Loading config error: {err}");
            exit(exitcode::CONFIG)
        }
    };

    if let Some(("config", subcommand_matches)) = matches.subcommand() {
        finish(cmd::config_cmd::run(subcommand_matches, &config));
    }

    let settings = load_settings(&config);
    let output = matches
        .get_one::<String>("output")
        .map_or(settings.output, |name| OutputFormat::from_name(name));
    debug!(?output, "output format selected");

    let res = match matches.subcommand() {
        Some(("check", subcommand_matches)) => cmd::check_cmd::run(subcommand_matches, output),
        Some(("eval", subcommand_matches)) => {
            cmd::eval_cmd::run(subcommand_matches, &settings, output)
        }
        Some(("table", subcommand_matches)) => {
            cmd::table_cmd::run(subcommand_matches, &settings, output)
        }
        Some(("score", subcommand_matches)) => cmd::score_cmd::run(subcommand_matches, output),
        Some(("functions", _)) => cmd::functions_cmd::run(output),
        Some(("patterns", subcommand_matches)) => {
            cmd::patterns_cmd::run(subcommand_matches, output)
        }
        _ => unreachable!(),
    };

    finish(res);
}

fn init_logging(level: Option<&str>) {
    let filter = level.map_or_else(
        || EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        EnvFilter::new,
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(config: &Config) -> Settings {
    match config.get_settings_from_file() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!(
                "Could not load config from file. Try resolving by running `{}`\nError: {e}",
                style("mathfence config reset").bold().italic().underlined(),
            );
            exit(exitcode::CONFIG)
        }
    }
}

fn finish(res: mathfence::error::Result<CmdExit>) -> ! {
    match res {
        Ok(cmd) => print_and_exit(cmd),
        Err(e) => {
            debug!("{e:?}");
            eprintln!("{}", Style::new().for_stderr().red().apply_to(e));
            exit(DEFAULT_ERR_EXIT_CODE)
        }
    }
}

fn print_and_exit(cmd: CmdExit) -> ! {
    if let Some(message) = cmd.message {
        if exitcode::is_success(cmd.code) {
            println!("{}", Style::new().green().apply_to(message));
        } else {
            eprintln!("{}", Style::new().for_stderr().red().apply_to(message));
        }
    }
    exit(cmd.code)
}
