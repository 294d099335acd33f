use clap::{ArgMatches, Command};
use mathfence::error::Result;
use mathfence::{CmdExit, Config};

pub fn command() -> Command {
    Command::new("config")
        .about("Manage mathfence configuration")
        .subcommand_required(true)
        .subcommand(Command::new("show").about("Show current configuration"))
        .subcommand(Command::new("reset").about("Reset configuration to defaults"))
}

pub fn run(matches: &ArgMatches, config: &Config) -> Result<CmdExit> {
    match matches.subcommand() {
        Some(("show", _)) => run_show(config),
        Some(("reset", _)) => Ok(run_reset(config)),
        _ => unreachable!(),
    }
}

pub fn run_show(config: &Config) -> Result<CmdExit> {
    // parse first so a broken file is reported instead of echoed
    config.get_settings_from_file()?;
    let content = config.read_config_file()?;
    Ok(CmdExit::ok(format!(
        "# {}\n{}",
        config.setting_file_path.display(),
        content.trim_end()
    )))
}

pub fn run_reset(config: &Config) -> CmdExit {
    match config.reset_config() {
        Ok(Some(backup)) => CmdExit::ok(format!(
            "mathfence configuration reset successfully (previous settings saved to {})",
            backup.display()
        )),
        Ok(None) => CmdExit::ok("mathfence configuration reset successfully"),
        Err(e) => CmdExit::fail(exitcode::CONFIG, format!("reset settings error: {e}")),
    }
}
