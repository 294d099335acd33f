use std::io::Write;

use clap::{builder::PossibleValuesParser, Arg, ArgMatches, Command};
use clap_complete::{generate, Shell};
use clap_complete_nushell::Nushell;
use mathfence::CmdExit;
use strum::{EnumString, VariantNames};

/// Shells completions can be generated for. The variant names double as the
/// accepted values of the `shell` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, VariantNames)]
#[strum(serialize_all = "lowercase")]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    Elvish,
    PowerShell,
    Nushell,
}

impl CompletionShell {
    fn write_to(self, app: &mut Command, out: &mut dyn Write) {
        let name = app.get_name().to_string();
        match self {
            Self::Bash => generate(Shell::Bash, app, name, out),
            Self::Zsh => generate(Shell::Zsh, app, name, out),
            Self::Fish => generate(Shell::Fish, app, name, out),
            Self::Elvish => generate(Shell::Elvish, app, name, out),
            Self::PowerShell => generate(Shell::PowerShell, app, name, out),
            Self::Nushell => generate(Nushell, app, name, out),
        }
    }
}

pub fn command() -> Command {
    Command::new("completions")
        .about("Generate shell completion scripts")
        .arg(
            Arg::new("shell")
                .help("Shell to generate completions for")
                .required(true)
                .value_parser(PossibleValuesParser::new(
                    CompletionShell::VARIANTS.iter().copied(),
                )),
        )
}

pub fn run(matches: &ArgMatches, app: &mut Command) -> CmdExit {
    let shell_name = matches
        .get_one::<String>("shell")
        .map_or("", String::as_str);

    match shell_name.parse::<CompletionShell>() {
        Ok(shell) => {
            shell.write_to(app, &mut std::io::stdout());
            CmdExit {
                code: exitcode::OK,
                message: None,
            }
        }
        Err(_) => CmdExit::fail(
            exitcode::USAGE,
            format!(
                "Unsupported shell: {shell_name}. Supported: {}",
                CompletionShell::VARIANTS.join(", ")
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_accepted_shell_generates_a_script() {
        for name in CompletionShell::VARIANTS {
            let shell: CompletionShell = name.parse().expect("variant name parses");
            let mut app = Command::new("mathfence").subcommand(command());
            let mut out = Vec::new();
            shell.write_to(&mut app, &mut out);
            assert!(!out.is_empty(), "{name}");
        }
    }

    #[test]
    fn accepted_values_are_lowercase_names() {
        assert_eq!(
            CompletionShell::VARIANTS,
            &["bash", "zsh", "fish", "elvish", "powershell", "nushell"]
        );
    }

    #[test]
    fn rejects_unknown_shell() {
        let matches = Command::new("completions")
            .arg(Arg::new("shell"))
            .get_matches_from(["completions", "tcsh"]);
        let mut app = Command::new("mathfence");
        let result = run(&matches, &mut app);
        assert_eq!(result.code, exitcode::USAGE);
        assert!(result
            .message
            .is_some_and(|message| message.starts_with("Unsupported shell: tcsh")));
    }
}
