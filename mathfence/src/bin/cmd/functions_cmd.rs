use clap::Command;
use mathfence::error::Result;
use mathfence::{CmdExit, OutputFormat};
use mathfence_core::allowlist::{allowed_functions, names_in};
use mathfence_core::FunctionCategory;
use serde_json::json;
use strum::IntoEnumIterator;

use super::to_json;

pub fn command() -> Command {
    Command::new("functions").about("List the functions and constants expressions may use")
}

pub fn run(output: OutputFormat) -> Result<CmdExit> {
    let message = match output {
        OutputFormat::Text => FunctionCategory::iter()
            .map(|category| format!("{category}: {}", names_in(category).join(", ")))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => to_json(
            &allowed_functions()
                .iter()
                .map(|(name, category)| json!({ "name": name, "category": category }))
                .collect::<Vec<_>>(),
        )?,
    };
    Ok(CmdExit::ok(message))
}
