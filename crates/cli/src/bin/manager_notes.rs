use anyhow::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    notes_cli::main_entry()
}
