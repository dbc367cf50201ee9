//! Homebrew content forge CLI.

use std::io::{self, Write};

use clap::Parser;

use forge_cli::cli::{Cli, Command};
use forge_cli::commands::{
    run_delete, run_export, run_formats, run_list, run_lookup, run_new, run_set, run_show,
    run_validate,
};
use forge_cli::config::Settings;
use forge_cli::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(error) => {
            tracing::error!("{error:#}");
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Dispatch the command. `Ok(false)` means it ran but found problems.
fn run(cli: &Cli) -> anyhow::Result<bool> {
    let settings = Settings::load(cli.config.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let passed = match &cli.command {
        Command::New(args) => run_new(&settings, args, &mut out).map(|()| true)?,
        Command::Show(args) => run_show(&settings, args, &mut out).map(|()| true)?,
        Command::List(args) => run_list(&settings, args, &mut out).map(|()| true)?,
        Command::Validate(args) => run_validate(&settings, args, &mut out)?,
        Command::Set(args) => run_set(&settings, args, &mut out).map(|()| true)?,
        Command::Delete(args) => run_delete(&settings, args, &mut out).map(|()| true)?,
        Command::Export(args) => run_export(&settings, args, &mut out).map(|()| true)?,
        Command::Formats => run_formats(&mut out).map(|()| true)?,
        Command::Lookup(args) => run_lookup(&settings, args, &mut out).map(|()| true)?,
    };
    out.flush()?;
    Ok(passed)
}
