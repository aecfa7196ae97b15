mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use gopin_toolchain::VersionId;
use std::ffi::{OsStr, OsString};
use std::path::Path;

fn main() {
    // A front-end named like a version ("go1.19.5", usually a link to this
    // binary) is that version's stub: everything after the program name is
    // forwarded untouched, so `go1.19.5 --version` reaches the toolchain.
    let mut argv = std::env::args_os();
    let program = argv.next().unwrap_or_default();
    if let Some(version) = stub_version(&program) {
        let args: Vec<OsString> = argv.collect();
        std::process::exit(commands::run::launch(&version, &args));
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Download { version } => {
            commands::download::execute(&version, cli.verbose).map(|()| 0)
        }
        Commands::Run { version, args } => commands::run::execute(&version, &args),
        Commands::List { json } => commands::list::execute(json, cli.verbose).map(|()| 0),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Interpret the program name as a version stub, if it parses as one.
fn stub_version(program: &OsStr) -> Option<VersionId> {
    let name = Path::new(program).file_name()?.to_str()?;
    let name = name.strip_suffix(".exe").unwrap_or(name);
    VersionId::parse(name).ok()
}
