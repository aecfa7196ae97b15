//! Run command - launch a pinned toolchain version, installing on first use

use anyhow::Result;
use gopin_toolchain::{Acquirer, CacheStore, RunOutcome, VersionId};
use std::ffi::OsString;

/// Execute `gopin run <version> [args...]`.
pub fn execute(version: &str, args: &[OsString]) -> Result<i32> {
    let version = VersionId::parse(version)?;
    run_version(&version, args)
}

/// Stub entry point: the program name already named the version.
///
/// Failures print a single-line diagnostic and exit non-zero; a successful
/// exec mirrors the child's exit code exactly.
pub fn launch(version: &VersionId, args: &[OsString]) -> i32 {
    match run_version(version, args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

fn run_version(version: &VersionId, args: &[OsString]) -> Result<i32> {
    let acquirer = Acquirer::new(CacheStore::open_default()?);

    match gopin_toolchain::run(&acquirer, version, args)? {
        RunOutcome::Downloaded => {
            println!("Success. You may now run '{version}'");
            Ok(0)
        }
        RunOutcome::Exited(code) => Ok(code),
        outcome @ RunOutcome::Signaled(signal) => {
            eprintln!("gopin: {version} terminated by signal {signal}");
            Ok(outcome.exit_code())
        }
    }
}
