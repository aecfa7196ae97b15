//! Launching the pinned toolchain
//!
//! Once a version is ready the real binary is spawned with inherited stdio
//! and the full environment, plus `GOROOT` pointing at the install tree so
//! the toolchain finds its own root. The child's termination maps onto this
//! process's exit code deterministically: a normal exit is mirrored exactly;
//! death by signal is reported distinctly (diagnostic plus `128 + signal`).

use crate::acquire::Acquirer;
use crate::version::VersionId;
use gopin_core::{GopinError, Result};
use std::ffi::OsString;
use std::process::Command;

/// The single recognized pseudo-subcommand: acquire without executing.
pub const DOWNLOAD_SUBCOMMAND: &str = "download";

/// Outcome of a launcher invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Acquisition-only invocation; nothing was executed.
    Downloaded,
    /// The child exited normally with this code.
    Exited(i32),
    /// The child was terminated by a signal (Unix only).
    Signaled(i32),
}

impl RunOutcome {
    /// Exit code this process should terminate with.
    pub fn exit_code(self) -> i32 {
        match self {
            RunOutcome::Downloaded => 0,
            RunOutcome::Exited(code) => code,
            RunOutcome::Signaled(signal) => 128 + signal,
        }
    }
}

/// Run `version` with the given arguments.
///
/// A sole `download` argument acquires the version and returns without
/// executing, even when already ready. Anything else is forwarded verbatim
/// to the real binary after acquire-if-needed; stdio is inherited unmodified
/// so on success the output is indistinguishable from running the toolchain
/// directly.
pub fn run(acquirer: &Acquirer, version: &VersionId, args: &[OsString]) -> Result<RunOutcome> {
    if args.len() == 1 && args[0] == DOWNLOAD_SUBCOMMAND {
        acquirer.acquire(version)?;
        return Ok(RunOutcome::Downloaded);
    }

    let entry = acquirer.acquire(version)?;
    let binary = acquirer.store().binary_path(version);

    let status = Command::new(&binary)
        .args(args)
        .env("GOROOT", &entry.install_dir)
        .status()
        .map_err(|e| GopinError::ExecFailed(format!("launching {}: {}", binary.display(), e)))?;

    if let Some(code) = status.code() {
        return Ok(RunOutcome::Exited(code));
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Ok(RunOutcome::Signaled(signal));
        }
    }

    Err(GopinError::ExecFailed(format!(
        "{} terminated without an exit status",
        binary.display()
    )))
}
