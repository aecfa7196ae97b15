//! Pre-seeded cache installs
//!
//! Helpers that materialize cache entries directly on disk, bypassing the
//! network, so lookup and exec behavior can be tested in isolation.

use std::fs;
use std::path::{Path, PathBuf};

/// Completion sentinel written by a successful commit.
pub const SENTINEL_FILE: &str = ".install-ok";

/// Create a fully-committed install for `version` under `cache_root`.
///
/// Writes `bin/go` with the given script body plus the completion sentinel,
/// so lookups report the version ready without any network work. Returns the
/// install directory.
pub fn seed_ready_install(cache_root: &Path, version: &str, script: &str) -> PathBuf {
    let install_dir = cache_root.join(version);
    let bin_dir = install_dir.join("bin");
    fs::create_dir_all(&bin_dir).unwrap();

    let binary = bin_dir.join(binary_file_name());
    fs::write(&binary, script).unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&binary).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&binary, perms).unwrap();
    }

    fs::write(install_dir.join(SENTINEL_FILE), b"").unwrap();

    install_dir
}

/// Create a leftover partial install: the directory exists but the sentinel
/// was never written.
pub fn seed_partial_install(cache_root: &Path, version: &str) -> PathBuf {
    let install_dir = cache_root.join(version);
    fs::create_dir_all(install_dir.join("bin")).unwrap();
    fs::write(install_dir.join("bin").join("go.partial"), b"partial").unwrap();
    install_dir
}

fn binary_file_name() -> &'static str {
    if cfg!(windows) { "go.exe" } else { "go" }
}
