//! Test utilities for gopin
//!
//! This crate provides shared testing utilities used across the gopin
//! workspace: isolated cache environments, fake distribution archives, a
//! mock distribution server, and pre-seeded cache installs.

use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

mod archive;
mod dist;
mod seed;

pub use archive::{fake_dist_archive, fake_dist_tar_gz, fake_dist_zip, fake_go_script, sha256_hex};
pub use dist::mount_dist;
pub use seed::{SENTINEL_FILE, seed_partial_install, seed_ready_install};

/// Static mutex to serialize tests that modify environment variables
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Creates a temporary directory within `.tmp/` at the workspace root
///
/// Centralizes test temporary files in a single gitignored location.
/// The returned `TempDir` cleans up automatically on drop.
pub fn temp_dir_in_workspace() -> TempDir {
    let workspace_root = std::env::current_dir().expect("Failed to get current directory");

    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base).expect("Failed to create .tmp directory");

    TempDir::new_in(&tmp_base).expect("Failed to create temporary directory in .tmp/")
}

/// Run a test with an isolated cache environment
///
/// Points `GOPIN_CACHE_DIR` (and `HOME`, so no per-user default can leak in)
/// at a fresh temporary directory for the duration of the closure, then
/// restores the original values. Tests that touch these variables are
/// serialized through a process-wide mutex.
pub fn with_isolated_cache_env<F, R>(f: F) -> R
where
    F: FnOnce(&Path) -> R,
{
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let original_home = std::env::var_os("HOME");
    let original_cache_dir = std::env::var_os("GOPIN_CACHE_DIR");

    let fake_home = TempDir::new().unwrap();
    let fake_cache = fake_home.path().join("cache").join("gopin");
    std::fs::create_dir_all(&fake_cache).unwrap();

    // SAFETY: ENV_LOCK is held, so no other test mutates the environment
    // concurrently.
    unsafe {
        std::env::set_var("HOME", fake_home.path());
        std::env::set_var("GOPIN_CACHE_DIR", &fake_cache);
    }

    let result = f(fake_cache.as_path());

    // SAFETY: ENV_LOCK is still held.
    unsafe {
        match original_home {
            Some(home) => std::env::set_var("HOME", home),
            None => std::env::remove_var("HOME"),
        }
        match original_cache_dir {
            Some(dir) => std::env::set_var("GOPIN_CACHE_DIR", dir),
            None => std::env::remove_var("GOPIN_CACHE_DIR"),
        }
    }

    result
}

/// Run a test with `GOPIN_CACHE_DIR` unset
///
/// Used to exercise the platform-default cache root path. Serialized through
/// the same mutex as [`with_isolated_cache_env`].
pub fn with_cache_env_cleared<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let original_cache_dir = std::env::var_os("GOPIN_CACHE_DIR");

    // SAFETY: ENV_LOCK is held.
    unsafe {
        std::env::remove_var("GOPIN_CACHE_DIR");
    }

    let result = f();

    // SAFETY: ENV_LOCK is still held.
    unsafe {
        if let Some(dir) = original_cache_dir {
            std::env::set_var("GOPIN_CACHE_DIR", dir);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_in_workspace_creates_in_tmp() {
        let temp = temp_dir_in_workspace();
        let path = temp.path();

        assert!(
            path.to_string_lossy().contains(".tmp"),
            "Path should contain .tmp, got: {}",
            path.display()
        );
        assert!(path.is_dir(), "Path should be a directory");
    }

    #[test]
    fn test_temp_dir_auto_cleanup() {
        let path = {
            let temp = temp_dir_in_workspace();
            let p = temp.path().to_path_buf();
            assert!(p.exists(), "Directory should exist before drop");
            p
        };

        assert!(
            !path.exists(),
            "Directory should not exist after drop: {}",
            path.display()
        );
    }

    #[test]
    fn test_with_isolated_cache_env_sets_and_restores() {
        let original = std::env::var_os("GOPIN_CACHE_DIR");

        with_isolated_cache_env(|cache_dir| {
            assert!(cache_dir.exists(), "Cache directory should exist");
            let env_val = std::env::var("GOPIN_CACHE_DIR").unwrap();
            assert_eq!(
                env_val,
                cache_dir.to_string_lossy(),
                "GOPIN_CACHE_DIR should match provided cache_dir"
            );
        });

        assert_eq!(
            std::env::var_os("GOPIN_CACHE_DIR"),
            original,
            "GOPIN_CACHE_DIR should be restored"
        );
    }

    #[test]
    fn test_with_cache_env_cleared_unsets_variable() {
        with_cache_env_cleared(|| {
            assert!(
                std::env::var_os("GOPIN_CACHE_DIR").is_none(),
                "GOPIN_CACHE_DIR should be unset inside the closure"
            );
        });
    }
}
