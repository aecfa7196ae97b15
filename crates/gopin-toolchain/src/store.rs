//! On-disk cache of installed toolchain versions
//!
//! Layout under the cache root:
//!
//! ```text
//! <root>/
//!   go1.19.5/          fully extracted toolchain tree (bin/, src/, ...)
//!     .install-ok      completion sentinel, written only by commit
//!   go1.18beta1/
//!     ...
//!   .scratch/          private per-attempt work directories
//! ```
//!
//! The only mutation of an install path is a single atomic rename performed
//! by [`CacheStore::commit`], which is the sole cross-process serialization
//! point: no lock files exist, and Ready means fully committed, for every
//! observer, at every instant. The sentinel is placed in the scratch tree
//! immediately before the rename, so a directory carrying it was always
//! published whole.

use crate::platform::binary_name;
use crate::version::VersionId;
use gopin_core::{GopinError, Result};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// Completion sentinel written by a successful commit.
pub const SENTINEL_FILE: &str = ".install-ok";

/// Subdirectory of the cache root holding per-attempt scratch directories.
pub const SCRATCH_DIR: &str = ".scratch";

/// Scratch directories older than this are fair game for the hygiene sweep.
pub const SCRATCH_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// No install directory exists.
    Absent,
    /// Install directory exists and carries the completion sentinel.
    Ready,
    /// Install directory exists without the sentinel: a leftover from an
    /// interrupted or failed attempt. Must be purged before re-acquisition.
    Corrupt,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry {
    pub version: String,
    pub install_dir: PathBuf,
    pub status: CacheStatus,
}

/// Owner of the on-disk cache layout. All mutation of install paths goes
/// through this type.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: PathBuf) -> Self {
        CacheStore { root }
    }

    /// Open the store at the configured cache root (`GOPIN_CACHE_DIR` or the
    /// platform default).
    pub fn open_default() -> Result<Self> {
        Ok(CacheStore::new(gopin_core::path::cache_root()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn install_dir(&self, version: &VersionId) -> PathBuf {
        self.root.join(version.as_str())
    }

    /// Path of the real toolchain binary inside a Ready install.
    pub fn binary_path(&self, version: &VersionId) -> PathBuf {
        self.install_dir(version).join("bin").join(binary_name())
    }

    /// Inspect the on-disk state for `version`. Sentinel probe only; Ready
    /// entries are not re-hashed.
    pub fn lookup(&self, version: &VersionId) -> CacheEntry {
        let install_dir = self.install_dir(version);
        let status = if !install_dir.exists() {
            CacheStatus::Absent
        } else if install_dir.join(SENTINEL_FILE).is_file() {
            CacheStatus::Ready
        } else {
            CacheStatus::Corrupt
        };
        CacheEntry {
            version: version.to_string(),
            install_dir,
            status,
        }
    }

    /// Create a private scratch directory for one acquisition attempt.
    ///
    /// Lives under the cache root so the later commit rename never crosses a
    /// filesystem boundary. Uniquely named per attempt; concurrent attempts
    /// never share one. Removed automatically on drop unless committed away.
    pub fn scratch_dir(&self, version: &VersionId) -> Result<TempDir> {
        let base = self.root.join(SCRATCH_DIR);
        fs::create_dir_all(&base)?;
        let prefix = format!("{version}.");
        let dir = tempfile::Builder::new().prefix(&prefix).tempdir_in(&base)?;
        Ok(dir)
    }

    /// Atomically promote a fully-verified, fully-extracted scratch tree to
    /// the install path.
    ///
    /// The sentinel is written into the scratch tree first, then one rename
    /// publishes the whole tree. Losing the rename race to a concurrent
    /// installer counts as success: the winner's tree is equivalent and the
    /// caller's scratch work is simply discarded.
    pub fn commit(&self, version: &VersionId, scratch_tree: &Path) -> Result<CacheEntry> {
        fs::write(scratch_tree.join(SENTINEL_FILE), b"")?;

        let dest = self.install_dir(version);
        if let Err(rename_err) = fs::rename(scratch_tree, &dest) {
            let entry = self.lookup(version);
            if entry.status == CacheStatus::Ready {
                return Ok(entry);
            }
            return Err(GopinError::CacheCommitFailed(format!(
                "promoting {} to {}: {}",
                scratch_tree.display(),
                dest.display(),
                rename_err
            )));
        }

        Ok(self.lookup(version))
    }

    /// Remove a corrupt entry's directory entirely, returning the version to
    /// absent so acquisition can be retried from scratch.
    pub fn purge(&self, version: &VersionId) -> Result<()> {
        match fs::remove_dir_all(self.install_dir(version)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort removal of scratch directories left behind by interrupted
    /// attempts. Correctness never depends on this; it is disk hygiene only.
    pub fn sweep_stale_scratch(&self, max_age: Duration) {
        let Ok(entries) = fs::read_dir(self.root.join(SCRATCH_DIR)) else {
            return;
        };
        for entry in entries.flatten() {
            let Ok(meta) = entry.metadata() else { continue };
            let Ok(modified) = meta.modified() else { continue };
            let Ok(age) = modified.elapsed() else { continue };
            if age >= max_age {
                let _ = fs::remove_dir_all(entry.path());
            }
        }
    }

    /// All version entries currently on disk, ready or not, sorted by name.
    pub fn entries(&self) -> Result<Vec<CacheEntry>> {
        let mut out = Vec::new();
        let entries = match fs::read_dir(&self.root) {
            Ok(e) => e,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(out),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Ok(version) = VersionId::parse(name) else {
                continue;
            };
            out.push(self.lookup(&version));
        }
        out.sort_by(|a, b| a.version.cmp(&b.version));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gopin_testkit::temp_dir_in_workspace;

    fn v(s: &str) -> VersionId {
        VersionId::parse(s).unwrap()
    }

    fn store() -> (tempfile::TempDir, CacheStore) {
        let dir = temp_dir_in_workspace();
        let store = CacheStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    /// Build a minimal extracted tree in a scratch dir, as the orchestrator
    /// would hand to commit.
    fn fake_tree(store: &CacheStore, version: &VersionId) -> (TempDir, PathBuf) {
        let scratch = store.scratch_dir(version).unwrap();
        let tree = scratch.path().join("tree");
        fs::create_dir_all(tree.join("bin")).unwrap();
        fs::write(tree.join("bin").join("go"), b"#!/bin/sh\nexit 0\n").unwrap();
        (scratch, tree)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    #[test]
    fn test_lookup_absent_when_no_directory() {
        let (_dir, store) = store();
        let entry = store.lookup(&v("go1.19.5"));
        assert_eq!(entry.status, CacheStatus::Absent);
    }

    #[test]
    fn test_lookup_corrupt_without_sentinel() {
        let (_dir, store) = store();
        fs::create_dir_all(store.install_dir(&v("go1.19.5"))).unwrap();
        let entry = store.lookup(&v("go1.19.5"));
        assert_eq!(entry.status, CacheStatus::Corrupt);
    }

    #[test]
    fn test_lookup_ready_requires_sentinel_file() {
        let (_dir, store) = store();
        let install = store.install_dir(&v("go1.19.5"));
        fs::create_dir_all(&install).unwrap();
        fs::write(install.join(SENTINEL_FILE), b"").unwrap();
        let entry = store.lookup(&v("go1.19.5"));
        assert_eq!(entry.status, CacheStatus::Ready);
    }

    // ========================================================================
    // Commit
    // ========================================================================

    #[test]
    fn test_commit_promotes_tree_and_writes_sentinel() {
        let (_dir, store) = store();
        let version = v("go1.19.5");
        let (_scratch, tree) = fake_tree(&store, &version);

        let entry = store.commit(&version, &tree).unwrap();
        assert_eq!(entry.status, CacheStatus::Ready);
        assert!(store.install_dir(&version).join("bin").join("go").is_file());
        assert!(store.install_dir(&version).join(SENTINEL_FILE).is_file());
        assert!(!tree.exists(), "scratch tree should have been renamed away");
    }

    #[test]
    fn test_commit_lost_race_is_success() {
        let (_dir, store) = store();
        let version = v("go1.19.5");

        // First installer wins.
        let (_s1, tree1) = fake_tree(&store, &version);
        store.commit(&version, &tree1).unwrap();

        // Second installer finds the destination taken and Ready.
        let (_s2, tree2) = fake_tree(&store, &version);
        let entry = store.commit(&version, &tree2).unwrap();
        assert_eq!(entry.status, CacheStatus::Ready);
    }

    #[test]
    fn test_commit_onto_corrupt_leftover_fails() {
        let (_dir, store) = store();
        let version = v("go1.19.5");

        // A non-empty directory without a sentinel occupies the destination.
        let install = store.install_dir(&version);
        fs::create_dir_all(install.join("bin")).unwrap();
        fs::write(install.join("bin").join("junk"), b"junk").unwrap();

        let (_scratch, tree) = fake_tree(&store, &version);
        let err = store.commit(&version, &tree).unwrap_err();
        assert!(
            err.to_string().contains("CACHE_COMMIT_FAILED"),
            "got: {err}"
        );
    }

    // ========================================================================
    // Purge
    // ========================================================================

    #[test]
    fn test_purge_returns_version_to_absent() {
        let (_dir, store) = store();
        let version = v("go1.19.5");
        let (_scratch, tree) = fake_tree(&store, &version);
        store.commit(&version, &tree).unwrap();

        store.purge(&version).unwrap();
        assert_eq!(store.lookup(&version).status, CacheStatus::Absent);
    }

    #[test]
    fn test_purge_of_absent_version_is_ok() {
        let (_dir, store) = store();
        assert!(store.purge(&v("go1.19.5")).is_ok());
    }

    // ========================================================================
    // Scratch
    // ========================================================================

    #[test]
    fn test_scratch_dirs_are_unique_per_attempt() {
        let (_dir, store) = store();
        let version = v("go1.19.5");
        let a = store.scratch_dir(&version).unwrap();
        let b = store.scratch_dir(&version).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_scratch_dir_is_under_cache_root() {
        let (_dir, store) = store();
        let scratch = store.scratch_dir(&v("go1.19.5")).unwrap();
        assert!(scratch.path().starts_with(store.root().join(SCRATCH_DIR)));
    }

    #[test]
    fn test_sweep_removes_only_stale_scratch() {
        let (_dir, store) = store();
        let fresh = store.scratch_dir(&v("go1.19.5")).unwrap();

        // A zero max-age sweep treats everything as stale.
        store.sweep_stale_scratch(Duration::ZERO);
        assert!(!fresh.path().exists(), "zero-age sweep should remove scratch");

        let fresh2 = store.scratch_dir(&v("go1.19.5")).unwrap();
        store.sweep_stale_scratch(Duration::from_secs(3600));
        assert!(fresh2.path().exists(), "young scratch should survive the sweep");
    }

    // ========================================================================
    // Entries
    // ========================================================================

    #[test]
    fn test_entries_lists_versions_sorted_with_status() {
        let (_dir, store) = store();

        let ready = v("go1.19.5");
        let (_s, tree) = fake_tree(&store, &ready);
        store.commit(&ready, &tree).unwrap();

        fs::create_dir_all(store.install_dir(&v("go1.17.5"))).unwrap();

        let entries = store.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].version, "go1.17.5");
        assert_eq!(entries[0].status, CacheStatus::Corrupt);
        assert_eq!(entries[1].version, "go1.19.5");
        assert_eq!(entries[1].status, CacheStatus::Ready);
    }

    #[test]
    fn test_entries_skips_scratch_and_foreign_names() {
        let (_dir, store) = store();
        let _scratch = store.scratch_dir(&v("go1.19.5")).unwrap();
        fs::create_dir_all(store.root().join("not-a-version")).unwrap();

        let entries = store.entries().unwrap();
        assert!(entries.is_empty(), "only valid version directories are listed");
    }

    #[test]
    fn test_entries_on_missing_root_is_empty() {
        let store = CacheStore::new(PathBuf::from("/nonexistent/gopin-cache-root"));
        assert!(store.entries().unwrap().is_empty());
    }
}
