//! Acquisition orchestration
//!
//! Materializes a version on first use: describe → fetch expected digest →
//! fetch archive → verify → extract to scratch → commit. Every step abandons
//! all temporary state on failure (the scratch directory and the download
//! artifact are RAII-cleaned), so nothing half-done ever reaches an install
//! path. When the store already reports the version ready this is a no-op:
//! no network, no disk writes, no re-hash of the installed tree.

use crate::descriptor::{ArchiveDescriptor, DEFAULT_DIST_BASE};
use crate::download::{self, Progress};
use crate::extract::extract_archive;
use crate::store::{CacheEntry, CacheStatus, CacheStore, SCRATCH_MAX_AGE};
use crate::verify::{parse_digest_file, verify_sha256};
use crate::version::VersionId;
use gopin_core::Result;
use std::fs;

/// Orchestrates first-use installation of pinned versions.
#[derive(Debug, Clone)]
pub struct Acquirer {
    store: CacheStore,
    dist_base: String,
    progress: Option<Progress>,
}

impl Acquirer {
    pub fn new(store: CacheStore) -> Self {
        Acquirer {
            store,
            dist_base: DEFAULT_DIST_BASE.to_string(),
            progress: None,
        }
    }

    /// Point acquisition at a different distribution server (mirrors, tests).
    pub fn with_dist_base(mut self, base: impl Into<String>) -> Self {
        self.dist_base = base.into();
        self
    }

    /// Report download progress through the given callback.
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Ensure `version` is ready, fetching and installing it if needed.
    ///
    /// A corrupt leftover is purged first and re-fetched from scratch. Two
    /// processes acquiring the same version concurrently both succeed; the
    /// commit rename decides whose tree is kept.
    pub fn acquire(&self, version: &VersionId) -> Result<CacheEntry> {
        let entry = self.store.lookup(version);
        match entry.status {
            CacheStatus::Ready => return Ok(entry),
            CacheStatus::Corrupt => self.store.purge(version)?,
            CacheStatus::Absent => {}
        }

        self.store.sweep_stale_scratch(SCRATCH_MAX_AGE);

        let desc = ArchiveDescriptor::for_current_platform(version, &self.dist_base)?;
        let client = download::build_client()?;

        let digest_body = download::fetch_text(&client, &desc.digest_url)?;
        let expected = parse_digest_file(&digest_body)?;

        // Scratch holds both the download artifact and the extracted tree;
        // whichever way this function exits, dropping it leaves no residue.
        let scratch = self.store.scratch_dir(version)?;

        let archive = download::fetch_to_temp(&client, &desc.url, scratch.path(), self.progress)?;
        verify_sha256(archive.path(), &expected)?;

        let tree = scratch.path().join("tree");
        fs::create_dir(&tree)?;
        extract_archive(archive.path(), desc.kind, &tree)?;

        self.store.commit(version, &tree)
    }
}
