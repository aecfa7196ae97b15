//! Pinned toolchain acquisition, caching and launch.
//!
//! This crate is the engine behind the per-version front-ends: given a
//! validated version identifier it makes sure that release is present and
//! verified in the local cache, then executes it transparently.
//!
//! # Acquisition Flow
//!
//! ```text
//! run(version, args)
//!     ↓
//! store.lookup(version)
//!     ↓ (Ready)                 → exec
//!     ↓ (Corrupt)               → purge, continue as Absent
//!     ↓ (Absent)
//! describe archive for platform
//!     ↓
//! fetch <archive>.sha256        (expected digest)
//!     ↓
//! fetch archive → temp file     (bounded retry, same filesystem as cache)
//!     ↓
//! verify SHA-256                (mismatch discards the artifact)
//!     ↓
//! extract → scratch tree       (never into the install path)
//!     ↓
//! commit: atomic rename        (sole cross-process serialization point)
//!     ↓
//! exec bin/go, mirror exit code
//! ```
//!
//! # Cache Structure
//!
//! One directory per version under the cache root (`GOPIN_CACHE_DIR` or the
//! platform user-cache default), each carrying a completion sentinel written
//! only on successful commit:
//!
//! - Linux: `~/.cache/gopin/go1.19.5/`
//! - macOS: `~/Library/Caches/gopin/go1.19.5/`
//! - Windows: `%LOCALAPPDATA%\gopin\go1.19.5\`

// Core modules
pub mod acquire;
pub mod descriptor;
pub mod download;
pub mod exec;
pub mod extract;
pub mod platform;
pub mod store;
pub mod verify;
pub mod version;

// Re-export commonly used types
pub use acquire::Acquirer;
pub use descriptor::{ArchiveDescriptor, ArchiveKind, DEFAULT_DIST_BASE};
pub use exec::{DOWNLOAD_SUBCOMMAND, RunOutcome, run};
pub use store::{CacheEntry, CacheStatus, CacheStore, SENTINEL_FILE};
pub use version::VersionId;

// Type alias for convenience
pub type Result<T> = gopin_core::Result<T>;
