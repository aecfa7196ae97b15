//! Cache root resolution
//!
//! Every installed toolchain version lives under a single cache root
//! directory. `GOPIN_CACHE_DIR` overrides the location when set; otherwise
//! the platform user-cache default is used:
//!
//! - macOS: `~/Library/Caches/gopin`
//! - Linux: `~/.cache/gopin`
//! - Windows: `%LOCALAPPDATA%\gopin`

use crate::error::{GopinError, Result};
use std::path::PathBuf;

/// Environment variable overriding the cache root directory.
pub const CACHE_DIR_ENV: &str = "GOPIN_CACHE_DIR";

/// Resolve the cache root directory.
///
/// The directory is not created here; callers that need it on disk create it
/// themselves.
pub fn cache_root() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CACHE_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let base = dirs::cache_dir().ok_or_else(|| {
        GopinError::CacheDirUnavailable("could not determine user cache directory".to_string())
    })?;

    Ok(base.join("gopin"))
}
