use thiserror::Error;

#[derive(Error, Debug)]
pub enum GopinError {
    // Version errors
    #[error("VERSION_INVALID: {0}")]
    InvalidVersion(String),

    #[error("PLATFORM_UNSUPPORTED: {0}")]
    UnsupportedPlatform(String),

    // Network errors
    #[error("NETWORK_FETCH_FAILED: {0}")]
    NetworkFetchFailed(String),

    // Verification errors
    #[error("CHECKSUM_MISMATCH: {file}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    // Archive errors
    #[error("EXTRACT_FAILED: {0}")]
    ExtractFailed(String),

    // Cache errors
    #[error("CACHE_DIR_UNAVAILABLE: {0}")]
    CacheDirUnavailable(String),

    #[error("CACHE_COMMIT_FAILED: {0}")]
    CacheCommitFailed(String),

    // Exec errors
    #[error("EXEC_FAILED: {0}")]
    ExecFailed(String),

    // IO errors
    #[error("IO_ERROR: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GopinError>;
