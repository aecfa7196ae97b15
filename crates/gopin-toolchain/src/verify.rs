//! SHA-256 artifact verification

use gopin_core::{GopinError, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Hex-encoded SHA-256 of the file at `path`, streamed in fixed-size chunks.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(hasher.finalize().iter().map(|b| format!("{b:02x}")).collect())
}

/// Compare the file's digest against the expected hex value.
///
/// A mismatch is fatal for this artifact: the caller discards it and must
/// re-fetch before trying again. The same bytes are never re-trusted.
pub fn verify_sha256(path: &Path, expected: &str) -> Result<()> {
    let expected = expected.trim().to_ascii_lowercase();
    let actual = sha256_file(path)?;
    if actual != expected {
        return Err(GopinError::ChecksumMismatch {
            file: path.display().to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Extract the digest token from a published `.sha256` file body.
///
/// The body is either the bare hex digest or `"<digest>  <filename>"`.
pub fn parse_digest_file(body: &str) -> Result<String> {
    body.split_whitespace()
        .next()
        .map(|token| token.to_ascii_lowercase())
        .ok_or_else(|| GopinError::NetworkFetchFailed("empty digest file".to_string()))
}
