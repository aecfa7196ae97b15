//! Streaming downloads with bounded retry
//!
//! Fetches distribution files over plain HTTPS GET. Archive bodies are
//! streamed into a temporary file created in the caller-supplied directory,
//! which must live on the same filesystem as the cache so the later commit
//! rename stays atomic. Transient failures (connect errors, timeouts, 5xx
//! responses, truncated bodies) are retried with exponential backoff up to a
//! bounded attempt count; 4xx responses mean the version or URL is wrong and
//! fail immediately. A failed fetch never leaves a partial file behind: the
//! temp file is removed on every failure path.

use gopin_core::{GopinError, Result};
use reqwest::blocking::Client;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;
use url::Url;

/// Connect timeout for distribution requests.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall per-request timeout (archives are large; links can be slow).
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Total attempts for transient failures.
pub const MAX_ATTEMPTS: u32 = 3;

/// Optional progress callback (bytes downloaded, total bytes when known).
pub type Progress = fn(u64, u64);

/// Failure classification driving the retry loop.
enum FetchFailure {
    Transient(GopinError),
    Fatal(GopinError),
}

pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent("gopin")
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| GopinError::NetworkFetchFailed(format!("building HTTP client: {e}")))
}

/// Fetch `url` into a temporary file created in `dir`.
///
/// The returned `NamedTempFile` deletes itself on drop, so abandoning the
/// artifact on a later failure needs no explicit cleanup.
pub fn fetch_to_temp(
    client: &Client,
    url: &Url,
    dir: &Path,
    progress: Option<Progress>,
) -> Result<NamedTempFile> {
    with_retry(url, || fetch_archive_once(client, url, dir, progress))
}

/// Fetch a small text resource (the published `.sha256` file).
pub fn fetch_text(client: &Client, url: &Url) -> Result<String> {
    with_retry(url, || fetch_text_once(client, url))
}

fn with_retry<T>(
    url: &Url,
    mut attempt_fn: impl FnMut() -> std::result::Result<T, FetchFailure>,
) -> Result<T> {
    let mut last_err = None;
    for attempt in 0..MAX_ATTEMPTS {
        if attempt > 0 {
            std::thread::sleep(backoff(attempt));
        }
        match attempt_fn() {
            Ok(value) => return Ok(value),
            Err(FetchFailure::Fatal(e)) => return Err(e),
            Err(FetchFailure::Transient(e)) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        GopinError::NetworkFetchFailed(format!("GET {url}: retries exhausted"))
    }))
}

/// Exponential backoff before retry `attempt` (1-based for waiting).
fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(200 * (1 << attempt))
}

fn fetch_archive_once(
    client: &Client,
    url: &Url,
    dir: &Path,
    progress: Option<Progress>,
) -> std::result::Result<NamedTempFile, FetchFailure> {
    let mut response = client
        .get(url.as_str())
        .send()
        .map_err(|e| classify_request_error(url, &e))?;

    check_status(url, response.status())?;

    let total = response.content_length().unwrap_or(0);

    let mut file = NamedTempFile::new_in(dir)
        .map_err(|e| FetchFailure::Fatal(e.into()))?;

    let mut downloaded: u64 = 0;
    let mut buffer = [0u8; 8192];
    loop {
        let n = response.read(&mut buffer).map_err(|e| {
            FetchFailure::Transient(GopinError::NetworkFetchFailed(format!(
                "GET {url}: reading body: {e}"
            )))
        })?;
        if n == 0 {
            break;
        }
        file.write_all(&buffer[..n])
            .map_err(|e| FetchFailure::Fatal(e.into()))?;
        downloaded += n as u64;
        if let Some(callback) = progress {
            callback(downloaded, total);
        }
    }

    // A body shorter than the advertised length is a dropped connection.
    if total > 0 && downloaded != total {
        return Err(FetchFailure::Transient(GopinError::NetworkFetchFailed(
            format!("GET {url}: truncated body: got {downloaded} of {total} bytes"),
        )));
    }

    file.as_file()
        .sync_all()
        .map_err(|e| FetchFailure::Fatal(e.into()))?;

    Ok(file)
}

fn fetch_text_once(client: &Client, url: &Url) -> std::result::Result<String, FetchFailure> {
    let response = client
        .get(url.as_str())
        .send()
        .map_err(|e| classify_request_error(url, &e))?;

    check_status(url, response.status())?;

    response.text().map_err(|e| {
        FetchFailure::Transient(GopinError::NetworkFetchFailed(format!(
            "GET {url}: reading body: {e}"
        )))
    })
}

fn check_status(url: &Url, status: reqwest::StatusCode) -> std::result::Result<(), FetchFailure> {
    if status.is_success() {
        return Ok(());
    }
    let err = GopinError::NetworkFetchFailed(format!("GET {url}: HTTP {status}"));
    if status.is_server_error() {
        Err(FetchFailure::Transient(err))
    } else {
        // 4xx: the version or URL is wrong; retrying cannot help.
        Err(FetchFailure::Fatal(err))
    }
}

fn classify_request_error(url: &Url, e: &reqwest::Error) -> FetchFailure {
    let err = GopinError::NetworkFetchFailed(format!("GET {url}: {e}"));
    if e.is_timeout() || e.is_connect() {
        FetchFailure::Transient(err)
    } else {
        FetchFailure::Fatal(err)
    }
}
