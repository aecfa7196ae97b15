//! Mock distribution server helpers

use crate::archive::sha256_hex;
use mockito::{Mock, ServerGuard};

/// Mount a distribution archive and its `.sha256` companion on a mock server.
///
/// Returns both mocks so tests can assert hit counts; mocks are removed when
/// dropped.
pub fn mount_dist(server: &mut ServerGuard, archive_name: &str, bytes: &[u8]) -> (Mock, Mock) {
    let archive = server
        .mock("GET", format!("/{archive_name}").as_str())
        .with_status(200)
        .with_header("content-type", "application/octet-stream")
        .with_body(bytes)
        .create();

    let digest = server
        .mock("GET", format!("/{archive_name}.sha256").as_str())
        .with_status(200)
        .with_body(format!("{}\n", sha256_hex(bytes)))
        .create();

    (archive, digest)
}
