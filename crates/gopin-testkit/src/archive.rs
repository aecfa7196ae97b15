//! Fake distribution archives
//!
//! Builders for in-memory `.tar.gz` and `.zip` toolchain archives shaped
//! like the real distribution: a single `go/` top-level directory holding
//! `bin/go` and a `VERSION` file. The fake binary is a shell script whose
//! behavior tests can script.

use flate2::Compression;
use flate2::write::GzEncoder;
use sha2::{Digest, Sha256};
use std::io::{Cursor, Write};

/// Default fake `go` binary body.
///
/// `version` prints a plausible version line; `fail` exits 7 so exit-code
/// mirroring is observable; anything else exits 0.
pub fn fake_go_script(version: &str) -> String {
    format!(
        "#!/bin/sh\n\
         case \"$1\" in\n\
           version) echo \"go version {version} test/amd64\" ;;\n\
           fail) exit 7 ;;\n\
         esac\n\
         exit 0\n"
    )
}

/// Build a `.tar.gz` distribution archive containing the given binary script.
pub fn fake_dist_tar_gz(version: &str, script: &str) -> Vec<u8> {
    let enc = GzEncoder::new(Vec::new(), Compression::default());
    let mut tar = tar::Builder::new(enc);

    append_file(&mut tar, "go/VERSION", version.as_bytes(), 0o644);
    append_file(&mut tar, "go/bin/go", script.as_bytes(), 0o755);

    let enc = tar.into_inner().unwrap();
    enc.finish().unwrap()
}

fn append_file<W: Write>(tar: &mut tar::Builder<W>, path: &str, data: &[u8], mode: u32) {
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(mode);
    header.set_cksum();
    tar.append_data(&mut header, path, data).unwrap();
}

/// Build a `.zip` distribution archive containing the given binary script.
pub fn fake_dist_zip(version: &str, script: &str) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));

    let plain: zip::write::FileOptions<'_, ()> = zip::write::FileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    let executable: zip::write::FileOptions<'_, ()> = zip::write::FileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .unix_permissions(0o755);

    zip.start_file("go/VERSION", plain).unwrap();
    zip.write_all(version.as_bytes()).unwrap();

    zip.start_file("go/bin/go", executable).unwrap();
    zip.write_all(script.as_bytes()).unwrap();

    zip.finish().unwrap().into_inner()
}

/// Build a distribution archive in the container kind the current platform
/// downloads (`.zip` on Windows, `.tar.gz` elsewhere).
pub fn fake_dist_archive(version: &str, script: &str) -> Vec<u8> {
    if cfg!(windows) {
        fake_dist_zip(version, script)
    } else {
        fake_dist_tar_gz(version, script)
    }
}

/// Hex-encoded SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    Sha256::digest(data).iter().map(|b| format!("{b:02x}")).collect()
}
