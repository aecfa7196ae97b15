//! Archive extraction
//!
//! Unpacks a verified distribution archive into a scratch directory. The
//! container kind comes from the `ArchiveDescriptor`, never from sniffing
//! bytes. Distribution archives hold everything under a single `go/`
//! top-level directory; that prefix is stripped so the unpacked tree roots
//! directly at `bin/`, `src/`, and so on. Entries that escape the prefix or
//! carry absolute/parent path components are never written.
//!
//! Extraction only ever targets a private scratch directory, so a partially
//! extracted tree can never be mistaken for an installed version.

use crate::descriptor::ArchiveKind;
use gopin_core::{GopinError, Result};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Top-level directory all distribution archive entries live under.
const ARCHIVE_PREFIX: &str = "go";

pub fn extract_archive(archive_path: &Path, kind: ArchiveKind, dest_dir: &Path) -> Result<()> {
    match kind {
        ArchiveKind::TarGz => extract_tar_gz(archive_path, dest_dir),
        ArchiveKind::Zip => extract_zip(archive_path, dest_dir),
    }
}

fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = fs::File::open(archive_path)?;
    let decompressor = flate2::read::GzDecoder::new(file);
    let mut archive = tar::Archive::new(decompressor);

    for entry in archive.entries().map_err(|e| extract_err("tar.gz", &e))? {
        let mut entry = entry.map_err(|e| extract_err("tar.gz", &e))?;
        let path = entry.path().map_err(|e| extract_err("tar.gz", &e))?.into_owned();
        let Some(rel) = sanitized_relative_path(&path) else {
            continue;
        };
        let out = dest_dir.join(&rel);
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        // unpack() preserves Unix mode bits from the tar header.
        entry.unpack(&out).map_err(|e| extract_err("tar.gz", &e))?;
    }

    Ok(())
}

fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| extract_err("zip", &e))?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| extract_err("zip", &e))?;
        let Some(name) = entry.enclosed_name() else {
            continue;
        };
        let Some(rel) = sanitized_relative_path(&name) else {
            continue;
        };
        let out = dest_dir.join(&rel);

        if entry.is_dir() {
            fs::create_dir_all(&out)?;
            continue;
        }

        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut outfile = fs::File::create(&out)?;
        io::copy(&mut entry, &mut outfile)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out, fs::Permissions::from_mode(mode & 0o777))?;
        }
    }

    Ok(())
}

/// Strip the `go/` prefix and reject unsafe components.
///
/// Returns `None` for the prefix directory itself, for entries outside the
/// prefix, and for any path with absolute or parent components.
fn sanitized_relative_path(path: &Path) -> Option<PathBuf> {
    let rel = path.strip_prefix(ARCHIVE_PREFIX).ok()?;
    if rel.as_os_str().is_empty() {
        return None;
    }
    let mut clean = PathBuf::new();
    for component in rel.components() {
        match component {
            Component::Normal(c) => clean.push(c),
            _ => return None,
        }
    }
    Some(clean)
}

fn extract_err(kind: &str, e: &dyn std::fmt::Display) -> GopinError {
    GopinError::ExtractFailed(format!("{kind}: {e}"))
}
