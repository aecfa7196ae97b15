//! Archive identity derivation
//!
//! An `ArchiveDescriptor` is everything needed to fetch and unpack one
//! version for one platform: archive file name, download URL, digest URL and
//! container kind. It is derived deterministically from the version and the
//! platform pair and never persisted. The expected digest value itself is
//! published beside the archive (`<archive>.sha256`) and fetched at acquire
//! time.

use crate::platform::{Arch, Os, detect_arch, detect_os};
use crate::version::VersionId;
use gopin_core::{GopinError, Result};
use url::Url;

/// Default distribution server.
pub const DEFAULT_DIST_BASE: &str = "https://dl.google.com/go";

/// Container format of a distribution archive, declared up front and never
/// sniffed from the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
}

impl ArchiveKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArchiveKind::TarGz => ".tar.gz",
            ArchiveKind::Zip => ".zip",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArchiveDescriptor {
    pub version: VersionId,
    pub os: Os,
    pub arch: Arch,
    pub archive_name: String,
    pub url: Url,
    pub digest_url: Url,
    pub kind: ArchiveKind,
}

impl ArchiveDescriptor {
    /// Describe the archive for `version` on the given platform.
    ///
    /// Pure derivation, no I/O. `dist_base` is the distribution server base
    /// URL; trailing slashes are tolerated.
    pub fn new(version: &VersionId, os: Os, arch: Arch, dist_base: &str) -> Result<Self> {
        let kind = match os {
            Os::Windows => ArchiveKind::Zip,
            _ => ArchiveKind::TarGz,
        };

        let archive_name = format!(
            "{}.{}-{}{}",
            version,
            os.dist_name(),
            arch.dist_name(),
            kind.extension()
        );

        let base = dist_base.trim_end_matches('/');
        let url = parse_dist_url(&format!("{base}/{archive_name}"))?;
        let digest_url = parse_dist_url(&format!("{base}/{archive_name}.sha256"))?;

        Ok(ArchiveDescriptor {
            version: version.clone(),
            os,
            arch,
            archive_name,
            url,
            digest_url,
            kind,
        })
    }

    /// Describe the archive for `version` on the running platform.
    pub fn for_current_platform(version: &VersionId, dist_base: &str) -> Result<Self> {
        ArchiveDescriptor::new(version, detect_os()?, detect_arch()?, dist_base)
    }
}

fn parse_dist_url(raw: &str) -> Result<Url> {
    Url::parse(raw)
        .map_err(|e| GopinError::NetworkFetchFailed(format!("invalid distribution URL {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> VersionId {
        VersionId::parse(s).unwrap()
    }

    #[test]
    fn test_linux_amd64_tarball() {
        let d = ArchiveDescriptor::new(&v("go1.19.5"), Os::Linux, Arch::Amd64, DEFAULT_DIST_BASE)
            .unwrap();
        assert_eq!(d.archive_name, "go1.19.5.linux-amd64.tar.gz");
        assert_eq!(d.url.as_str(), "https://dl.google.com/go/go1.19.5.linux-amd64.tar.gz");
        assert_eq!(
            d.digest_url.as_str(),
            "https://dl.google.com/go/go1.19.5.linux-amd64.tar.gz.sha256"
        );
        assert_eq!(d.kind, ArchiveKind::TarGz);
    }

    #[test]
    fn test_darwin_arm64_tarball() {
        let d = ArchiveDescriptor::new(&v("go1.18beta1"), Os::MacOS, Arch::Arm64, DEFAULT_DIST_BASE)
            .unwrap();
        assert_eq!(d.archive_name, "go1.18beta1.darwin-arm64.tar.gz");
    }

    #[test]
    fn test_windows_uses_zip() {
        let d = ArchiveDescriptor::new(&v("go1.19.5"), Os::Windows, Arch::Amd64, DEFAULT_DIST_BASE)
            .unwrap();
        assert_eq!(d.archive_name, "go1.19.5.windows-amd64.zip");
        assert_eq!(d.kind, ArchiveKind::Zip);
    }

    #[test]
    fn test_trailing_slash_in_base_tolerated() {
        let d = ArchiveDescriptor::new(&v("go1.19.5"), Os::Linux, Arch::Amd64, "http://mirror.test/go/")
            .unwrap();
        assert_eq!(d.url.as_str(), "http://mirror.test/go/go1.19.5.linux-amd64.tar.gz");
    }

    #[test]
    fn test_invalid_base_url_fails() {
        let result = ArchiveDescriptor::new(&v("go1.19.5"), Os::Linux, Arch::Amd64, "not a url");
        assert!(result.is_err(), "malformed base URL should fail");
    }

    #[test]
    fn test_same_version_same_platform_same_identity() {
        let a = ArchiveDescriptor::new(&v("go1.19.5"), Os::Linux, Arch::Amd64, DEFAULT_DIST_BASE)
            .unwrap();
        let b = ArchiveDescriptor::new(&v("go1.19.5"), Os::Linux, Arch::Amd64, DEFAULT_DIST_BASE)
            .unwrap();
        assert_eq!(a.archive_name, b.archive_name);
        assert_eq!(a.url, b.url);
    }
}
