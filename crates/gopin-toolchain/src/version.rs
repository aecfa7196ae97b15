//! Version identifier parsing
//!
//! A `VersionId` names one pinned toolchain release, e.g. `go1.19.5` or
//! `go1.18beta1`. The raw string is kept verbatim once validated: it names
//! the cache subdirectory and is the stem of the archive file name.

use gopin_core::{GopinError, Result};
use std::fmt;
use std::str::FromStr;

/// Pre-release qualifier attached to a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreRelease {
    Rc(u32),
    Beta(u32),
}

/// A validated pinned-release identifier.
///
/// Grammar: `go<major>.<minor>[.<patch>][rc<n>|beta<n>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionId {
    raw: String,
    major: u32,
    minor: u32,
    patch: Option<u32>,
    pre: Option<PreRelease>,
}

impl VersionId {
    /// Parse and validate a version identifier string.
    pub fn parse(s: &str) -> Result<Self> {
        let fail = || GopinError::InvalidVersion(format!("unrecognized version {s:?}"));

        let rest = s.strip_prefix("go").ok_or_else(fail)?;

        let (nums, pre) = if let Some(idx) = rest.find("rc") {
            let n = parse_number(&rest[idx + 2..]).ok_or_else(fail)?;
            (&rest[..idx], Some(PreRelease::Rc(n)))
        } else if let Some(idx) = rest.find("beta") {
            let n = parse_number(&rest[idx + 4..]).ok_or_else(fail)?;
            (&rest[..idx], Some(PreRelease::Beta(n)))
        } else {
            (rest, None)
        };

        let mut parts = nums.split('.');
        let major = parts.next().and_then(parse_number).ok_or_else(fail)?;
        let minor = parts.next().and_then(parse_number).ok_or_else(fail)?;
        let patch = match parts.next() {
            Some(p) => Some(parse_number(p).ok_or_else(fail)?),
            None => None,
        };
        if parts.next().is_some() {
            return Err(fail());
        }

        Ok(VersionId {
            raw: s.to_string(),
            major,
            minor,
            patch,
            pre,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> Option<u32> {
        self.patch
    }

    pub fn pre(&self) -> Option<PreRelease> {
        self.pre
    }
}

fn parse_number(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for VersionId {
    type Err = GopinError;

    fn from_str(s: &str) -> Result<Self> {
        VersionId::parse(s)
    }
}
