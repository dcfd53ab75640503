//! Version types and operations.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version as SemVer;
use thiserror::Error;

static DOTTED_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?<core>[0-9]+(?:\.[0-9]+)*)(?:-(?<pre>[0-9A-Za-z][-0-9A-Za-z.]*))?$").unwrap()
});

#[derive(Debug, Error)]
#[error("invalid dotted version: {0}")]
pub struct DottedVersionError(pub String);

/// A dotted-numeric version that is not strict semver, e.g. "1.10" or
/// "2.0.0.3-rc1". Missing segments compare as zero, so "1.0" == "1.0.0".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DottedVersion {
    pub segments: Vec<u64>,
    pub pre:      Option<String>,
}

impl DottedVersion {
    pub fn parse(s: &str) -> Result<Self, DottedVersionError> {
        let caps = DOTTED_REGEX
            .captures(s.trim())
            .ok_or_else(|| DottedVersionError(s.to_string()))?;

        let segments = caps["core"]
            .split('.')
            .map(|seg| seg.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| DottedVersionError(s.to_string()))?;

        Ok(Self {
            segments,
            pre: caps.name("pre").map(|m| m.as_str().to_string()),
        })
    }

    fn segment(&self, idx: usize) -> u64 {
        self.segments.get(idx).copied().unwrap_or(0)
    }

    fn cmp_segments(&self, other: &DottedVersion) -> Ordering {
        let width = self.segments.len().max(other.segments.len());
        for idx in 0..width {
            match self.segment(idx).cmp(&other.segment(idx)) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        cmp_pre(self.pre.as_deref(), other.pre.as_deref())
    }
}

impl std::str::FromStr for DottedVersion {
    type Err = DottedVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { DottedVersion::parse(s) }
}

impl std::fmt::Display for DottedVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core: Vec<String> = self.segments.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", core.join("."))?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

/// A release without a pre-release tag orders after one with a tag; two
/// tags fall back to byte order.
fn cmp_pre(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Parsed {
    Full(SemVer),
    Dotted(DottedVersion),
    Opaque,
}

/// A totally ordered version string as received from an update server.
///
/// Parsing never fails: strict semver first, dotted-numeric next, and
/// anything else is kept opaque and compared byte-wise so classification
/// stays total even against a malformed server response.
#[derive(Debug, Clone)]
pub struct UpdateVersion {
    raw:    String,
    parsed: Parsed,
}

impl UpdateVersion {
    pub fn parse(s: &str) -> Self {
        let raw = s.trim().to_string();

        let parsed = if let Ok(v) = SemVer::parse(&raw) {
            Parsed::Full(v)
        } else if let Ok(v) = DottedVersion::parse(&raw) {
            Parsed::Dotted(v)
        } else {
            Parsed::Opaque
        };

        Self { raw, parsed }
    }

    pub fn as_str(&self) -> &str { &self.raw }

    pub fn is_opaque(&self) -> bool { matches!(self.parsed, Parsed::Opaque) }

    fn as_dotted(&self) -> Option<DottedVersion> {
        match &self.parsed {
            Parsed::Full(v) => Some(DottedVersion {
                segments: vec![v.major, v.minor, v.patch],
                pre:      if v.pre.is_empty() {
                    None
                } else {
                    Some(v.pre.as_str().to_string())
                },
            }),
            Parsed::Dotted(v) => Some(v.clone()),
            Parsed::Opaque => None,
        }
    }
}

impl PartialEq for UpdateVersion {
    fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}

impl Eq for UpdateVersion {}

impl PartialOrd for UpdateVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for UpdateVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.parsed, &other.parsed) {
            (Parsed::Full(a), Parsed::Full(b)) => a.cmp(b),
            _ => match (self.as_dotted(), other.as_dotted()) {
                (Some(a), Some(b)) => a.cmp_segments(&b),
                _ => self.raw.cmp(&other.raw),
            },
        }
    }
}

impl std::str::FromStr for UpdateVersion {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(UpdateVersion::parse(s)) }
}

impl std::fmt::Display for UpdateVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}
