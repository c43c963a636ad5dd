//! Platform versions and their ordering.
//!
//! A corpus module may exist in several versions: an unversioned *base* tier plus any number of numbered releases
//! (`0.6`, `0.8`, `0.10`, ...). Versions are compared component-wise with numeric components compared as numbers,
//! so `0.10` sorts after `0.9`. Non-numeric components (`0.8-pre`, `ecma`) sort after numeric ones and compare
//! lexically among themselves. A shorter version sorts before any longer version it prefixes (`0.8 < 0.8.1`).
//!
//! ## Examples
//! ```rust
//! use stubdex_core::version::{Version, VersionTag};
//!
//! let a: Version = "0.9".parse().unwrap();
//! let b: Version = "0.10".parse().unwrap();
//! assert!(a < b);
//! assert!(VersionTag::Base < VersionTag::Release(a));
//! ```

use std::fmt;
use std::str::FromStr;

/// Spelling used for the unversioned base tier in listings and on the command line.
pub const BASE_TAG: &str = "base";

/// One dot-separated component of a version.
///
/// Variant order matters: derived `Ord` puts every `Number` before every `Text`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionPart {
    Number(u64),
    Text(String),
}

impl fmt::Display for VersionPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionPart::Number(n) => write!(f, "{n}"),
            VersionPart::Text(t) => write!(f, "{t}"),
        }
    }
}

/// A numbered release, e.g. `0.8` or `1.8.2`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    parts: Vec<VersionPart>,
}

impl Version {
    /// Return the components of this version.
    pub fn parts(&self) -> &[VersionPart] {
        &self.parts
    }

    /// Parse the name of a release directory.
    ///
    /// Stricter than [`FromStr`]: the first component must be numeric, so `0.8` and `1.0.rc1` are releases
    /// while `drafts` or `old.2` are not.
    pub fn parse_release(s: &str) -> Result<Self, ParseVersionError> {
        let version: Version = s.parse()?;
        match version.parts.first() {
            Some(VersionPart::Number(_)) => Ok(version),
            _ => Err(ParseVersionError {
                input: s.to_string(),
                reason: "release names start with a number",
            }),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

/// Error returned when a version string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVersionError {
    pub input: String,
    pub reason: &'static str,
}

impl fmt::Display for ParseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid version '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for ParseVersionError {}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParseVersionError {
            input: s.to_string(),
            reason,
        };
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix('v')
            .filter(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
            .unwrap_or(trimmed);
        if body.is_empty() {
            return Err(err("empty version"));
        }

        let mut parts = Vec::new();
        for component in body.split('.') {
            if component.is_empty() {
                return Err(err("empty version component"));
            }
            if component.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\') {
                return Err(err("version components may not contain whitespace or path separators"));
            }
            match component.parse::<u64>() {
                Ok(n) => parts.push(VersionPart::Number(n)),
                Err(_) => parts.push(VersionPart::Text(component.to_string())),
            }
        }
        Ok(Version { parts })
    }
}

/// The version a declaration set belongs to.
///
/// Variant order matters: derived `Ord` puts the base tier before every release.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionTag {
    /// Unversioned declarations (files at the corpus root).
    Base,
    /// Declarations for a numbered release (files under `<root>/<version>/`).
    Release(Version),
}

impl VersionTag {
    /// Return `true` for the unversioned base tier.
    pub fn is_base(&self) -> bool {
        matches!(self, VersionTag::Base)
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionTag::Base => f.write_str(BASE_TAG),
            VersionTag::Release(v) => write!(f, "{v}"),
        }
    }
}

impl FromStr for VersionTag {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == BASE_TAG {
            return Ok(VersionTag::Base);
        }
        s.parse().map(VersionTag::Release)
    }
}

/// How a requested version was matched against the available ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// The requested version is available.
    Exact,
    /// The nearest available version not greater than the request was chosen.
    NearestEarlier,
    /// No version was requested; the newest available was chosen.
    Latest,
    /// Every available version is newer than the request; the oldest was chosen.
    OldestFallback,
}

/// Pick the best available version for a request.
///
/// Nearest-not-greater wins. With no request the newest version wins. A request older than everything available
/// falls back to the oldest version. Returns `None` only when nothing is available.
///
/// ## Examples
/// ```rust
/// use stubdex_core::version::{self, MatchKind, VersionTag};
///
/// let available: Vec<VersionTag> = ["0.6", "0.8"].iter().map(|s| s.parse().unwrap()).collect();
/// let want: VersionTag = "0.7".parse().unwrap();
/// let (picked, how) = version::select(&available, Some(&want)).unwrap();
/// assert_eq!(picked.to_string(), "0.6");
/// assert_eq!(how, MatchKind::NearestEarlier);
/// ```
pub fn select<'a>(available: &'a [VersionTag], requested: Option<&VersionTag>) -> Option<(&'a VersionTag, MatchKind)> {
    let newest = available.iter().max()?;
    let Some(requested) = requested else {
        return Some((newest, MatchKind::Latest));
    };

    match available.iter().filter(|v| *v <= requested).max() {
        Some(v) if v == requested => Some((v, MatchKind::Exact)),
        Some(v) => Some((v, MatchKind::NearestEarlier)),
        None => available.iter().min().map(|v| (v, MatchKind::OldestFallback)),
    }
}
