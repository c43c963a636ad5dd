//! Tool version and the version resolver.
//!
//! [`resolve`] turns a requested version string into one of the versions a module is available in, using the
//! nearest-not-greater rule from [`stubdex_core::version::select`]:
//!
//! | available    | requested | selected |
//! |--------------|-----------|----------|
//! | `0.6`, `0.8` | `0.7`     | `0.6`    |
//! | `0.6`, `0.8` | `0.9`     | `0.8`    |
//! | `0.6`, `0.8` | none      | `0.8`    |
//! | `0.6`, `0.8` | `0.4`     | `0.6` (oldest fallback) |

use stubdex_core::version::{self, MatchKind, VersionTag};

use crate::error::{CorpusError, CorpusResult};

/// The stubdex version string (for example, `0.1.0-alpha.4`).
pub const STUBDEX_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse a requested version. `None` and blank strings mean "latest".
///
/// ## Errors
/// [`CorpusError::InvalidVersion`] when the string is not a version.
pub fn parse_request(requested: Option<&str>) -> CorpusResult<Option<VersionTag>> {
    match requested.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Ok(Some(s.parse()?)),
        None => Ok(None),
    }
}

/// Select the version of `module` to use for a request.
///
/// ## Errors
/// [`CorpusError::NoVersionAvailable`] when `available` is empty.
pub fn resolve(module: &str, available: &[VersionTag], requested: Option<&VersionTag>) -> CorpusResult<(VersionTag, MatchKind)> {
    let (selected, how) = version::select(available, requested).ok_or_else(|| CorpusError::NoVersionAvailable {
        module: module.to_string(),
    })?;
    match how {
        MatchKind::OldestFallback => tracing::debug!(
            module,
            requested = %requested.map(ToString::to_string).unwrap_or_default(),
            selected = %selected,
            "requested version predates the module; using the oldest available"
        ),
        _ => tracing::trace!(module, selected = %selected, ?how, "version selected"),
    }
    Ok((selected.clone(), how))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<VersionTag> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_parse_request() {
        assert_eq!(parse_request(None).unwrap(), None);
        assert_eq!(parse_request(Some("  ")).unwrap(), None);
        assert_eq!(parse_request(Some("0.8")).unwrap(), Some("0.8".parse().unwrap()));
        assert_eq!(parse_request(Some("base")).unwrap(), Some(VersionTag::Base));
        assert!(matches!(parse_request(Some("0..8")), Err(CorpusError::InvalidVersion(_))));
    }

    #[test]
    fn test_resolve_nearest_not_greater() {
        let available = tags(&["0.6", "0.8"]);
        let pick = |r: &str| resolve("net", &available, Some(&r.parse().unwrap())).unwrap();
        assert_eq!(pick("0.7"), (available[0].clone(), MatchKind::NearestEarlier));
        assert_eq!(pick("0.9"), (available[1].clone(), MatchKind::NearestEarlier));
        assert_eq!(pick("0.4"), (available[0].clone(), MatchKind::OldestFallback));
        assert_eq!(resolve("net", &available, None).unwrap().0, available[1]);
    }

    #[test]
    fn test_resolve_unknown_module() {
        let err = resolve("nosuch", &[], None).unwrap_err();
        assert_eq!(
            err,
            CorpusError::NoVersionAvailable {
                module: "nosuch".to_string()
            }
        );
    }
}
