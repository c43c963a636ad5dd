//! Structural member markers.
//!
//! A handful of identifiers carry structure rather than naming a symbol: `prototype` switches a path into an
//! owner's instance members, `__events__` into its event table, `__proto__` declares a composed shape, and
//! `require` / `exports` bind module aliases and the namespace object.
//!
//! ## Examples
//! ```rust
//! use stubdex_core::lang::markers::{self, MarkerId};
//!
//! assert_eq!(markers::from_str("prototype"), Some(MarkerId::Prototype));
//! assert_eq!(markers::as_str(MarkerId::Events), "__events__");
//! assert_eq!(markers::from_str("write"), None);
//! ```

use super::registry::{LangItemInfo, from_str_impl, info_for_impl, item};

/// Stable identifier for a structural marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerId {
    Prototype,
    Events,
    Proto,
    Require,
    Exports,
}

pub type MarkerInfo = LangItemInfo<MarkerId>;

/// Registry of all structural markers.
pub const MARKERS: &[MarkerInfo] = &[
    item(
        MarkerId::Prototype,
        "prototype",
        &[],
        "Path segment selecting an owner's instance members.",
    ),
    item(
        MarkerId::Events,
        "__events__",
        &[],
        "Path segment selecting an owner's event table.",
    ),
    item(
        MarkerId::Proto,
        "__proto__",
        &[],
        "Assigning a constructor here composes its instance shape into the owner.",
    ),
    item(
        MarkerId::Require,
        "require",
        &[],
        "`require('m')` binds a local alias to module `m`.",
    ),
    item(
        MarkerId::Exports,
        "exports",
        &[],
        "`exports = name` names the namespace object of the module.",
    ),
];

/// Return the canonical spelling for a marker.
pub fn as_str(id: MarkerId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a marker.
pub fn info_for(id: MarkerId) -> &'static MarkerInfo {
    info_for_impl(MARKERS, id, "marker info missing")
}

/// Resolve a spelling to a marker, if it is one.
pub fn from_str(s: &str) -> Option<MarkerId> {
    from_str_impl(MARKERS, s)
}

/// Return `true` if `segment` is the given marker.
pub fn is(segment: &str, id: MarkerId) -> bool {
    from_str(segment) == Some(id)
}
