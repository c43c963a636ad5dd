//! Builtin type vocabulary.
//!
//! Doc comments name value types freely (`{Boolean}`, `{String}`, `{int}`). Names in this registry resolve to a
//! builtin marker at query time instead of being looked up as symbols of some module.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**; lowercase spellings are registered as aliases.
//!
//! ## Examples
//! ```rust
//! use stubdex_core::lang::builtin_types::{self, BuiltinTypeId};
//!
//! assert_eq!(builtin_types::from_str("Boolean"), Some(BuiltinTypeId::Boolean));
//! assert_eq!(builtin_types::from_str("bool"), Some(BuiltinTypeId::Boolean));
//! assert_eq!(builtin_types::from_str("Socket"), None);
//! ```

use super::registry::{LangItemInfo, from_str_impl, info_for_impl, item};

/// Stable identifier for a builtin type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTypeId {
    Boolean,
    String,
    Number,
    Object,
    Array,
    Function,
    Error,
    RegExp,
    Date,
    Null,
    Undefined,
}

pub type BuiltinTypeInfo = LangItemInfo<BuiltinTypeId>;

/// Registry of all builtin types.
pub const BUILTIN_TYPES: &[BuiltinTypeInfo] = &[
    item(BuiltinTypeId::Boolean, "Boolean", &["boolean", "bool"], "true or false."),
    item(BuiltinTypeId::String, "String", &["string", "str"], "Text value."),
    item(
        BuiltinTypeId::Number,
        "Number",
        &["number", "int", "integer", "Integer", "float", "Float"],
        "Numeric value.",
    ),
    item(BuiltinTypeId::Object, "Object", &["object", "Hash"], "Plain object."),
    item(BuiltinTypeId::Array, "Array", &["array", "list"], "Ordered collection."),
    item(
        BuiltinTypeId::Function,
        "Function",
        &["function", "Callback", "callback"],
        "Callable value.",
    ),
    item(BuiltinTypeId::Error, "Error", &["Exception"], "Error object."),
    item(BuiltinTypeId::RegExp, "RegExp", &["regexp"], "Regular expression."),
    item(BuiltinTypeId::Date, "Date", &[], "Point in time."),
    item(BuiltinTypeId::Null, "null", &["Null"], "Absent value."),
    item(BuiltinTypeId::Undefined, "undefined", &["void"], "Missing value."),
];

/// Return the canonical spelling for a builtin type.
pub fn as_str(id: BuiltinTypeId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a builtin type.
pub fn info_for(id: BuiltinTypeId) -> &'static BuiltinTypeInfo {
    info_for_impl(BUILTIN_TYPES, id, "builtin type info missing")
}

/// Resolve a type spelling to a builtin type, if it is one.
pub fn from_str(s: &str) -> Option<BuiltinTypeId> {
    from_str_impl(BUILTIN_TYPES, s)
}
