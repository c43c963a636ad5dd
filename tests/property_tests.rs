//! Property-based tests for stubdex
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use std::collections::BTreeSet;

use proptest::prelude::*;
use stubdex::corpus::{Corpus, MemoryStore};
use stubdex::version;
use stubdex::CorpusConfig;
use stubdex_core::version::{MatchKind, VersionTag};

// =============================================================================
// Version Properties
// =============================================================================

fn version_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..20, 1..4)
}

fn tag(parts: &[u32]) -> VersionTag {
    let text: Vec<String> = parts.iter().map(ToString::to_string).collect();
    text.join(".").parse().unwrap()
}

proptest! {
    /// Property: numeric components order exactly like the integer tuples they spell
    #[test]
    fn versions_order_like_integer_tuples(a in version_strategy(), b in version_strategy()) {
        let (ta, tb) = (tag(&a), tag(&b));
        // Trailing components make a version newer, just like longer tuples with an equal prefix.
        prop_assert_eq!(ta.cmp(&tb), a.cmp(&b));
        prop_assert!(VersionTag::Base < ta);
    }

    /// Property: the selected version is the greatest available one not above the request
    #[test]
    fn selection_is_nearest_not_greater(
        available in prop::collection::btree_set(version_strategy(), 1..6),
        requested in version_strategy(),
    ) {
        let available: Vec<VersionTag> = available.iter().map(|v| tag(v)).collect();
        let requested = tag(&requested);
        let (selected, how) = version::resolve("m", &available, Some(&requested)).unwrap();
        match how {
            MatchKind::OldestFallback => {
                prop_assert!(available.iter().all(|v| *v > requested));
                prop_assert_eq!(Some(&selected), available.iter().min());
            }
            _ => {
                prop_assert!(selected <= requested);
                prop_assert!(available.iter().all(|v| *v <= selected || *v > requested));
            }
        }
    }
}

// =============================================================================
// Table Properties
// =============================================================================

fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_]{0,6}".prop_filter("Not a keyword", |s| {
        !matches!(
            s.as_str(),
            "var"
                | "let"
                | "const"
                | "function"
                | "new"
                | "true"
                | "false"
                | "null"
                | "undefined"
                | "require"
                | "exports"
                | "prototype"
        )
    })
}

/// A stub module `m` with one constructor `T` composing `B`, plus free functions.
fn module_strategy() -> impl Strategy<Value = (Vec<String>, Vec<String>, Vec<String>)> {
    (
        prop::collection::vec(ident_strategy(), 0..8),
        prop::collection::vec(ident_strategy(), 0..8),
        prop::collection::vec(ident_strategy(), 0..8),
    )
}

fn render_module(functions: &[String], own: &[String], base: &[String]) -> String {
    let mut src = String::from("var m = {};\nm.B = function() {}\nm.T = function() {}\nm.T.prototype = new m.B();\n");
    for f in functions {
        src.push_str(&format!("m.{f} = function(a, b) {{}}\n"));
    }
    for f in own {
        src.push_str(&format!("m.T.prototype.{f} = function() {{}}\n"));
    }
    for f in base {
        src.push_str(&format!("m.B.prototype.{f} = function(x) {{}}\n"));
    }
    src.push_str("exports = m;\n");
    src
}

fn corpus_of(source: String) -> Corpus {
    Corpus::with_store(MemoryStore::new().with_file("m.js", source), CorpusConfig::default()).unwrap()
}

proptest! {
    /// Property: prefix_search("") enumerates every visible name exactly once, sorted
    #[test]
    fn prefix_enumeration_is_sorted_and_unique((functions, own, base) in module_strategy()) {
        let corpus = corpus_of(render_module(&functions, &own, &base));
        let table = corpus.resolve("m", None).unwrap();
        let names: Vec<&str> = table.prefix_search("").map(|s| s.qualified_name.as_str()).collect();
        let unique: BTreeSet<&str> = names.iter().copied().collect();
        prop_assert_eq!(names.len(), unique.len());
        prop_assert!(names.iter().copied().eq(unique.iter().copied()));
        prop_assert_eq!(names.len(), table.len());
    }

    /// Property: every base member not overridden by T appears on T, and own members stay own
    #[test]
    fn composition_exposes_base_members((functions, own, base) in module_strategy()) {
        let corpus = corpus_of(render_module(&functions, &own, &base));
        let table = corpus.resolve("m", None).unwrap();
        for name in &base {
            let symbol = table.lookup(&format!("T.{name}")).found();
            prop_assert!(symbol.is_some(), "T.{} missing", name);
        }
        for name in &own {
            let symbol = table.lookup(&format!("T.{name}")).found().unwrap();
            prop_assert!(symbol.origin.is_none());
        }
    }

    /// Property: building the same input twice yields equal tables
    #[test]
    fn building_is_idempotent((functions, own, base) in module_strategy()) {
        let source = render_module(&functions, &own, &base);
        let first = corpus_of(source.clone()).resolve("m", None).unwrap();
        let second = corpus_of(source).resolve("m", None).unwrap();
        prop_assert_eq!(&*first, &*second);
    }

    /// Property: names never declared are NotFound
    #[test]
    fn undeclared_names_are_not_found((functions, own, base) in module_strategy(), probe in "[A-Z][a-z]{3,8}") {
        let corpus = corpus_of(render_module(&functions, &own, &base));
        let table = corpus.resolve("m", None).unwrap();
        prop_assert!(!table.lookup(&probe).is_found());
        let dotted = format!("T.{probe}");
        prop_assert!(!table.lookup(&dotted).is_found());
    }
}
