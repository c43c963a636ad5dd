//! Layering guardrails for the workspace crates.
//!
//! `stubdex_core` holds vocabulary registries and the version type; it must stay dependency-free so the syntax
//! crate and any future tooling can use it without pulling in a stack. `stubdex_syntax` knows nothing about
//! corpora and must not depend on the root crate.

/// Dependency names listed in the `[dependencies]` table of a manifest.
fn dependencies(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut deps = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            deps.push(name.trim().to_string());
        }
    }
    deps
}

#[test]
fn core_crate_has_no_dependencies() {
    let deps = dependencies(include_str!("../crates/stubdex_core/Cargo.toml"));
    assert!(deps.is_empty(), "`stubdex_core` must stay dependency-free, found: {deps:?}");
}

#[test]
fn syntax_crate_does_not_depend_on_root() {
    let deps = dependencies(include_str!("../crates/stubdex_syntax/Cargo.toml"));
    assert!(deps.iter().any(|d| d == "stubdex_core"));
    assert!(
        !deps.iter().any(|d| d == "stubdex"),
        "`stubdex_syntax` must not depend on the `stubdex` crate"
    );
}
