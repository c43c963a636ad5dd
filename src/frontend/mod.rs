//! Declaration source frontends: stub dialect and JSON, both producing a [`RawModule`].

pub mod json;
pub mod lower;

use serde::Serialize;
use stubdex_syntax::jsdoc::DocOptions;
use stubdex_syntax::{diagnostics, parser};

use crate::model::RawModule;
pub use lower::StubLowering;

/// Format of a declaration source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// JavaScript-like stub dialect (`.js`).
    Stub,
    /// Serialized [`RawModule`] (`.json`).
    Json,
}

/// Parse one declaration source into raw declarations.
///
/// ## Errors
/// Returns the rendered diagnostics (one string per error) when the source cannot be parsed.
pub fn load_source(
    module: &str,
    file_name: &str,
    source: &str,
    format: SourceFormat,
    options: &DocOptions,
) -> Result<RawModule, Vec<String>> {
    match format {
        SourceFormat::Stub => {
            let program = parser::parse_source(source).map_err(|errs| {
                errs.iter()
                    .map(|e| diagnostics::format_error(file_name, source, e))
                    .collect::<Vec<_>>()
            })?;
            Ok(StubLowering::new(module, *options).lower_program(&program))
        }
        SourceFormat::Json => json::parse_json(file_name, source, options.strip_html).map_err(|e| vec![e]),
    }
}
