#![no_main]

use libfuzzer_sys::fuzz_target;
use stubdex_syntax::jsdoc::{DocBlock, DocOptions};
use stubdex_syntax::{lexer, parser};

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Fuzz the lexer
        if let Ok(tokens) = lexer::lex(s) {
            // If lexing succeeds, fuzz the parser
            let _ = parser::parse(&tokens);
        }
        // Doc comment bodies are parsed separately from the token stream
        let _ = DocBlock::parse_with(s, &DocOptions { strip_html: true });
    }
});
