#![no_main]

use libfuzzer_sys::fuzz_target;
use stubdex::corpus::{Corpus, MemoryStore};
use stubdex::CorpusConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let store = MemoryStore::new().with_file("m.js", s);
        if let Ok(corpus) = Corpus::with_store(store, CorpusConfig::default()) {
            // Parse errors and cycles are fine; panics and hangs are not
            if let Ok(table) = corpus.resolve("m", None) {
                let _ = table.prefix_search("").count();
            }
        }
    }
});
