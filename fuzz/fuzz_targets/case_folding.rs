#![no_main]

use casefold_tables::{CaseFolding, CasefoldTableBuilder, CodepointRange};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(folding) = CaseFolding::parse(text) {
        let range = CodepointRange::new(0, 0x3000).unwrap();
        if let Ok(tables) = CasefoldTableBuilder::new(range).build(&folding) {
            tables.verify().unwrap();
        }
    }
});
