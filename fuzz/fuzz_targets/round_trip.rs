#![no_main]

use libfuzzer_sys::fuzz_target;
use po_catalog::{parse, serialize, FileKind};
use pretty_assertions::assert_eq;

fuzz_target!(|text: &str| {
    let Ok(document) = parse(text, FileKind::Po) else {
        return;
    };
    let Ok(serialized) = serialize(&document) else {
        return;
    };
    let reparsed = parse(&serialized, FileKind::Po).expect("Could not parse serialized document");
    assert_eq!(reparsed, document);
    assert_eq!(serialize(&reparsed).unwrap(), serialized);
});
