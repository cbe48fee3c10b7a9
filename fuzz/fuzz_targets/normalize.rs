#![no_main]

use libfuzzer_sys::fuzz_target;
use po_catalog::{normalize_target, BuiltinLanguages, NormalizeTarget, Overrides};
use po_catalog_fuzz::{create_metadata, full_context, Kind};
use pretty_assertions::assert_eq;

fuzz_target!(|input: (Kind, Vec<(&str, &str)>)| {
    let (kind, fields) = input;
    let languages = BuiltinLanguages;
    let context = full_context(&languages);
    let overrides = Overrides::from([(String::from("Language"), String::from("de"))]);
    let target = NormalizeTarget::Metadata {
        metadata: create_metadata(fields),
        file_kind: kind.into(),
    };

    let (once, _) = normalize_target(target, &context, &overrides);
    let (twice, diagnostics) = normalize_target(once.clone(), &context, &overrides);
    assert_eq!(diagnostics, Vec::new());
    assert_eq!(twice, once);
});
