use arbitrary::Arbitrary;
use po_catalog::context::{Identity, LanguageTable, PackageMetadata};
use po_catalog::{Context, FileKind, Metadata};

/// Generate a random header table for fuzzing.
pub fn create_metadata(fields: Vec<(&str, &str)>) -> Metadata {
    fields
        .into_iter()
        .map(|(name, value)| (name.trim(), value.trim()))
        .collect()
}

/// A context where every input is available, so normalization can
/// reach a fixed point.
pub fn full_context(languages: &dyn LanguageTable) -> Context<'_> {
    Context::new(languages)
        .with_timestamp("2024-01-01 00:00+0000")
        .with_package(PackageMetadata {
            name: String::from("fuzz"),
            version: String::from("1.0"),
            bug_report_url: Some(String::from("https://example.com/bugs")),
        })
        .with_identity(Identity {
            name: String::from("Fuzzer"),
            email: String::from("fuzz@example.com"),
        })
}

/// Wrapper enum for generating an arbitrary `FileKind`.
#[derive(Arbitrary, Debug, Copy, Clone)]
pub enum Kind {
    Po,
    Pot,
}

impl From<Kind> for FileKind {
    fn from(other: Kind) -> FileKind {
        match other {
            Kind::Po => FileKind::Po,
            Kind::Pot => FileKind::Pot,
        }
    }
}
