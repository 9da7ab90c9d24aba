//! Property tests for catalog loading.

use std::path::Path;

use proptest::prelude::*;

use ursync::{Catalog, CatalogError};

fn site_entry() -> impl Strategy<Value = String> {
    (
        "[a-z]{1,6}",
        prop_oneof![Just("local"), Just("snapshot"), Just("usb"), Just("")],
        prop::bool::ANY,
    )
        .prop_map(|(id, kind, with_name)| {
            let name = if with_name { "name = \"n\"\n" } else { "" };
            format!(
                "[[site]]\nid = \"{id}\"\n{name}source = {{ type = \"local\", path = \"/a\" }}\n\
                 destination = {{ type = \"{kind}\", path = \"/b\" }}\n"
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: arbitrary text never panics the loader.
    #[test]
    fn property_parse_never_panics(s in "(?s).{0,256}") {
        let _ = Catalog::parse(&s, Path::new("sites.toml"));
    }

    /// PROPERTY: a catalog either loads or reports at least one error, and
    /// the reported count matches the violations listed.
    #[test]
    fn property_errors_are_counted(entries in prop::collection::vec(site_entry(), 0..5)) {
        let text = entries.concat();
        match Catalog::parse(&text, Path::new("sites.toml")) {
            Ok(loaded) => prop_assert_eq!(loaded.catalog.sites().len(), entries.len()),
            Err(err @ CatalogError::Invalid { .. }) => {
                prop_assert!(err.count() >= 1);
                prop_assert_eq!(err.count(), err.violations().len());
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}
