//! Property tests for rsync trailing-slash normalization.

use proptest::prelude::*;

use ursync::compile::normalize_path;

fn path_string() -> impl Strategy<Value = String> {
    proptest::string::string_regex("/?([A-Za-z0-9._ -]{1,12}/){0,4}[A-Za-z0-9._ -]{0,12}/{0,3}")
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: normalizing an already normalized path is a no-op.
    #[test]
    fn property_normalize_is_idempotent(path in path_string(), preserve in any::<bool>()) {
        let once = normalize_path(&path, preserve);
        prop_assert_eq!(normalize_path(&once, preserve), once);
    }

    /// PROPERTY: contents transfers end in `/`; directory transfers do not
    /// (except the root itself).
    #[test]
    fn property_trailing_slash_matches_intent(path in path_string()) {
        prop_assert!(normalize_path(&path, false).ends_with('/'));

        let preserved = normalize_path(&path, true);
        prop_assert!(preserved == "/" || !preserved.ends_with('/'));
    }

    /// PROPERTY: normalization only touches trailing slashes.
    #[test]
    fn property_normalize_keeps_the_stem(path in path_string(), preserve in any::<bool>()) {
        let stem = path.trim_end_matches('/');
        let normalized = normalize_path(&path, preserve);
        prop_assert!(normalized.starts_with(stem));
    }
}
