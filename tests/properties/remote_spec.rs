//! Property tests for `[user@]host:path` parsing.

use proptest::prelude::*;

use ursync::probe::{RemoteSpec, Unavailable};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: parsing never panics on arbitrary input.
    #[test]
    fn property_parse_never_panics(s in "(?s).{0,128}") {
        let _ = RemoteSpec::parse(&s);
    }

    /// PROPERTY: without a `:` there is no host to reach.
    #[test]
    fn property_no_colon_is_a_host_error(s in "[^:]{0,64}") {
        let is_host_error = matches!(RemoteSpec::parse(&s), Err(Unavailable::RemoteHost { .. }));
        prop_assert!(is_host_error);
    }

    /// PROPERTY: a well-formed spec keeps its parts.
    #[test]
    fn property_well_formed_specs_parse(
        user in "[a-z][a-z0-9_]{0,8}",
        host in "[a-z][a-z0-9.-]{0,16}",
        path in "/[A-Za-z0-9/_.-]{0,32}",
    ) {
        let spec = RemoteSpec::parse(&format!("{}@{}:{}", user, host, path)).unwrap();
        prop_assert_eq!(spec.user.as_deref(), Some(user.as_str()));
        prop_assert_eq!(&spec.host, &host);
        prop_assert_eq!(&spec.path, &path);
        prop_assert_eq!(spec.destination(), format!("{}@{}", user, host));
    }
}
