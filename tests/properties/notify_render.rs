//! Property tests for notification placeholder substitution.

use proptest::prelude::*;

use ursync::notify::{render, PLACEHOLDER};

proptest! {
    /// PROPERTY: no placeholder survives rendering when the ids carry none.
    #[test]
    fn property_placeholders_are_all_replaced(
        parts in prop::collection::vec("[a-z !'-]{0,8}", 1..5),
        ids in prop::collection::vec("[a-z0-9_]{1,8}", 1..4),
    ) {
        let template = parts.join(PLACEHOLDER);
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        let rendered = render(&template, &ids);

        prop_assert!(!rendered.contains(PLACEHOLDER));
        if parts.len() > 1 {
            prop_assert!(rendered.contains(&ids.join(", ")));
        }
    }
}
