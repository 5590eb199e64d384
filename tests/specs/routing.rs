//! Channel routing specs
//!
//! Router resolution built from a parsed config, exercising override
//! precedence and pattern specificity end to end.

use crate::prelude::*;

#[test]
fn overrides_beat_patterns_beat_the_default() {
    let config = config(
        r##"
[routes]
default_channel = "#beads"

[[routes.rules]]
pattern = "acme/crew/*"
channel = "#acme-crew"

[[routes.rules]]
pattern = "*/crew/*"
channel = "#all-crews"

[routes.overrides]
"acme/crew/max" = "#max-direct"
"##,
    );
    let router = config.build_router();

    let hit = router.resolve("acme/crew/max");
    assert_eq!(hit.destination, "#max-direct");
    assert!(!hit.is_default);

    // More literal segments at equal length wins.
    let hit = router.resolve("acme/crew/ada");
    assert_eq!(hit.destination, "#acme-crew");

    let hit = router.resolve("other/crew/ada");
    assert_eq!(hit.destination, "#all-crews");

    let hit = router.resolve("nobody");
    assert_eq!(hit.destination, "#beads");
    assert!(hit.is_default);
}

#[test]
fn reverse_lookup_covers_overrides_only() {
    let config = config(
        r##"
[routes]
default_channel = "#beads"

[routes.overrides]
"acme/crew/max" = "#max-direct"
"##,
    );
    let router = config.build_router();

    assert_eq!(
        router.identity_for_destination("#max-direct"),
        Some("acme/crew/max".to_string())
    );
    assert_eq!(router.identity_for_destination("#beads"), None);
}

#[test]
fn removing_an_override_is_idempotent() {
    let config = config(
        r##"
[routes]
default_channel = "#beads"

[routes.overrides]
"acme/crew/max" = "#max-direct"
"##,
    );
    let router = config.build_router();

    router.remove_override("acme/crew/max");
    router.remove_override("acme/crew/max");
    assert_eq!(router.resolve("acme/crew/max").destination, "#beads");
}
