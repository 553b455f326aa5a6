// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Version Ordering
//!
//! The version comparator drives which images get superseded and which
//! get restored on every promotion, so its ordering must be a proper
//! total order and its parser must round-trip exactly.

use proptest::prelude::*;
use std::cmp::Ordering;

use inventory_lifecycle::domain::ImageVersion;

/// Strategy for arbitrary versions, with and without pre-release tags
fn version_strategy() -> impl Strategy<Value = ImageVersion> {
    (
        0u32..100,
        0u32..100,
        0u32..100,
        proptest::option::of("[a-zA-Z0-9.]{1,8}"),
    )
        .prop_map(|(major, minor, patch, prerelease)| ImageVersion {
            major,
            minor,
            patch,
            prerelease,
        })
}

proptest! {
    /// Comparison is antisymmetric: a < b implies b > a
    #[test]
    fn prop_ordering_is_antisymmetric(
        a in version_strategy(),
        b in version_strategy(),
    ) {
        match a.cmp(&b) {
            Ordering::Less => prop_assert_eq!(b.cmp(&a), Ordering::Greater),
            Ordering::Greater => prop_assert_eq!(b.cmp(&a), Ordering::Less),
            Ordering::Equal => prop_assert_eq!(b.cmp(&a), Ordering::Equal),
        }
    }

    /// Comparison is transitive over any three versions
    #[test]
    fn prop_ordering_is_transitive(
        a in version_strategy(),
        b in version_strategy(),
        c in version_strategy(),
    ) {
        let mut sorted = [a, b, c];
        sorted.sort();
        prop_assert!(sorted[0] <= sorted[1]);
        prop_assert!(sorted[1] <= sorted[2]);
        prop_assert!(sorted[0] <= sorted[2]);
    }

    /// A stable version sorts strictly above every pre-release of the
    /// same major.minor.patch
    #[test]
    fn prop_stable_beats_any_prerelease(
        major in 0u32..100,
        minor in 0u32..100,
        patch in 0u32..100,
        prerelease in "[a-zA-Z0-9.]{1,8}",
    ) {
        let stable = ImageVersion::new(major, minor, patch);
        let tagged = ImageVersion::prerelease(major, minor, patch, prerelease);
        prop_assert!(stable > tagged);
    }

    /// Display and parse round-trip exactly
    #[test]
    fn prop_display_parse_roundtrip(version in version_strategy()) {
        let rendered = version.to_string();
        let parsed: ImageVersion = rendered.parse().unwrap();
        prop_assert_eq!(parsed, version);
    }

    /// Equality holds exactly for identical tuples
    #[test]
    fn prop_equality_matches_tuple_identity(
        a in version_strategy(),
        b in version_strategy(),
    ) {
        let tuples_equal = a.major == b.major
            && a.minor == b.minor
            && a.patch == b.patch
            && a.prerelease == b.prerelease;
        prop_assert_eq!(a.cmp(&b) == Ordering::Equal, tuples_equal);
    }
}
