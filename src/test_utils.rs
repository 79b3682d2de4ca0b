//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    /// Generate a valid package name (lowercase alphanumeric with hyphens)
    pub fn package_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,30}[a-z0-9]?".prop_filter("Name must not be empty", |s| !s.is_empty())
    }

    /// Generate an upstream version like `1.2.3`
    pub fn recipe_version() -> impl Strategy<Value = String> {
        (0u32..100, 0u32..100, 0u32..100)
            .prop_map(|(major, minor, patch)| format!("{major}.{minor}.{patch}"))
    }

    /// Generate a release ordinal
    pub fn recipe_release() -> impl Strategy<Value = u32> {
        0u32..50
    }

    /// Generate a set of distinct artifact file names
    pub fn artifact_names(max: usize) -> impl Strategy<Value = Vec<String>> {
        prop::collection::btree_set(
            (package_name(), recipe_version(), recipe_release())
                .prop_map(|(name, version, release)| format!("{name}-{version}-r{release}.apk")),
            0..max,
        )
        .prop_map(|set| set.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use crate::config::defaults::MIN_PROPTEST_ITERATIONS;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(MIN_PROPTEST_ITERATIONS))]

        #[test]
        fn test_package_name_generator(name in package_name()) {
            prop_assert!(!name.is_empty());
            prop_assert!(name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }

        #[test]
        fn test_recipe_version_generator(version in recipe_version()) {
            let parts: Vec<&str> = version.split('.').collect();
            prop_assert_eq!(parts.len(), 3);
            for part in parts {
                prop_assert!(part.parse::<u32>().is_ok());
            }
        }

        #[test]
        fn test_artifact_names_are_apks(names in artifact_names(10)) {
            for name in &names {
                prop_assert!(name.ends_with(".apk"));
            }
        }
    }
}
