//! Provider filter resolution against the remote provider catalog.
//!
//! Operators may type the exact name, a casually capitalized one, or a
//! fragment. Tiers are tried strictly in order and each tier walks the
//! catalog in order, so an exact match is never shadowed by a looser one.

use crate::error::{Error, Result};

/// One matching tier. Receives the raw input, its trimmed lowercase form,
/// and a catalog entry.
type Tier = fn(raw: &str, needle: &str, candidate: &str) -> bool;

const TIERS: [(&str, Tier); 3] = [
    ("exact", exact),
    ("case-insensitive", case_insensitive),
    ("substring", substring),
];

fn exact(raw: &str, _needle: &str, candidate: &str) -> bool {
    candidate == raw
}

fn case_insensitive(_raw: &str, needle: &str, candidate: &str) -> bool {
    candidate.to_lowercase() == needle
}

fn substring(_raw: &str, needle: &str, candidate: &str) -> bool {
    candidate.to_lowercase().contains(needle)
}

/// Resolves `input` to exactly one canonical provider name.
///
/// Returns `Ok(None)` when there is nothing to filter on: an empty input, or
/// one that is only whitespace.
///
/// # Errors
///
/// Returns [`Error::ProviderNotFound`] carrying the original input if no
/// tier matches.
pub fn resolve_provider<S: AsRef<str>>(input: &str, catalog: &[S]) -> Result<Option<String>> {
    if input.is_empty() {
        return Ok(None);
    }

    let needle = input.trim().to_lowercase();

    for (index, (name, tier)) in TIERS.iter().enumerate() {
        // Past the exact tier, a blank needle would match everything.
        if index > 0 && needle.is_empty() {
            return Ok(None);
        }
        if let Some(found) = catalog
            .iter()
            .map(AsRef::as_ref)
            .find(|candidate| tier(input, &needle, candidate))
        {
            log::debug!("Provider {input:?} resolved to {found:?} ({name} match)");
            return Ok(Some(found.to_string()));
        }
    }

    Err(Error::ProviderNotFound {
        input: input.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: [&str; 3] = ["Électricité Co", "water-corp", "Water Corp Admin"];

    fn resolve(input: &str) -> Result<Option<String>> {
        resolve_provider(input, &CATALOG)
    }

    #[test]
    fn empty_input_means_no_filter() {
        assert_eq!(resolve("").unwrap(), None);
        assert_eq!(resolve_provider::<&str>("", &[]).unwrap(), None);
    }

    #[test]
    fn whitespace_input_means_no_filter() {
        assert_eq!(resolve("   ").unwrap(), None);
    }

    #[test]
    fn exact_match_wins() {
        assert_eq!(resolve("water-corp").unwrap().as_deref(), Some("water-corp"));
        assert_eq!(
            resolve("Water Corp Admin").unwrap().as_deref(),
            Some("Water Corp Admin")
        );
    }

    #[test]
    fn case_insensitive_trimmed_match() {
        assert_eq!(
            resolve("  WATER-CORP ").unwrap().as_deref(),
            Some("water-corp")
        );
        assert_eq!(
            resolve("électricité co").unwrap().as_deref(),
            Some("Électricité Co")
        );
    }

    #[test]
    fn substring_takes_first_in_catalog_order() {
        assert_eq!(resolve("water").unwrap().as_deref(), Some("water-corp"));
        assert_eq!(resolve("corp").unwrap().as_deref(), Some("water-corp"));
    }

    #[test]
    fn substring_is_literal() {
        // "water corp" is inside "water corp admin" but not inside "water-corp".
        assert_eq!(
            resolve("water corp").unwrap().as_deref(),
            Some("Water Corp Admin")
        );
    }

    #[test]
    fn exact_tier_beats_earlier_substring_candidate() {
        let catalog = ["Gas Services", "Gas"];
        assert_eq!(
            resolve_provider("gas", &catalog).unwrap().as_deref(),
            Some("Gas")
        );
        assert_eq!(
            resolve_provider("Gas", &catalog).unwrap().as_deref(),
            Some("Gas")
        );
    }

    #[test]
    fn unknown_provider_echoes_original_input() {
        let err = resolve(" Telecom ").unwrap_err();
        match err {
            Error::ProviderNotFound { input } => assert_eq!(input, " Telecom "),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn accepts_owned_catalog() {
        let catalog = vec!["Alpha".to_string(), "Beta".to_string()];
        assert_eq!(
            resolve_provider("bet", &catalog).unwrap().as_deref(),
            Some("Beta")
        );
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn exact_entry_always_resolves_to_itself(
                catalog in prop::collection::vec("[A-Za-z ]{1,12}", 1..6),
                pick in any::<prop::sample::Index>(),
            ) {
                let chosen = pick.get(&catalog).clone();
                let resolved = resolve_provider(&chosen, &catalog).unwrap();
                prop_assert_eq!(resolved, Some(chosen));
            }
        }
    }
}
