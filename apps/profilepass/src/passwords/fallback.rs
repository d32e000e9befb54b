//! Fallback generation — the path that always yields a policy-valid password.
//!
//! Algorithm:
//! 1. Base = prefixes of up to 2 sampled keywords (empty without keywords),
//!    trimmed so one character of every class still fits under `max_len`.
//! 2. One random character is added for each class the base is missing.
//! 3. Random characters from the full alphabet pad to `min_len`.
//! 4. The added characters are shuffled and appended to the base.
//!
//! Steps 1 and 2 together make the result valid for any policy that
//! `PasswordPolicy::new` accepts.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::passwords::keywords::sampled_prefixes;
use crate::passwords::policy::{PasswordPolicy, REQUIRED_CLASSES};

const LOWERCASE: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];
const UPPERCASE: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];
const DIGITS: &[char] = &['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Maximum number of keywords contributing to the base.
const MAX_BASE_KEYWORDS: usize = 2;

pub fn fallback_password<R: Rng + ?Sized>(
    keywords: &BTreeSet<String>,
    policy: &PasswordPolicy,
    rng: &mut R,
) -> String {
    let mut base: Vec<char> = sampled_prefixes(keywords, MAX_BASE_KEYWORDS, rng)
        .chars()
        .collect();
    base.truncate(policy.max_len().saturating_sub(REQUIRED_CLASSES));

    let mut tail: Vec<char> = Vec::with_capacity(policy.max_len());

    let classes: [(&[char], fn(&char, &PasswordPolicy) -> bool); REQUIRED_CLASSES] = [
        (LOWERCASE, |c, _| c.is_lowercase()),
        (UPPERCASE, |c, _| c.is_uppercase()),
        (DIGITS, |c, _| c.is_ascii_digit()),
        (policy.symbols(), |c, p| p.is_symbol(*c)),
    ];
    for (alphabet, present) in classes {
        if !base.iter().any(|c| present(c, policy)) {
            if let Some(c) = alphabet.choose(rng) {
                tail.push(*c);
            }
        }
    }

    let alphabet: Vec<char> = LOWERCASE
        .iter()
        .chain(UPPERCASE)
        .chain(DIGITS)
        .chain(policy.symbols())
        .copied()
        .collect();
    while base.len() + tail.len() < policy.min_len() {
        if let Some(c) = alphabet.choose(rng) {
            tail.push(*c);
        }
    }

    tail.shuffle(rng);
    base.extend(tail);
    base.truncate(policy.max_len());
    base.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_empty_keywords_always_valid() {
        let policy = PasswordPolicy::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let pw = fallback_password(&BTreeSet::new(), &policy, &mut rng);
            assert!(policy.is_valid(&pw), "{pw} violates {:?}", policy.violations(&pw));
        }
    }

    #[test]
    fn test_keywords_always_valid() {
        let policy = PasswordPolicy::default();
        let mut rng = StdRng::seed_from_u64(12);
        let keywords = set(&["chess", "yoga", "Troy", "community service"]);
        for _ in 0..1000 {
            let pw = fallback_password(&keywords, &policy, &mut rng);
            assert!(policy.is_valid(&pw), "{pw} violates {:?}", policy.violations(&pw));
        }
    }

    #[test]
    fn test_base_comes_from_keyword_prefixes() {
        let policy = PasswordPolicy::default();
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..100 {
            let pw = fallback_password(&set(&["chess", "yoga"]), &policy, &mut rng);
            assert!(pw.starts_with("CheYog") || pw.starts_with("YogChe"), "{pw}");
        }
    }

    #[test]
    fn test_letterless_keywords_still_valid() {
        let policy = PasswordPolicy::default();
        let mut rng = StdRng::seed_from_u64(14);
        for _ in 0..500 {
            let pw = fallback_password(&set(&["2024", "!!!"]), &policy, &mut rng);
            assert!(policy.is_valid(&pw), "{pw}");
        }
    }

    #[test]
    fn test_tight_policy_keeps_every_class() {
        // Base alone would fill the whole length budget.
        let policy = PasswordPolicy::new(4, 4, "#").unwrap();
        let mut rng = StdRng::seed_from_u64(15);
        for _ in 0..500 {
            let pw = fallback_password(&set(&["chess", "yoga"]), &policy, &mut rng);
            assert_eq!(pw.chars().count(), 4);
            assert!(policy.is_valid(&pw), "{pw}");
        }
    }

    #[test]
    fn test_long_policy_pads_to_minimum() {
        let policy = PasswordPolicy::new(32, 40, "!@").unwrap();
        let mut rng = StdRng::seed_from_u64(16);
        let pw = fallback_password(&set(&["chess"]), &policy, &mut rng);
        assert_eq!(pw.chars().count(), 32);
        assert!(policy.is_valid(&pw));
    }

    #[test]
    fn test_non_ascii_prefixes_count_as_chars() {
        let policy = PasswordPolicy::default();
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..200 {
            let pw = fallback_password(&set(&["élodie", "Ørsted"]), &policy, &mut rng);
            assert!(policy.is_valid(&pw), "{pw}");
        }
    }
}
