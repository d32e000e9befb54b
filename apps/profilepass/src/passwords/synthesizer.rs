//! Candidate synthesis — the "what would this person pick" guess.
//!
//! Shape: `<keyword prefixes><filler><symbol><digit>`, e.g. `CheYogx4k!7`.
//! Nothing here checks the policy; the engine validates every candidate.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::passwords::keywords::sampled_prefixes;
use crate::passwords::policy::PasswordPolicy;

/// Core used when a profile has no keywords.
pub const EMPTY_CORE: &str = "User";

/// Filler draws from lowercase letters and digits, the way people pad a word.
const FILLER_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

const DIGITS: &[u8] = b"0123456789";

/// Builds one raw candidate. Keywords are re-sampled on every call so that
/// successive candidates for the same profile differ.
pub fn synthesize<R: Rng + ?Sized>(
    keywords: &BTreeSet<String>,
    policy: &PasswordPolicy,
    rng: &mut R,
) -> String {
    let mut candidate = if keywords.is_empty() {
        EMPTY_CORE.to_string()
    } else {
        let picks = rng.gen_range(1..=keywords.len().min(2));
        sampled_prefixes(keywords, picks, rng)
    };

    // symbol + digit
    let reserved = candidate.chars().count() + 2;
    let filler_len = if reserved < policy.min_len() {
        let low = policy.min_len() - reserved;
        let high = policy.max_len() - reserved;
        rng.gen_range(low..=high)
    } else {
        0
    };
    candidate.extend((0..filler_len).map(|_| pick(FILLER_CHARS, rng)));

    if let Some(symbol) = policy.symbols().choose(rng) {
        candidate.push(*symbol);
    }
    candidate.push(pick(DIGITS, rng));

    candidate
}

fn pick<R: Rng + ?Sized>(alphabet: &[u8], rng: &mut R) -> char {
    alphabet[rng.gen_range(0..alphabet.len())] as char
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
    fn test_ends_with_symbol_then_digit() {
        let policy = PasswordPolicy::default();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let candidate: Vec<char> = synthesize(&set(&["chess", "yoga"]), &policy, &mut rng)
                .chars()
                .collect();
            let n = candidate.len();
            assert!(candidate[n - 1].is_ascii_digit());
            assert!(policy.is_symbol(candidate[n - 2]));
        }
    }

    #[test]
    fn test_starts_with_a_keyword_prefix() {
        let policy = PasswordPolicy::default();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            let candidate = synthesize(&set(&["chess", "yoga", "Troy"]), &policy, &mut rng);
            assert!(
                ["Che", "Yog", "Tro"].iter().any(|p| candidate.starts_with(p)),
                "{candidate} does not start with a keyword prefix"
            );
        }
    }

    #[test]
    fn test_empty_keywords_use_sentinel_core() {
        let policy = PasswordPolicy::default();
        let mut rng = StdRng::seed_from_u64(3);
        let candidate = synthesize(&BTreeSet::new(), &policy, &mut rng);
        assert!(candidate.starts_with(EMPTY_CORE));
    }

    #[test]
    fn test_filler_lands_length_in_range() {
        let policy = PasswordPolicy::default();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..200 {
            let candidate = synthesize(&set(&["chess", "yoga"]), &policy, &mut rng);
            let len = candidate.chars().count();
            assert!((12..=15).contains(&len), "{candidate} has length {len}");
        }
    }

    #[test]
    fn test_valid_for_ordinary_keywords() {
        let policy = PasswordPolicy::default();
        let mut rng = StdRng::seed_from_u64(5);
        let valid = (0..200)
            .filter(|_| policy.is_valid(&synthesize(&set(&["chess", "yoga"]), &policy, &mut rng)))
            .count();
        assert_eq!(valid, 200);
    }

    #[test]
    fn test_digit_keywords_can_produce_invalid_candidates() {
        // "2024" has no letters, so a single-keyword core lacks both cases
        // and the filler adds only lowercase.
        let policy = PasswordPolicy::default();
        let mut rng = StdRng::seed_from_u64(6);
        let candidate = synthesize(&set(&["2024"]), &policy, &mut rng);
        assert!(candidate.starts_with("202"));
        assert!(!policy.is_valid(&candidate));
    }

    #[test]
    fn test_samples_are_rerolled_per_call() {
        let policy = PasswordPolicy::default();
        let mut rng = StdRng::seed_from_u64(8);
        let keywords = set(&["chess", "yoga", "Troy", "robotics"]);
        let cores: BTreeSet<String> = (0..50)
            .map(|_| synthesize(&keywords, &policy, &mut rng).chars().take(3).collect())
            .collect();
        assert!(cores.len() > 1);
    }

    #[test]
    fn test_same_seed_same_candidate() {
        let policy = PasswordPolicy::default();
        let keywords = set(&["chess", "yoga", "Troy"]);
        let a = synthesize(&keywords, &policy, &mut StdRng::seed_from_u64(9));
        let b = synthesize(&keywords, &policy, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
