//! Keyword extraction — turns a profile into the seed material for passwords.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::profile::{FieldValue, Profile};

/// Tokens shorter than this are dropped.
pub const MIN_KEYWORD_LEN: usize = 3;

/// How many leading characters of a keyword end up in a password.
pub const PREFIX_LEN: usize = 3;

/// Extracts the deduplicated keyword set of a profile.
///
/// Text fields are split on whitespace and commas. List fields contribute
/// their elements whole. Other values are ignored. An empty set is a valid
/// result.
pub fn extract_keywords(profile: &Profile) -> BTreeSet<String> {
    let mut keywords = BTreeSet::new();

    for value in profile.values() {
        match value {
            FieldValue::Text(text) => {
                keywords.extend(
                    text.replace(',', " ")
                        .split_whitespace()
                        .filter(|token| is_long_enough(token))
                        .map(str::to_string),
                );
            }
            FieldValue::List(items) => {
                keywords.extend(items.iter().filter(|item| is_long_enough(item)).cloned());
            }
            FieldValue::Other(_) => {}
        }
    }

    keywords
}

fn is_long_enough(token: &str) -> bool {
    token.chars().count() >= MIN_KEYWORD_LEN
}

/// First `PREFIX_LEN` non-whitespace characters, first upper-cased and the
/// rest lower-cased.
///
/// Whitespace is skipped because list elements ("community service") are not
/// tokenized.
pub fn capitalized_prefix(keyword: &str) -> String {
    let mut chars = keyword.chars().filter(|c| !c.is_whitespace()).take(PREFIX_LEN);
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Draws `count` distinct keywords (fewer if the set is smaller) and
/// concatenates their prefixes.
pub fn sampled_prefixes<R: Rng + ?Sized>(
    keywords: &BTreeSet<String>,
    count: usize,
    rng: &mut R,
) -> String {
    let pool: Vec<&String> = keywords.iter().collect();
    pool.choose_multiple(rng, count.min(pool.len()))
        .map(|keyword| capitalized_prefix(keyword))
        .collect()
}
