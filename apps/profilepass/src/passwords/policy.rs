//! Password policy — the structural rules every returned password must satisfy.
//!
//! Validation never fails: an invalid candidate is a `false` / a list of
//! violations, not an error. Only building an unsatisfiable policy is an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MIN_LEN: usize = 12;
pub const DEFAULT_MAX_LEN: usize = 15;
pub const DEFAULT_SYMBOLS: &str = "!@#$%&*?+";

/// Number of character classes a valid password must contain.
pub const REQUIRED_CLASSES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("minimum length must be at least 1")]
    ZeroMinimum,

    #[error("minimum length {min} exceeds maximum length {max}")]
    InvertedBounds { min: usize, max: usize },

    #[error("maximum length {max} cannot hold one character of each required class")]
    MaximumTooShort { max: usize },

    #[error("symbol set is empty")]
    NoSymbols,

    #[error("symbol {0:?} is alphanumeric or whitespace")]
    InvalidSymbol(char),
}

/// A single failed rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyViolation {
    TooShort,
    TooLong,
    MissingLowercase,
    MissingUppercase,
    MissingDigit,
    MissingSymbol,
    ContainsWhitespace,
}

/// Length bounds plus the allowed symbol set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordPolicy {
    min_len: usize,
    max_len: usize,
    symbols: Vec<char>,
}

impl PasswordPolicy {
    pub fn new(min_len: usize, max_len: usize, symbols: &str) -> Result<Self, PolicyError> {
        if min_len == 0 {
            return Err(PolicyError::ZeroMinimum);
        }
        if min_len > max_len {
            return Err(PolicyError::InvertedBounds {
                min: min_len,
                max: max_len,
            });
        }
        if max_len < REQUIRED_CLASSES {
            return Err(PolicyError::MaximumTooShort { max: max_len });
        }

        let mut set: Vec<char> = Vec::new();
        for c in symbols.chars() {
            if c.is_alphanumeric() || c.is_whitespace() {
                return Err(PolicyError::InvalidSymbol(c));
            }
            if !set.contains(&c) {
                set.push(c);
            }
        }
        if set.is_empty() {
            return Err(PolicyError::NoSymbols);
        }

        Ok(Self {
            min_len,
            max_len,
            symbols: set,
        })
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn is_symbol(&self, c: char) -> bool {
        self.symbols.contains(&c)
    }

    /// Returns every rule `candidate` breaks. Empty means valid.
    ///
    /// Length is counted in chars, not bytes.
    pub fn violations(&self, candidate: &str) -> Vec<PolicyViolation> {
        let mut violations = Vec::new();
        let len = candidate.chars().count();

        if len < self.min_len {
            violations.push(PolicyViolation::TooShort);
        }
        if len > self.max_len {
            violations.push(PolicyViolation::TooLong);
        }
        if !candidate.chars().any(char::is_lowercase) {
            violations.push(PolicyViolation::MissingLowercase);
        }
        if !candidate.chars().any(char::is_uppercase) {
            violations.push(PolicyViolation::MissingUppercase);
        }
        if !candidate.chars().any(|c| c.is_ascii_digit()) {
            violations.push(PolicyViolation::MissingDigit);
        }
        if !candidate.chars().any(|c| self.is_symbol(c)) {
            violations.push(PolicyViolation::MissingSymbol);
        }
        if candidate.chars().any(char::is_whitespace) {
            violations.push(PolicyViolation::ContainsWhitespace);
        }

        violations
    }

    pub fn is_valid(&self, candidate: &str) -> bool {
        self.violations(candidate).is_empty()
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_len: DEFAULT_MIN_LEN,
            max_len: DEFAULT_MAX_LEN,
            symbols: DEFAULT_SYMBOLS.chars().collect(),
        }
    }
}
