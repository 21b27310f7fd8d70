//! Random string generation for salts.
//!
//! Not intended for anything requiring unpredictability guarantees beyond
//! salt uniqueness.

use rand::seq::SliceRandom;
use rand::thread_rng;

const LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "1234567890";
// Symbols are restricted to characters safe inside URIs.
const SYMBOLS: &str = "-._~";

/// Length used when no explicit length is requested.
pub const DEFAULT_LENGTH: usize = 12;

/// Generate a random string of `length` characters, sampled uniformly with
/// replacement from ASCII letters, optionally extended with digits and the
/// URI-safe symbol set.
pub fn random_string(length: usize, include_digits: bool, include_symbols: bool) -> String {
    let mut alphabet: Vec<char> = LETTERS.chars().collect();
    if include_digits {
        alphabet.extend(DIGITS.chars());
    }
    if include_symbols {
        alphabet.extend(SYMBOLS.chars());
    }

    let mut rng = thread_rng();
    (0..length)
        .map(|_| *alphabet.choose(&mut rng).expect("alphabet is never empty"))
        .collect()
}

/// Salt shape used by `make_password`: twelve letters and digits.
pub fn default_salt() -> String {
    random_string(DEFAULT_LENGTH, true, false)
}
