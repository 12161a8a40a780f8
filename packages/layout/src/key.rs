//! Node key generation.
//!
//! Keys are the base-32 rendering of a random 24-bit integer. A candidate is
//! discarded if it is already taken or if it reads as a plain number, so
//! ids never look like array indices.

use rand::Rng;

/// Exclusive upper bound of the random integer behind a key.
pub const KEY_SPACE: u32 = 1 << 24;

const DIGITS: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

/// Draw one candidate key.
pub fn random_key(rng: &mut impl Rng) -> String {
    to_base32(rng.gen_range(0..KEY_SPACE))
}

/// Draw candidates until `is_taken` rejects none of them, up to `attempts` draws.
///
/// Returns `None` when every attempt was rejected.
pub fn unique_key(
    rng: &mut impl Rng,
    attempts: u32,
    is_taken: impl Fn(&str) -> bool,
) -> Option<String> {
    (0..attempts)
        .map(|_| random_key(rng))
        .find(|key| !looks_numeric(key) && !is_taken(key))
}

/// Lowercase base-32 with digits `0-9a-v`, no padding.
pub fn to_base32(mut n: u32) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 32) as usize]);
        n /= 32;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Whether `key` would be read as a number.
///
/// Base-32 output can only form two numeric literal shapes: a run of decimal
/// digits (`"1234"`) and a digit run with a decimal exponent (`"12e4"`).
pub fn looks_numeric(key: &str) -> bool {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    match key.split_once('e') {
        Some((mantissa, exponent)) => all_digits(mantissa) && all_digits(exponent),
        None => all_digits(key),
    }
}
