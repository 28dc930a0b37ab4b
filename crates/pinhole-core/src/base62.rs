//! Base-62 codec for short codes.
//!
//! The alphabet ordering is part of the public contract: it decides the exact
//! string produced for a given hash value, so codes minted by one deployment
//! stay resolvable by every other one. Digits are emitted most-significant
//! first with no padding, and zero encodes as the first symbol (`"a"`).

use crate::error::{CoreError, Result};

/// The fixed base-62 alphabet: lowercase, uppercase, then digits.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const BASE: u64 = ALPHABET.len() as u64;

/// Longest encoding of a `u64` (`u64::MAX` is 11 symbols).
pub const MAX_ENCODED_LEN: usize = 11;

const INVALID: u8 = u8::MAX;

const DECODE_TABLE: [u8; 128] = {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Encodes `value` as a base-62 string.
pub fn encode(value: u64) -> String {
    if value == 0 {
        return (ALPHABET[0] as char).to_string();
    }

    let mut buf = [0_u8; MAX_ENCODED_LEN];
    let mut pos = MAX_ENCODED_LEN;
    let mut rest = value;
    while rest > 0 {
        pos -= 1;
        buf[pos] = ALPHABET[(rest % BASE) as usize];
        rest /= BASE;
    }

    buf[pos..].iter().map(|&b| b as char).collect()
}

/// Returns the alphabet index of `symbol`, or `None` if it is not a base-62 symbol.
pub fn symbol_value(symbol: char) -> Option<u8> {
    let idx = symbol as usize;
    if idx >= DECODE_TABLE.len() {
        return None;
    }
    match DECODE_TABLE[idx] {
        INVALID => None,
        value => Some(value),
    }
}

/// Decodes a base-62 string back into its integer value.
///
/// Leading zero symbols are accepted and do not change the value, so only
/// canonical strings (as produced by [`encode`]) round-trip exactly.
pub fn decode(encoded: &str) -> Result<u64> {
    if encoded.is_empty() {
        return Err(CoreError::InvalidShortCode(
            "base62 input cannot be empty".to_string(),
        ));
    }

    encoded.chars().try_fold(0_u64, |acc, symbol| {
        let digit = symbol_value(symbol).ok_or_else(|| {
            CoreError::InvalidShortCode(format!("'{symbol}' is not a base62 symbol"))
        })?;
        acc.checked_mul(BASE)
            .and_then(|acc| acc.checked_add(u64::from(digit)))
            .ok_or_else(|| {
                CoreError::InvalidShortCode(format!("'{encoded}' overflows a 64-bit value"))
            })
    })
}
