//! Tire size normalization
//!
//! Reduces free text such as "265/60R18", "265/60/18" or "33x12.5R15" to a
//! comparable key made of digits and an optional `x` marker for flotation
//! (off-road) sizes.
//!
//! Rules:
//! - every ASCII or Thai digit is kept (Thai digits are folded to ASCII)
//! - `x`, `X` and `×` are kept as `x` only between two digits, spaces allowed
//! - a `.` or `,` between digits starts a fractional part; one fractional digit
//!   is padded to two ("12.5" -> "1250"), longer parts are kept as written
//! - everything else is dropped

use serde::{Serialize, Serializer};
use std::fmt;

/// Canonical comparable form of a tire size
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NormalizedKey {
    key: String,
    digits: String,
}

impl NormalizedKey {
    /// The key including any `x` marker
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// The key with the `x` marker removed; this is what matching compares
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Number of digits in the key
    pub fn significant_digits(&self) -> usize {
        self.digits.len()
    }

    /// True when the text had no digits at all
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// True for flotation notation like "33x12.5R15"
    pub fn is_flotation(&self) -> bool {
        self.key.contains('x')
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl Serialize for NormalizedKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key)
    }
}

/// Map ASCII and Thai digits to their ASCII form
fn ascii_digit(c: char) -> Option<char> {
    match c {
        '0'..='9' => Some(c),
        '\u{0E50}'..='\u{0E59}' => char::from_digit(c as u32 - 0x0E50, 10),
        _ => None,
    }
}

fn is_digit(c: char) -> bool {
    ascii_digit(c).is_some()
}

/// Normalize arbitrary text into a size key. Total over any input.
pub fn normalize(text: &str) -> NormalizedKey {
    let chars: Vec<char> = text.chars().collect();
    let mut key = String::with_capacity(chars.len());

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];

        if let Some(d) = ascii_digit(c) {
            key.push(d);
            i += 1;
            continue;
        }

        match c {
            '.' | ',' if i > 0 && is_digit(chars[i - 1]) => {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && is_digit(chars[end]) {
                    end += 1;
                }
                let fraction = &chars[start..end];
                key.extend(fraction.iter().filter_map(|&d| ascii_digit(d)));
                if fraction.len() == 1 {
                    key.push('0');
                }
                i = end.max(start);
            }
            'x' | 'X' | '×' => {
                let prev = chars[..i].iter().rev().find(|c| !c.is_whitespace());
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if prev.copied().is_some_and(is_digit) && next.copied().is_some_and(is_digit) {
                    key.push('x');
                }
                i += 1;
            }
            _ => i += 1,
        }
    }

    let digits = key.chars().filter(|c| c.is_ascii_digit()).collect();
    NormalizedKey { key, digits }
}

/// Normalizer with a minimum significant-digit threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeNormalizer {
    min_digits: usize,
}

impl SizeNormalizer {
    pub fn new(min_digits: usize) -> Self {
        Self { min_digits }
    }

    /// Whether a key carries enough digits to be treated as a tire size
    pub fn is_significant(&self, key: &NormalizedKey) -> bool {
        key.significant_digits() >= self.min_digits
    }

    /// Normalize `text` and keep it only if it looks like a size query.
    ///
    /// `None` means the caller should treat the message as a general question.
    pub fn query_key(&self, text: &str) -> Option<NormalizedKey> {
        let key = normalize(text);
        if self.is_significant(&key) {
            Some(key)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "normalizer_tests.rs"]
mod tests;
