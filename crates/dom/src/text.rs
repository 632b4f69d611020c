//! Character-offset helpers.
//!
//! Offsets into character data are counted in Unicode scalar values, not
//! bytes. These helpers translate between the two.

/// Number of Unicode scalar values in `s`.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte index of the `chars`-th character, clamped to `s.len()`.
///
/// ```
/// use dom::byte_offset;
///
/// let s = "a€b";
/// assert_eq!(byte_offset(s, 0), 0);
/// assert_eq!(byte_offset(s, 1), 1);
/// assert_eq!(byte_offset(s, 2), 4);
/// assert_eq!(byte_offset(s, 9), 5);
/// ```
pub fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices()
        .nth(chars)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}

/// Substring between two character offsets. Out-of-range offsets clamp.
pub fn char_slice(s: &str, from: usize, to: usize) -> &str {
    if from >= to {
        return "";
    }
    let lo = byte_offset(s, from);
    let hi = byte_offset(s, to);
    &s[lo..hi]
}
