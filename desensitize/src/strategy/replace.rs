//! Region replacement over Unicode scalar values.
//!
//! Both functions take a half-open region `[start, end)` counted in `char`s
//! and are total: out-of-range regions are clamped or ignored rather than
//! rejected, so callers can pass ranges derived from configuration without
//! validating them first.
//!
//! - `start > len` leaves the text unchanged.
//! - `end > len` is clamped to `len`.
//! - `start >= end` after clamping leaves the text unchanged.

/// Clamps `[start, end)` to the text, returning `None` when nothing is masked.
fn clamp(text: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    if text.is_empty() {
        return None;
    }
    let len = text.chars().count();
    if start > len {
        return None;
    }
    let end = end.min(len);
    if start >= end {
        return None;
    }
    Some((start, end))
}

/// Replaces every character in `[start, end)` with `replacement`.
///
/// The result has the same number of characters as the input.
///
/// ```rust
/// use desensitize::replace::replace_each;
///
/// assert_eq!(replace_each("smile", 1, 3, '*'), "s**le");
/// assert_eq!(replace_each("smile", 3, 99, '#'), "smi##");
/// ```
#[must_use]
pub fn replace_each(text: &str, start: usize, end: usize, replacement: char) -> String {
    let Some((start, end)) = clamp(text, start, end) else {
        return text.to_owned();
    };
    text.chars()
        .enumerate()
        .map(|(index, ch)| {
            if (start..end).contains(&index) {
                replacement
            } else {
                ch
            }
        })
        .collect()
}

/// Replaces the whole region `[start, end)` with a single copy of `replacement`.
///
/// ```rust
/// use desensitize::replace::replace_once;
///
/// assert_eq!(replace_once("smile", 1, 4, "<hidden>"), "s<hidden>e");
/// ```
#[must_use]
pub fn replace_once(text: &str, start: usize, end: usize, replacement: &str) -> String {
    let Some((start, end)) = clamp(text, start, end) else {
        return text.to_owned();
    };
    let mut masked = String::with_capacity(text.len() + replacement.len());
    for (index, ch) in text.chars().enumerate() {
        if index == start {
            masked.push_str(replacement);
        }
        if !(start..end).contains(&index) {
            masked.push(ch);
        }
    }
    masked
}
