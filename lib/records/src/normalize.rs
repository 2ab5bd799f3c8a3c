//! Text canonicalization for regulatory record fields

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a free-text field.
///
/// Decomposes to NFD and drops combining marks, replaces anything other than
/// letters, digits, whitespace and `- . , ( )` with a space, then collapses
/// whitespace runs to a single space and trims both ends. Total over all
/// inputs and idempotent.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.nfd().filter(|c| !is_combining_mark(*c)) {
        if is_kept(c) {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }

    out
}

/// [`normalize`] over an optional field; missing input yields an empty string.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

#[inline]
fn is_kept(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '.' | ',' | '(' | ')')
}

/// Upper-case the first letter of every letter run and lower-case the rest.
///
/// A letter run starts after any non-letter, so `"vitamina b12c"` becomes
/// `"Vitamina B12C"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}
