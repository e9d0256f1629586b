use unicode_categories::UnicodeCategories;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::fold::{fold_letter, is_elided};

/// Main entry point. Turns a free-text title or name into its comparable form.
///
/// Never fails: empty, whitespace-only, or punctuation-only input yields `""`.
pub fn normalize(input: &str) -> String {
    // Compatibility decomposition splits "é" into "e" + U+0301 so the mark can
    // be dropped below. Fullwidth and other compatibility forms fold here too.
    let decomposed: String = input.nfkd().collect();

    let mut normalized = String::with_capacity(decomposed.len());
    let mut pending_space = false;

    for grapheme in decomposed.graphemes(true) {
        // Lowercasing can expand a single character (e.g. "İ" -> "i" + U+0307),
        // so marks are filtered after it, not before.
        for lower in grapheme.to_lowercase().chars() {
            dispatch_char(lower, &mut normalized, &mut pending_space);
        }
    }

    normalized
}

/// Decides whether a character is kept, folded, dropped, or acts as a separator.
fn dispatch_char(ch: char, normalized: &mut String, pending_space: &mut bool) {
    if is_combining_mark(ch) || is_elided(ch) {
        return;
    }

    if let Some(folded) = fold_letter(ch) {
        for c in folded.chars() {
            append_char(c, normalized, pending_space);
        }
        return;
    }

    if is_separator(ch) {
        // Leading separators never produce a space.
        if !normalized.is_empty() {
            *pending_space = true;
        }
    } else {
        append_char(ch, normalized, pending_space);
    }
}

fn append_char(ch: char, normalized: &mut String, pending_space: &mut bool) {
    if *pending_space {
        normalized.push(' ');
        *pending_space = false;
    }
    normalized.push(ch);
}

/// Whitespace, punctuation (periods in initials, hyphens, commas, colons ...),
/// symbols and control characters all collapse to the single separator.
fn is_separator(ch: char) -> bool {
    ch.is_whitespace()
        || ch.is_punctuation()
        || ch.is_symbol()
        || ch.is_other_control()
        || ch.is_other_format()
}
