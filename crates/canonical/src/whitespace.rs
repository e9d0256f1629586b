//! Whitespace normalization utilities.
//!
//! [`collapse_whitespace`] is the display-side helper: it tidies raw input
//! (query titles, catalog names) without folding case or accents, so the
//! text can still be shown to a user.
//!
//! ```rust
//! use canonical::collapse_whitespace;
//!
//! let normalized = collapse_whitespace("  Nosferatu \n  1922 ");
//! assert_eq!(normalized, "Nosferatu 1922");
//! ```

/// Collapses repeated whitespace, trims edges, and normalizes newlines to
/// single spaces.
///
/// All Unicode whitespace characters are treated as delimiters, including the
/// non-breaking space that spreadsheet exports like to leave behind.
///
/// ```rust
/// use canonical::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("hello\u{00A0}world"), "hello world");
/// assert_eq!(collapse_whitespace("   \n\t   "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}
