//! Letter folding for characters that NFKD does not decompose.
//!
//! NFKD plus mark stripping already turns "Múrnau" into "murnau", but a handful
//! of Latin letters are atomic code points with no decomposition. Those are
//! mapped here to the ASCII spelling catalogs commonly use.

/// Returns the replacement for a lowercase letter without a Unicode decomposition.
pub(crate) fn fold_letter(ch: char) -> Option<&'static str> {
    let folded = match ch {
        '\u{00E6}' => "ae", // æ
        '\u{0153}' => "oe", // œ
        '\u{00DF}' => "ss", // ß
        '\u{00F8}' => "o",  // ø
        '\u{0142}' => "l",  // ł
        '\u{0111}' => "d",  // đ
        '\u{00F0}' => "d",  // ð
        '\u{00FE}' => "th", // þ
        '\u{0131}' => "i",  // dotless ı
        _ => return None,
    };
    Some(folded)
}

/// Apostrophes vanish without leaving a separator, so "Schindler's" and
/// "Schindlers" compare equal.
pub(crate) fn is_elided(ch: char) -> bool {
    matches!(ch, '\'' | '\u{2019}' | '\u{2018}' | '\u{02BC}' | '`')
}
