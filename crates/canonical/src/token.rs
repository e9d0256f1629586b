use crate::pipeline::normalize;

/// Normalizes `text` and splits the result into its tokens.
///
/// Tokens are separated by the single space the normalizer emits, so this is
/// the token view every matcher uses.
pub fn normalize_tokens(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// A token is an abbreviation when it is a single alphabetic character
/// ("f" from "F.", "w" from "W.").
pub fn is_initial(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
}
