//! Film reconciliation text layer.
//!
//! This crate turns titles, director names and country names into a
//! deterministic comparable form. Every matcher downstream compares
//! normalized strings only, so two spellings that should match must meet here.
//!
//! ## What we do
//!
//! - Unicode NFKD decomposition, then combining marks are dropped
//!   ("Múrnau" == "Murnau", "Léon" == "Leon")
//! - Atomic letters without a decomposition are folded ("ø" -> "o", "ß" -> "ss")
//! - Locale-free lowercasing
//! - Punctuation and symbols become one separator: periods in initials and
//!   hyphens in compound names survive as token boundaries ("F.W." -> "f w",
//!   "Spider-Man" -> "spider man")
//! - Apostrophes are removed without a separator ("Schindler's" -> "schindlers")
//! - Whitespace collapses to single ASCII spaces with no leading/trailing space
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no OS/locale dependence, no failure mode. Empty and
//! purely numeric input are valid and come back as `""` and the digits.

mod fold;
mod pipeline;
mod token;
mod whitespace;

pub use crate::pipeline::normalize;
pub use crate::token::{is_initial, normalize_tokens};
pub use crate::whitespace::collapse_whitespace;
