//! Text and numeric normalization applied before any matching

pub mod numeric;
pub mod text;

pub use numeric::{normalize_numbers, parse_number, NormalizedNumbers, resolve_fractions, resolve_number_words};
pub use text::normalize_text;
