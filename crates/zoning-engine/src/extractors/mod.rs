//! Numeric extraction outside dimensional tables

pub mod free_text;

pub use free_text::{FreeTextExtractor, Topic};
