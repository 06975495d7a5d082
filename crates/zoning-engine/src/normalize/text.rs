//! Document text normalization
//!
//! Steps run in a fixed order; later steps assume the earlier ones have run
//! (the synonym table expects lower-case text with single spaces, the
//! footnote repair expects citations and dates to be gone).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref URL_PATTERN: Regex =
        Regex::new(r"(?i)\b(?:https?://|www\.)\S+|\b[\w\-]+(?:\.[\w\-]+)*\.(?:com|org|gov|net|us)\b(?:/\S*)?").unwrap();

    static ref ORDINANCE_CITATION: Regex =
        Regex::new(r"(?i)\bord(?:inance)?\.?\s+no\.?\s*[\w\-.]*\d[\w\-]*").unwrap();

    static ref SECTION_CITATION: Regex =
        Regex::new(r"(?i)\b(?:sections?|sec\.)\s*\d+(?:[.\-]\d+)*(?:\s*\([a-z0-9]{1,3}\))*").unwrap();

    static ref NUMERIC_DATE: Regex =
        Regex::new(r"\b\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4}\b").unwrap();

    static ref WRITTEN_DATE: Regex = Regex::new(
        r"(?i)\b(?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{1,2},?\s+\d{4}\b"
    ).unwrap();

    static ref PAGE_ARTIFACT: Regex =
        Regex::new(r"(?i)\bpage\s+\d+(?:\s+of\s+\d+)?\b|(?:^|\s)-\d{1,4}-(?:\s|$)").unwrap();

    /// A thousands-grouped number whose final group carries extra digits
    static ref FOOTNOTE_GROUP: Regex = Regex::new(r"\b(\d{1,3}(?:,\d{3})+)\d+\b").unwrap();

    static ref THOUSANDS_GROUP: Regex = Regex::new(r"\b\d{1,3}(?:,\d{3})+\b").unwrap();

    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    /// Orthographic variants mapped to one canonical phrase. Every rule maps
    /// its own output to itself, so the table can be re-applied safely.
    static ref SYNONYMS: Vec<(Regex, &'static str)> = [
        (r"\bsingle[\s\-]?famil(?:y|ies)\b|\bone[\s\-]famil(?:y|ies)\b", "single family"),
        (r"\btwo[\s\-]?famil(?:y|ies)\b", "two family"),
        (r"\b(?:multi|multiple)[\s\-]?famil(?:y|ies)\b", "multifamily"),
        (r"\bmixed[\s\-]?uses?\b", "mixed use"),
        (r"\badu's|\badus?\b|\baccessory apartments?\b|\bgranny flats?\b", "accessory dwelling unit"),
        (r"\bsq\.?\s?ft\b\.?|\bsq\.?\s?feet\b|\bsquare foot\b|\bsqft\b|\bs\.f\.", "square feet"),
        (r"\s*/\s*ac(?:res?)?\b\.?|\bper ac\b\.?", " per acre"),
        (r"\bdwelling[\s\-]units?\b|\bd\.u\.(?:'?s\b)?|\bdus?\b", "dwelling unit"),
        (r"\bplanned[\s\-]unit[\s\-]developments?\b|\bp\.u\.d\.|\bpuds?\b", "planned unit development"),
        (r"\blot[\s\-]?area\b", "lot area"),
        (r"\bset[\s\-]?backs?\b", "setback"),
        (r"\bft\b\.?|\bfoot\b", "feet"),
        (r"\bstor(?:y|ey|eys)\b", "stories"),
        (r"\bparking (?:spaces|stalls?)\b", "parking space"),
        (r"\boff[\s\-]street\b", "off street"),
        (r"\bzba\b|\bboard of zoning appeals\b|\bzoning board of appeal\b", "zoning board of appeals"),
    ]
    .iter()
    .map(|(pattern, canonical)| (Regex::new(pattern).unwrap(), *canonical))
    .collect();

    /// `35'` written for thirty-five feet
    static ref FOOT_MARK: Regex = Regex::new(r"(\d)'").unwrap();
}

/// Normalize raw ordinance text into the single string every later stage reads
pub fn normalize_text(raw: &str) -> String {
    let ascii = strip_non_ascii(raw);
    let collapsed = collapse_whitespace(&ascii);
    let cleaned = strip_boilerplate(&collapsed);
    let lowered = cleaned.to_lowercase();
    let canonical = standardize_synonyms(&lowered);
    let repaired = repair_footnote_digits(&canonical);
    collapse_whitespace(&repaired)
}

/// Transliterate typographic characters, then drop everything that is not
/// printable ASCII or whitespace
pub fn strip_non_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201B}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{2033}' => out.push('"'),
            '\u{2010}'..='\u{2015}' | '\u{2212}' => out.push('-'),
            '\u{00BD}' => out.push_str(" 1/2"),
            '\u{00BC}' => out.push_str(" 1/4"),
            '\u{00BE}' => out.push_str(" 3/4"),
            '\u{00A7}' => out.push_str(" section "),
            '\u{00A0}' | '\u{2022}' | '\u{00B7}' => out.push(' '),
            c if c.is_ascii_graphic() || c.is_ascii_whitespace() => out.push(c),
            _ => {}
        }
    }
    out
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Remove URLs, citations, date stamps and page-number artifacts
pub fn strip_boilerplate(text: &str) -> String {
    let t = URL_PATTERN.replace_all(text, " ");
    let t = ORDINANCE_CITATION.replace_all(&t, " ");
    let t = SECTION_CITATION.replace_all(&t, " ");
    let t = NUMERIC_DATE.replace_all(&t, " ");
    let t = WRITTEN_DATE.replace_all(&t, " ");
    let t = PAGE_ARTIFACT.replace_all(&t, " ");
    t.into_owned()
}

/// Apply the synonym table to lower-case text
pub fn standardize_synonyms(text: &str) -> String {
    let mut out = FOOT_MARK.replace_all(text, "${1} feet").into_owned();
    for (pattern, canonical) in SYNONYMS.iter() {
        if pattern.is_match(&out) {
            out = pattern.replace_all(&out, *canonical).into_owned();
        }
    }
    out
}

/// Truncate footnote digits glued onto thousands-grouped numbers, then drop
/// the grouping commas (`1,0005` becomes `1000`)
pub fn repair_footnote_digits(text: &str) -> String {
    let truncated = FOOTNOTE_GROUP.replace_all(text, "${1}");
    THOUSANDS_GROUP
        .replace_all(&truncated, |caps: &regex::Captures| caps[0].replace(',', ""))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_variants_share_one_form() {
        let expected = normalize_text("single family");
        assert_eq!(expected, "single family");
        assert_eq!(normalize_text("Single-Family"), expected);
        assert_eq!(normalize_text("singlefamily"), expected);
        assert_eq!(normalize_text("SINGLE FAMILIES"), expected);
        assert_eq!(normalize_text("one-family"), expected);
        assert_eq!(normalize_text("Multi-Family"), "multifamily");
        assert_eq!(normalize_text("multiple family"), "multifamily");
        assert_eq!(normalize_text("two-family"), "two family");
    }

    #[test]
    fn test_strips_non_ascii_and_collapses_whitespace() {
        assert_eq!(
            normalize_text("Lot\t\tArea\n\n  café \u{0007}"),
            "lot area caf"
        );
        assert_eq!(normalize_text("1\u{00BD} acres"), "1 1/2 acres");
        assert_eq!(normalize_text("R\u{2013}1"), "r-1");
    }

    #[test]
    fn test_removes_citations_urls_and_dates() {
        let text = "See Section 4.2.1(a) of Ordinance No. 2019-14, adopted January 5, 2019 \
                    and posted at https://library.municode.com/x Page 3 of 40 height";
        assert_eq!(normalize_text(text), "see of , adopted and posted at height");
        assert_eq!(normalize_text("amended 3/12/2018 by council"), "amended by council");
    }

    #[test]
    fn test_units_canonicalized() {
        assert_eq!(normalize_text("7,500 sq. ft."), "7500 square feet");
        assert_eq!(normalize_text("12 du/ac"), "12 dwelling unit per acre");
        assert_eq!(normalize_text("12 units/acre"), "12 units per acre");
        assert_eq!(normalize_text("35 ft. max"), "35 feet max");
        assert_eq!(normalize_text("35' height"), "35 feet height");
        assert_eq!(normalize_text("2.5 storey"), "2.5 stories");
        assert_eq!(normalize_text("2 parking stalls"), "2 parking space");
        assert_eq!(normalize_text("P.U.D. district"), "planned unit development district");
        assert_eq!(normalize_text("ZBA"), "zoning board of appeals");
    }

    #[test]
    fn test_footnote_digits_repaired() {
        assert_eq!(repair_footnote_digits("1,0005"), "1000");
        assert_eq!(repair_footnote_digits("minimum 12,5003 square feet"), "minimum 12500 square feet");
        assert_eq!(repair_footnote_digits("1,500,0002"), "1500000");
        assert_eq!(repair_footnote_digits("7,500"), "7500");
        assert_eq!(repair_footnote_digits("r-1, r-2"), "r-1, r-2");
    }

    #[test]
    fn test_canonical_text_is_fixed_point() {
        let canonical = "single family two family multifamily mixed use accessory dwelling unit \
                         7500 square feet 12 dwelling unit per acre planned unit development \
                         lot area setback 35 feet 2 stories parking space off street \
                         zoning board of appeals";
        assert_eq!(normalize_text(canonical), canonical);
    }

    #[test]
    fn test_never_panics_on_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   \n\t"), "");
    }
}
