//! Numeric-literal normalization
//!
//! Two pure string transforms run before any numeric extraction:
//! fractions become decimals, and spelled-out numbers become digits.
//! Neither ever fails; anything it cannot resolve is passed through.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    /// `1 1/2`; the leading group keeps `r-1 1/2` from being read as a mixed number
    static ref MIXED_DIGITS: Regex =
        Regex::new(r"(^|[^\w\-.])(\d+)\s+(\d+)/(\d+)\b(/\d+)?").unwrap();

    static ref SLASH_FRACTION: Regex =
        Regex::new(r"(^|[^\w\-./])(\d+(?:\.\d+)?)/(\d+(?:\.\d+)?)\b(/\d+)?").unwrap();

    static ref WORD_FRACTION: Regex = Regex::new(
        r"(?i)(^|[^a-z0-9\-])(?:(\d+(?:\.\d+)?|[a-z]+(?:-[a-z]+)?)\s+and\s+)?(an|a|one|two|three|four|five|six|seven|eight|nine|ten)[\s\-](halves|half|thirds|third|quarters|quarter|fourths|fourth|fifths|fifth|sixths|sixth|sevenths|seventh|eighths|eighth|ninths|ninth|tenths|tenth)\b"
    ).unwrap();

    static ref WORD: Regex = Regex::new(r"\S+").unwrap();
}

/// Resolve slash, mixed and word fractions to two-decimal strings
pub fn resolve_fractions(text: &str) -> String {
    let t = MIXED_DIGITS.replace_all(text, |caps: &Captures| {
        if caps.get(5).is_some() {
            return caps[0].to_string();
        }
        let parsed = (
            caps[2].parse::<f64>(),
            caps[3].parse::<f64>(),
            caps[4].parse::<f64>(),
        );
        match parsed {
            (Ok(whole), Ok(num), Ok(den)) if den != 0.0 && num < den => {
                format!("{}{}", &caps[1], format_decimal(whole + num / den))
            }
            _ => caps[0].to_string(),
        }
    });

    let t = SLASH_FRACTION.replace_all(&t, |caps: &Captures| {
        if caps.get(4).is_some() {
            return caps[0].to_string();
        }
        match (caps[2].parse::<f64>(), caps[3].parse::<f64>()) {
            (Ok(num), Ok(den)) if den != 0.0 => {
                format!("{}{}", &caps[1], format_decimal(num / den))
            }
            _ => caps[0].to_string(),
        }
    });

    WORD_FRACTION
        .replace_all(&t, |caps: &Captures| {
            let numerator_word = caps[3].to_lowercase();
            let denominator_word = caps[4].to_lowercase();
            let Some(den) = denominator_value(&denominator_word) else {
                return caps[0].to_string();
            };
            let indefinite = numerator_word == "a" || numerator_word == "an";
            if indefinite && den != 2 && den != 4 {
                return caps[0].to_string();
            }
            let num = if indefinite {
                1
            } else {
                match words_to_value(&numerator_word) {
                    Some(n) => n,
                    None => return caps[0].to_string(),
                }
            };
            let fraction = num as f64 / den as f64;

            match caps.get(2) {
                None => format!("{}{}", &caps[1], format_decimal(fraction)),
                Some(whole) => {
                    let whole_text = whole.as_str().to_lowercase();
                    let whole_value = whole_text
                        .parse::<f64>()
                        .ok()
                        .or_else(|| words_to_value(&whole_text).map(|v| v as f64));
                    match whole_value {
                        Some(w) => format!("{}{}", &caps[1], format_decimal(w + fraction)),
                        // Unknown whole part: resolve only the fraction
                        None => format!(
                            "{}{} and {}",
                            &caps[1],
                            whole.as_str(),
                            format_decimal(fraction)
                        ),
                    }
                }
            }
        })
        .into_owned()
}

fn denominator_value(word: &str) -> Option<u64> {
    let value = match word.trim_end_matches('s') {
        "half" | "halve" => 2,
        "third" => 3,
        "quarter" | "fourth" => 4,
        "fifth" => 5,
        "sixth" => 6,
        "seventh" => 7,
        "eighth" => 8,
        "ninth" => 9,
        "tenth" => 10,
        _ => return None,
    };
    Some(value)
}

/// Round to two decimals and drop trailing zeros (`1.50` becomes `1.5`)
pub fn format_decimal(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let s = format!("{:.2}", rounded);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberWord {
    Unit(u64),
    Tens(u64),
    Hundred,
    Scale(u64),
    Ordinal(u64),
}

fn classify_word(word: &str) -> Option<NumberWord> {
    use NumberWord::*;
    let kind = match word {
        "zero" => Unit(0),
        "one" => Unit(1),
        "two" => Unit(2),
        "three" => Unit(3),
        "four" => Unit(4),
        "five" => Unit(5),
        "six" => Unit(6),
        "seven" => Unit(7),
        "eight" => Unit(8),
        "nine" => Unit(9),
        "ten" => Unit(10),
        "eleven" => Unit(11),
        "twelve" => Unit(12),
        "thirteen" => Unit(13),
        "fourteen" => Unit(14),
        "fifteen" => Unit(15),
        "sixteen" => Unit(16),
        "seventeen" => Unit(17),
        "eighteen" => Unit(18),
        "nineteen" => Unit(19),
        "twenty" => Tens(20),
        "thirty" => Tens(30),
        "forty" => Tens(40),
        "fifty" => Tens(50),
        "sixty" => Tens(60),
        "seventy" => Tens(70),
        "eighty" => Tens(80),
        "ninety" => Tens(90),
        "hundred" => Hundred,
        "thousand" => Scale(1_000),
        "million" => Scale(1_000_000),
        "billion" => Scale(1_000_000_000),
        // "second" is left alone: it is far more often a time or an adjective
        "first" => Ordinal(1),
        "third" => Ordinal(3),
        "fourth" => Ordinal(4),
        "fifth" => Ordinal(5),
        "sixth" => Ordinal(6),
        "seventh" => Ordinal(7),
        "eighth" => Ordinal(8),
        "ninth" => Ordinal(9),
        "tenth" => Ordinal(10),
        "eleventh" => Ordinal(11),
        "twelfth" => Ordinal(12),
        "thirteenth" => Ordinal(13),
        "fourteenth" => Ordinal(14),
        "fifteenth" => Ordinal(15),
        "sixteenth" => Ordinal(16),
        "seventeenth" => Ordinal(17),
        "eighteenth" => Ordinal(18),
        "nineteenth" => Ordinal(19),
        "twentieth" => Ordinal(20),
        _ => return None,
    };
    Some(kind)
}

/// Number words of a token; hyphenated compounds count only when every
/// part is a number word (`twenty-five`, not `one-story`)
fn token_words(core: &str) -> Option<Vec<NumberWord>> {
    if core.is_empty() {
        return None;
    }
    core.split('-').map(classify_word).collect()
}

/// Value of a short word-number phrase such as `twenty-five`
fn words_to_value(phrase: &str) -> Option<u64> {
    let words: Vec<NumberWord> = phrase
        .split(|c: char| c == ' ' || c == '-')
        .filter(|w| !w.is_empty())
        .map(classify_word)
        .collect::<Option<_>>()?;
    let mut acc = Accumulator::Idle;
    for word in words {
        if acc.accept(word).is_some() {
            return None;
        }
    }
    acc.value()
}

/// Word-number accumulation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accumulator {
    Idle,
    Accumulating {
        total: u64,
        current: u64,
        last: NumberWord,
    },
}

impl Accumulator {
    /// Feed one number word. Returns the finished value when the word cannot
    /// continue the current number (the word then starts a new one).
    fn accept(&mut self, word: NumberWord) -> Option<u64> {
        match *self {
            Accumulator::Idle => {
                *self = Self::start(word);
                None
            }
            Accumulator::Accumulating { total, current, last } => {
                use NumberWord::*;
                let continues = match (last, word) {
                    (Ordinal(_), _) => false,
                    (Tens(_), Unit(n) | Ordinal(n)) => n < 10,
                    (Hundred | Scale(_), Unit(_) | Tens(_) | Ordinal(_)) => true,
                    (Unit(_) | Tens(_), Hundred) => true,
                    (Unit(_) | Tens(_) | Hundred, Scale(_)) => true,
                    _ => false,
                };
                if !continues {
                    let finished = total.saturating_add(current);
                    *self = Self::start(word);
                    return Some(finished);
                }
                let (total, current) = match word {
                    Unit(n) | Tens(n) | Ordinal(n) => (total, current.saturating_add(n)),
                    Hundred => (total, current.saturating_mul(100)),
                    // Scale words above a hundred flush into the running total
                    Scale(scale) => (total.saturating_add(current.saturating_mul(scale)), 0),
                };
                *self = Accumulator::Accumulating { total, current, last: word };
                None
            }
        }
    }

    fn start(word: NumberWord) -> Self {
        let (total, current) = match word {
            NumberWord::Unit(n) | NumberWord::Tens(n) | NumberWord::Ordinal(n) => (0, n),
            NumberWord::Hundred => (0, 100),
            NumberWord::Scale(scale) => (scale, 0),
        };
        Accumulator::Accumulating { total, current, last: word }
    }

    fn value(&self) -> Option<u64> {
        match self {
            Accumulator::Idle => None,
            Accumulator::Accumulating { total, current, .. } => Some(total.saturating_add(*current)),
        }
    }

    fn after_scale(&self) -> bool {
        matches!(
            self,
            Accumulator::Accumulating {
                last: NumberWord::Hundred | NumberWord::Scale(_),
                ..
            }
        )
    }

    fn ends_number(&self) -> bool {
        matches!(
            self,
            Accumulator::Accumulating {
                last: NumberWord::Ordinal(_),
                ..
            }
        )
    }
}

/// Split a whitespace token into leading punctuation, core and trailing punctuation
fn split_token(token: &str) -> (&str, &str, &str) {
    let is_core = |c: char| c.is_ascii_alphanumeric() || c == '-';
    let start = token.find(is_core).unwrap_or(token.len());
    let end = token.rfind(is_core).map(|i| i + 1).unwrap_or(start);
    let end = end.max(start);
    (&token[..start], &token[start..end], &token[end..])
}

/// Convert spelled-out numbers into digit strings.
///
/// Tokens are re-joined with single spaces; callers pass normalized text.
pub fn resolve_number_words(text: &str) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    let mut acc = Accumulator::Idle;
    let mut prefix = String::new();

    fn flush(acc: &mut Accumulator, prefix: &mut String, suffix: &str, out: &mut Vec<String>) {
        if let Some(value) = acc.value() {
            out.push(format!("{}{}{}", prefix, value, suffix));
        }
        *acc = Accumulator::Idle;
        prefix.clear();
    }

    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        let (lead, core, trail) = split_token(token);
        let lowered = core.to_ascii_lowercase();

        if lowered == "and" && lead.is_empty() && trail.is_empty() && acc.after_scale() {
            let next_is_number = tokens
                .get(i + 1)
                .map(|next| {
                    let (next_lead, next_core, _) = split_token(next);
                    next_lead.is_empty() && token_words(&next_core.to_ascii_lowercase()).is_some()
                })
                .unwrap_or(false);
            if next_is_number {
                i += 1;
                continue;
            }
        }

        match token_words(&lowered) {
            Some(words) => {
                if !lead.is_empty() {
                    flush(&mut acc, &mut prefix, "", &mut out);
                }
                for word in words {
                    if acc == Accumulator::Idle {
                        prefix = lead.to_string();
                    }
                    if let Some(finished) = acc.accept(word) {
                        out.push(format!("{}{}", prefix, finished));
                        prefix.clear();
                    }
                }
                if !trail.is_empty() || acc.ends_number() {
                    flush(&mut acc, &mut prefix, trail, &mut out);
                }
            }
            None => {
                flush(&mut acc, &mut prefix, "", &mut out);
                out.push(token.to_string());
            }
        }
        i += 1;
    }
    flush(&mut acc, &mut prefix, "", &mut out);
    out.join(" ")
}

/// Fractions first, then number words
pub fn normalize_numbers(text: &str) -> String {
    resolve_number_words(&resolve_fractions(text))
}

/// A run of normalized tokens and the source tokens it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    out_start: usize,
    out_end: usize,
    src_start: usize,
    src_end: usize,
    copied: bool,
}

/// How far apart two token runs may drift before alignment gives up
const RESYNC_SPAN: usize = 12;

fn words(text: &str) -> Vec<(usize, &str)> {
    WORD.find_iter(text).map(|m| (m.start(), m.as_str())).collect()
}

fn token_end((start, word): (usize, &str)) -> usize {
    start + word.len()
}

/// Smallest (source, output) advance after which both runs agree again
fn resync(src: &[(usize, &str)], out: &[(usize, &str)]) -> (usize, usize) {
    for b in 1..=out.len().min(RESYNC_SPAN) {
        let Some((_, next)) = out.get(b) else {
            return (src.len().max(1), b);
        };
        if let Some(a) = (1..src.len().min(RESYNC_SPAN + 1)).find(|&a| src[a].1 == *next) {
            return (a, b);
        }
    }
    (1, 1)
}

fn align(source: &str, out: &str) -> Vec<Segment> {
    let src = words(source);
    let dst = words(out);
    let mut segments = Vec::with_capacity(dst.len());
    let (mut i, mut j) = (0, 0);
    while j < dst.len() {
        if i >= src.len() {
            segments.push(Segment {
                out_start: dst[j].0,
                out_end: token_end(dst[j]),
                src_start: source.len(),
                src_end: source.len(),
                copied: false,
            });
            j += 1;
            continue;
        }
        let (a, b) = if src[i].1 == dst[j].1 {
            (1, 1)
        } else {
            resync(&src[i..], &dst[j..])
        };
        segments.push(Segment {
            out_start: dst[j].0,
            out_end: token_end(dst[j + b - 1]),
            src_start: src[i].0,
            src_end: token_end(src[(i + a).min(src.len()) - 1]),
            copied: a == 1 && b == 1 && src[i].1 == dst[j].1,
        });
        i += a;
        j += b;
    }
    segments
}

/// Number-normalized text that can map its offsets back to the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedNumbers {
    text: String,
    segments: Vec<Segment>,
}

impl NormalizedNumbers {
    pub fn new(source: &str) -> Self {
        let text = normalize_numbers(source);
        let segments = align(source, &text);
        Self { text, segments }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Source offset of byte `at` of the normalized text. Inside a rewritten
    /// token the offset is clamped to the words it replaced.
    pub fn source_offset(&self, at: usize) -> usize {
        let i = self.segments.partition_point(|s| s.out_start <= at);
        let Some(seg) = i.checked_sub(1).map(|i| self.segments[i]) else {
            return self.segments.first().map_or(at, |s| s.src_start.saturating_sub(s.out_start - at));
        };
        if at >= seg.out_end {
            return seg.src_end + (at - seg.out_end);
        }
        let delta = at - seg.out_start;
        if seg.copied {
            seg.src_start + delta
        } else {
            (seg.src_start + delta).min(seg.src_end)
        }
    }
}

/// Parse a numeric token, tolerating a trailing period or comma
pub fn parse_number(token: &str) -> Option<f64> {
    let trimmed = token.trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':'));
    let value: f64 = trimmed.parse().ok()?;
    value.is_finite().then_some(value)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the resolvers never panic and never grow unrelated text
        #[test]
        fn resolvers_never_panic(text in "\\PC{0,120}") {
            let _ = normalize_numbers(&text);
        }

        /// Property: digit fractions resolve to their decimal value
        #[test]
        fn slash_fraction_value(num in 0u32..100, den in 1u32..100) {
            let resolved = resolve_fractions(&format!("{}/{}", num, den));
            let value = parse_number(&resolved).unwrap();
            prop_assert!((value - num as f64 / den as f64).abs() < 0.0051);
        }
    }
}
