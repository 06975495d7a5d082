//! Curated vocabularies used by the matchers
//!
//! Each list is a named, versioned [`Vocabulary`] compiled once into a single
//! word-bounded regex. The built-in tables live in [`builtin`]; any of them can
//! be extended or replaced from an external TOML file so the lists can evolve
//! without touching the matching code.

pub mod builtin;

use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, ZoningError};

/// One vocabulary match inside a window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub term: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VocabularyKind {
    /// Literal phrases, matched on word boundaries, longest first
    Phrases,
    /// Raw regular expressions
    Patterns,
}

#[derive(Debug, Clone)]
pub struct Vocabulary {
    name: String,
    version: u32,
    kind: VocabularyKind,
    entries: Vec<String>,
    regex: Option<Regex>,
}

impl Vocabulary {
    pub fn from_phrases(name: &str, version: u32, phrases: &[&str]) -> Result<Self> {
        let entries = phrases.iter().map(|p| p.to_lowercase()).collect();
        Self::build(name, version, VocabularyKind::Phrases, entries)
    }

    pub fn from_patterns(name: &str, version: u32, patterns: &[&str]) -> Result<Self> {
        let entries = patterns.iter().map(|p| p.to_string()).collect();
        Self::build(name, version, VocabularyKind::Patterns, entries)
    }

    fn build(name: &str, version: u32, kind: VocabularyKind, mut entries: Vec<String>) -> Result<Self> {
        entries.retain(|e| !e.trim().is_empty());
        let mut seen = BTreeSet::new();
        entries.retain(|e| seen.insert(e.clone()));

        let regex = if entries.is_empty() {
            None
        } else {
            let source = match kind {
                VocabularyKind::Phrases => phrase_alternation(&entries),
                VocabularyKind::Patterns => entries
                    .iter()
                    .map(|p| format!("(?:{})", p))
                    .collect::<Vec<_>>()
                    .join("|"),
            };
            let regex = Regex::new(&format!("(?i){}", source)).map_err(|e| {
                ZoningError::Vocabulary(format!("{} v{}: {}", name, version, e))
            })?;
            Some(regex)
        };

        Ok(Self {
            name: name.to_string(),
            version,
            kind,
            entries,
            regex,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn kind(&self) -> VocabularyKind {
        self.kind
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn matches(&self, window: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(window))
    }

    /// Start offsets of every non-overlapping match
    pub fn find(&self, window: &str) -> Vec<usize> {
        self.spans(window).into_iter().map(|h| h.start).collect()
    }

    pub fn spans(&self, window: &str) -> Vec<Span> {
        let Some(regex) = &self.regex else {
            return Vec::new();
        };
        regex
            .find_iter(window)
            .map(|m| Span {
                start: m.start(),
                end: m.end(),
                term: m.as_str().to_lowercase(),
            })
            .collect()
    }

    pub fn first_span(&self, window: &str) -> Option<Span> {
        let regex = self.regex.as_ref()?;
        regex.find(window).map(|m| Span {
            start: m.start(),
            end: m.end(),
            term: m.as_str().to_lowercase(),
        })
    }

    /// Distinct matched terms
    pub fn distinct(&self, window: &str) -> BTreeSet<String> {
        self.spans(window).into_iter().map(|h| h.term).collect()
    }

    /// Whether `term` is exactly one of the phrases (or fully matches a pattern)
    pub fn contains_term(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        match self.kind {
            VocabularyKind::Phrases => self.entries.iter().any(|e| *e == term),
            VocabularyKind::Patterns => self
                .regex
                .as_ref()
                .and_then(|r| r.find(&term))
                .is_some_and(|m| m.start() == 0 && m.end() == term.len()),
        }
    }

    /// A copy with additional entries and a new version
    pub fn extended(&self, version: u32, extra: &[String]) -> Result<Self> {
        let mut entries = self.entries.clone();
        entries.extend(extra.iter().map(|e| self.prepare(e)));
        Self::build(&self.name, version, self.kind, entries)
    }

    /// A copy whose entries are entirely replaced
    pub fn replaced(&self, version: u32, entries: &[String]) -> Result<Self> {
        let entries = entries.iter().map(|e| self.prepare(e)).collect();
        Self::build(&self.name, version, self.kind, entries)
    }

    fn prepare(&self, entry: &str) -> String {
        match self.kind {
            VocabularyKind::Phrases => entry.to_lowercase(),
            VocabularyKind::Patterns => entry.to_string(),
        }
    }
}

/// Escaped, longest-first alternation with word boundaries on word edges
fn phrase_alternation(phrases: &[String]) -> String {
    let mut sorted: Vec<&String> = phrases.iter().collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    sorted
        .iter()
        .map(|p| {
            let starts_word = p.chars().next().is_some_and(is_word_char);
            let ends_word = p.chars().last().is_some_and(is_word_char);
            format!(
                "{}{}{}",
                if starts_word { r"\b" } else { "" },
                regex::escape(p),
                if ends_word { r"\b" } else { "" }
            )
        })
        .collect::<Vec<_>>()
        .join("|")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Word-bounded occurrences of a literal phrase in lower-case text
pub fn find_phrase(text: &str, phrase: &str) -> Vec<usize> {
    if phrase.is_empty() {
        return Vec::new();
    }
    let bytes = text.as_bytes();
    let check_start = phrase.chars().next().is_some_and(is_word_char);
    let check_end = phrase.chars().last().is_some_and(is_word_char);
    text.match_indices(phrase)
        .filter(|(start, _)| {
            let end = start + phrase.len();
            let before_ok = !check_start || *start == 0 || !is_word_byte(bytes[start - 1]);
            let after_ok = !check_end || end >= bytes.len() || !is_word_byte(bytes[end]);
            before_ok && after_ok
        })
        .map(|(start, _)| start)
        .collect()
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Every curated list the pipeline consults
#[derive(Debug, Clone)]
pub struct VocabularySet {
    pub table_headings: Vocabulary,
    pub table_disqualifiers: Vocabulary,
    pub header_triggers: Vocabulary,
    pub district_row_starts: Vocabulary,
    pub district_columns: Vocabulary,
    pub criterion_labels: Vocabulary,
    pub lot_size_columns: Vocabulary,
    pub lot_per_unit_columns: Vocabulary,
    pub density_columns: Vocabulary,
    pub height_columns: Vocabulary,
    pub nonresidential_districts: Vocabulary,
    pub lot_anchors: Vocabulary,
    pub density_anchors: Vocabulary,
    pub height_anchors: Vocabulary,
    pub parking_anchors: Vocabulary,
    pub common_stop_phrases: Vocabulary,
    pub lot_stop_phrases: Vocabulary,
    pub density_stop_phrases: Vocabulary,
    pub height_stop_phrases: Vocabulary,
    pub parking_stop_phrases: Vocabulary,
    pub residential_context: Vocabulary,
    pub district_tokens: Vocabulary,
    pub single_family_cues: Vocabulary,
    pub multifamily_cues: Vocabulary,
    pub mixed_use_cues: Vocabulary,
    pub two_family_cues: Vocabulary,
    pub district_boilerplate: Vocabulary,
    pub conditional_use: Vocabulary,
    pub district_bad_phrases: Vocabulary,
    pub use_schedule_headings: Vocabulary,
    pub use_schedule_permitted: Vocabulary,
    pub use_schedule_denied: Vocabulary,
}

#[derive(Debug, Deserialize)]
struct OverrideFile {
    #[serde(default)]
    tables: BTreeMap<String, OverrideTable>,
}

#[derive(Debug, Deserialize)]
struct OverrideTable {
    version: u32,
    #[serde(default)]
    mode: OverrideMode,
    entries: Vec<String>,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum OverrideMode {
    #[default]
    Extend,
    Replace,
}

impl VocabularySet {
    /// The built-in tables
    pub fn builtin() -> Result<Self> {
        use builtin::*;
        let phrases = |name: &str, list: &[&str]| Vocabulary::from_phrases(name, BUILTIN_VERSION, list);
        let patterns = |name: &str, list: &[&str]| Vocabulary::from_patterns(name, BUILTIN_VERSION, list);

        Ok(Self {
            table_headings: phrases("table_headings", TABLE_HEADINGS)?,
            table_disqualifiers: phrases("table_disqualifiers", TABLE_DISQUALIFIERS)?,
            header_triggers: phrases("header_triggers", HEADER_TRIGGERS)?,
            district_row_starts: patterns("district_row_starts", DISTRICT_ROW_STARTS)?,
            district_columns: patterns("district_columns", DISTRICT_COLUMNS)?,
            criterion_labels: phrases("criterion_labels", CRITERION_LABELS)?,
            lot_size_columns: phrases("lot_size_columns", LOT_SIZE_COLUMNS)?,
            lot_per_unit_columns: phrases("lot_per_unit_columns", LOT_PER_UNIT_COLUMNS)?,
            density_columns: phrases("density_columns", DENSITY_COLUMNS)?,
            height_columns: phrases("height_columns", HEIGHT_COLUMNS)?,
            nonresidential_districts: patterns("nonresidential_districts", NONRESIDENTIAL_DISTRICTS)?,
            lot_anchors: phrases("lot_anchors", LOT_ANCHORS)?,
            density_anchors: phrases("density_anchors", DENSITY_ANCHORS)?,
            height_anchors: phrases("height_anchors", HEIGHT_ANCHORS)?,
            parking_anchors: phrases("parking_anchors", PARKING_ANCHORS)?,
            common_stop_phrases: phrases("common_stop_phrases", COMMON_STOP_PHRASES)?,
            lot_stop_phrases: phrases("lot_stop_phrases", LOT_STOP_PHRASES)?,
            density_stop_phrases: phrases("density_stop_phrases", DENSITY_STOP_PHRASES)?,
            height_stop_phrases: phrases("height_stop_phrases", HEIGHT_STOP_PHRASES)?,
            parking_stop_phrases: phrases("parking_stop_phrases", PARKING_STOP_PHRASES)?,
            residential_context: phrases("residential_context", RESIDENTIAL_CONTEXT)?,
            district_tokens: patterns("district_tokens", DISTRICT_TOKENS)?,
            single_family_cues: phrases("single_family_cues", SINGLE_FAMILY_CUES)?,
            multifamily_cues: phrases("multifamily_cues", MULTIFAMILY_CUES)?,
            mixed_use_cues: phrases("mixed_use_cues", MIXED_USE_CUES)?,
            two_family_cues: phrases("two_family_cues", TWO_FAMILY_CUES)?,
            district_boilerplate: phrases("district_boilerplate", DISTRICT_BOILERPLATE)?,
            conditional_use: phrases("conditional_use", CONDITIONAL_USE)?,
            district_bad_phrases: phrases("district_bad_phrases", DISTRICT_BAD_PHRASES)?,
            use_schedule_headings: phrases("use_schedule_headings", USE_SCHEDULE_HEADINGS)?,
            use_schedule_permitted: phrases("use_schedule_permitted", USE_SCHEDULE_PERMITTED)?,
            use_schedule_denied: phrases("use_schedule_denied", USE_SCHEDULE_DENIED)?,
        })
    }

    /// Apply an override file on top of this set.
    ///
    /// ```toml
    /// [tables.district_bad_phrases]
    /// version = 2
    /// mode = "extend"          # or "replace"
    /// entries = ["sewer authority"]
    /// ```
    pub fn with_overrides(mut self, toml_source: &str) -> Result<Self> {
        let file: OverrideFile = toml::from_str(toml_source)
            .map_err(|e| ZoningError::Vocabulary(format!("override file: {}", e)))?;
        for (name, table) in file.tables {
            let slot = self
                .slot_mut(&name)
                .ok_or_else(|| ZoningError::Vocabulary(format!("unknown vocabulary '{}'", name)))?;
            if table.version <= slot.version() {
                return Err(ZoningError::Vocabulary(format!(
                    "override for '{}' must raise the version above {}",
                    name,
                    slot.version()
                )));
            }
            *slot = match table.mode {
                OverrideMode::Extend => slot.extended(table.version, &table.entries)?,
                OverrideMode::Replace => slot.replaced(table.version, &table.entries)?,
            };
        }
        Ok(self)
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Vocabulary> {
        let slot = match name {
            "table_headings" => &mut self.table_headings,
            "table_disqualifiers" => &mut self.table_disqualifiers,
            "header_triggers" => &mut self.header_triggers,
            "district_row_starts" => &mut self.district_row_starts,
            "district_columns" => &mut self.district_columns,
            "criterion_labels" => &mut self.criterion_labels,
            "lot_size_columns" => &mut self.lot_size_columns,
            "lot_per_unit_columns" => &mut self.lot_per_unit_columns,
            "density_columns" => &mut self.density_columns,
            "height_columns" => &mut self.height_columns,
            "nonresidential_districts" => &mut self.nonresidential_districts,
            "lot_anchors" => &mut self.lot_anchors,
            "density_anchors" => &mut self.density_anchors,
            "height_anchors" => &mut self.height_anchors,
            "parking_anchors" => &mut self.parking_anchors,
            "common_stop_phrases" => &mut self.common_stop_phrases,
            "lot_stop_phrases" => &mut self.lot_stop_phrases,
            "density_stop_phrases" => &mut self.density_stop_phrases,
            "height_stop_phrases" => &mut self.height_stop_phrases,
            "parking_stop_phrases" => &mut self.parking_stop_phrases,
            "residential_context" => &mut self.residential_context,
            "district_tokens" => &mut self.district_tokens,
            "single_family_cues" => &mut self.single_family_cues,
            "multifamily_cues" => &mut self.multifamily_cues,
            "mixed_use_cues" => &mut self.mixed_use_cues,
            "two_family_cues" => &mut self.two_family_cues,
            "district_boilerplate" => &mut self.district_boilerplate,
            "conditional_use" => &mut self.conditional_use,
            "district_bad_phrases" => &mut self.district_bad_phrases,
            "use_schedule_headings" => &mut self.use_schedule_headings,
            "use_schedule_permitted" => &mut self.use_schedule_permitted,
            "use_schedule_denied" => &mut self.use_schedule_denied,
            _ => return None,
        };
        Some(slot)
    }
}
