//! Decoded, normalized ordinance documents

use chrono::{DateTime, Utc};
use tracing::debug;

use zoning_types::RawDocument;

use crate::error::{Result, ZoningError};
use crate::normalize::normalize_text;

/// Largest share of replacement characters tolerated in a lossy decode
const MAX_REPLACEMENT_SHARE: f64 = 0.01;

/// Largest share of NUL bytes; more than this is a binary file
const MAX_NUL_SHARE: f64 = 0.01;

/// Immutable once built; every stage reads `normalized`
#[derive(Debug, Clone)]
pub struct Document {
    source_id: String,
    raw: String,
    normalized: String,
    modified_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Decode the bytes as UTF-8, tolerating a small share of invalid
    /// sequences, then normalize
    pub fn decode(raw: RawDocument) -> Result<Self> {
        let RawDocument {
            source_id,
            bytes,
            modified_at,
        } = raw;

        let nul_share = share(bytes.iter().filter(|b| **b == 0).count(), bytes.len());
        if nul_share > MAX_NUL_SHARE {
            return Err(ZoningError::Decode {
                source_id,
                reason: format!("{:.1}% of bytes are NUL", nul_share * 100.0),
            });
        }

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                let lossy = String::from_utf8_lossy(err.as_bytes()).into_owned();
                let replaced = lossy.chars().filter(|c| *c == char::REPLACEMENT_CHARACTER).count();
                let replaced_share = share(replaced, lossy.chars().count());
                if replaced_share > MAX_REPLACEMENT_SHARE {
                    return Err(ZoningError::Decode {
                        source_id,
                        reason: format!("{:.1}% of characters are not valid UTF-8", replaced_share * 100.0),
                    });
                }
                debug!(source_id = %source_id, replaced, "Decoded lossily");
                lossy
            }
        };

        Ok(Self::from_text(source_id, text, modified_at))
    }

    pub fn from_text(source_id: impl Into<String>, raw: String, modified_at: Option<DateTime<Utc>>) -> Self {
        let source_id = source_id.into();
        let normalized = normalize_text(&raw);
        debug!(
            source_id = %source_id,
            raw_len = raw.len(),
            normalized_len = normalized.len(),
            "Normalized document"
        );
        Self {
            source_id,
            raw,
            normalized,
            modified_at,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_valid_utf8_is_normalized() {
        let modified = Utc.with_ymd_and_hms(2021, 3, 1, 12, 0, 0).unwrap();
        let raw = RawDocument::new("springfield.txt", "Minimum Lot Area: 7,500 sq. ft.".as_bytes().to_vec())
            .with_modified_at(modified);
        let doc = Document::decode(raw).unwrap();
        assert_eq!(doc.source_id(), "springfield.txt");
        assert_eq!(doc.raw(), "Minimum Lot Area: 7,500 sq. ft.");
        assert!(doc.normalized().contains("7500 square feet"));
        assert_eq!(doc.modified_at(), Some(modified));
    }

    #[test]
    fn test_few_invalid_bytes_decoded_lossily() {
        let mut bytes = "maximum height 35 feet ".repeat(20).into_bytes();
        bytes.push(0xff);
        let doc = Document::decode(RawDocument::new("a.txt", bytes)).unwrap();
        assert!(doc.normalized().starts_with("maximum height 35 feet"));
    }

    #[test]
    fn test_mostly_invalid_bytes_rejected() {
        let bytes = vec![0xC3, 0x28, 0xA0, 0xA1, b'a', 0xE2, 0x28, 0xA1];
        let err = Document::decode(RawDocument::new("bad.bin", bytes)).unwrap_err();
        assert!(matches!(err, ZoningError::Decode { ref source_id, .. } if source_id == "bad.bin"));
    }

    #[test]
    fn test_nul_heavy_bytes_rejected() {
        let mut bytes = b"lot area".to_vec();
        bytes.extend([0u8; 8]);
        assert!(Document::decode(RawDocument::new("nul.bin", bytes)).is_err());
    }
}
