//! End-to-end extraction scenarios over whole documents

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use zoning_engine::config::EngineConfig;
use zoning_engine::districts::DistrictClassifier;
use zoning_engine::extractors::FreeTextExtractor;
use zoning_engine::tables::{extract_tables, TableContext};
use zoning_engine::{Deadline, Document, KeywordDictionary, PlausibilityBounds, VocabularySet, ZoningEngine};
use zoning_types::{Category, DistrictLabel, Measure, RawDocument, UnresolvedReason, MEASURE_COUNT};

fn dictionary() -> KeywordDictionary {
    let mut maps = vec![BTreeMap::new(); MEASURE_COUNT];
    for measure in Measure::ALL {
        maps[measure.index()].insert(measure.name().replace('_', " "), 1.0);
    }
    let height = &mut maps[Measure::HeightLimit.index()];
    height.insert("maximum height".to_string(), 4.0);
    height.insert("feet".to_string(), 2.0);
    KeywordDictionary::new(maps).unwrap()
}

fn engine() -> ZoningEngine {
    ZoningEngine::new(Arc::new(dictionary()), EngineConfig::default()).unwrap()
}

const SCENARIO_A: &str = "R-1 Single Family District. Minimum lot area 7,500 square feet. Maximum height 35 feet.\n\
    Table 1 Dimensional Requirements\n\
    District  Minimum Lot Area (sq. ft.)  Front Yard (ft.)  Maximum Height (ft.)\n\
    R-1       7,500                       25                35\n\
    R-2       6,000                       20                35\n";

const SCENARIO_B: &str =
    "R-2 district permits multi family dwellings, density shall not exceed 12 units per acre";

#[test]
fn scenario_a_lot_height_and_single_family() {
    let document = Document::from_text("a.txt", SCENARIO_A.to_string(), None);
    let text = document.normalized();
    let vocab = VocabularySet::builtin().unwrap();
    let config = EngineConfig::default();
    let bounds = PlausibilityBounds::new(config.bounds);

    let free_text = FreeTextExtractor::new(&vocab, &config.free_text, &bounds).extract(text);
    assert!(free_text
        .iter()
        .any(|c| c.category() == Category::SquareFeet && c.value() == 7500.0));
    assert!(free_text
        .iter()
        .any(|c| c.category() == Category::HeightFeet && c.value() == 35.0));

    let ctx = TableContext {
        vocab: &vocab,
        config: &config.tables,
        bounds: &bounds,
    };
    let deadline = Deadline::start("a.txt", Duration::from_secs(10));
    let table = extract_tables(text, config.windows.wide, &ctx, &deadline).unwrap();
    let lots: Vec<f64> = table
        .iter()
        .filter(|c| c.category() == Category::SquareFeet)
        .map(|c| c.value())
        .collect();
    assert_eq!(lots, vec![7500.0, 6000.0]);

    let summary = DistrictClassifier::new(&vocab, &config.districts).classify_document(text);
    assert_eq!(summary.label("r-1"), Some(DistrictLabel::SingleFamily));

    let record = engine().extract(&document).unwrap();
    assert!(record.lot_size.unwrap().under_half_acre);
    assert_eq!(record.height_feet.map(|h| (h.median, h.mode)), Some((35.0, 35.0)));
    assert_eq!(record.multifamily_fraction, Some(0.0));
    assert!(record.measures.get(Measure::HeightLimit));
}

#[test]
fn scenario_b_density_and_multifamily() {
    let document = Document::from_text("b.txt", SCENARIO_B.to_string(), None);
    let vocab = VocabularySet::builtin().unwrap();
    let config = EngineConfig::default();
    let bounds = PlausibilityBounds::new(config.bounds);

    let found = FreeTextExtractor::new(&vocab, &config.free_text, &bounds).extract(document.normalized());
    assert!(!found.is_empty());
    assert!(found
        .iter()
        .all(|c| c.category() == Category::UnitsPerAcre && c.value() == 12.0));

    let summary = DistrictClassifier::new(&vocab, &config.districts).classify_document(document.normalized());
    assert_eq!(summary.label("R-2"), Some(DistrictLabel::Multifamily));

    let record = engine().extract(&document).unwrap();
    let density = record.density.unwrap();
    assert!(density.from_8_to_15);
    assert!(!density.inferred_from_lot_size);
    assert_eq!(record.multifamily_fraction, Some(1.0));
    assert_eq!(record.lot_size, None);
}

#[test]
fn scenario_c_decode_failure_does_not_stop_batch() {
    let good = || RawDocument::new("good.txt", SCENARIO_B.as_bytes().to_vec());
    let bad = || RawDocument::new("bad.bin", vec![0xfe; 256]);

    for documents in [vec![good(), bad()], vec![bad(), good()]] {
        let batch = engine().run_batch(documents);
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].source_id, "good.txt");
        assert_eq!(batch.unresolved.len(), 1);
        assert_eq!(batch.unresolved[0].source_id, "bad.bin");
        assert_eq!(batch.unresolved[0].reason, UnresolvedReason::Decode);
    }
}

#[test]
fn scenario_d_sixty_row_table_rejected() {
    let mut text = String::from("dimensional requirements district minimum lot area front yard maximum height ");
    for i in 1..=60 {
        text.push_str(&format!("r-{} 7500 30 35 ", i));
    }
    let vocab = VocabularySet::builtin().unwrap();
    let config = EngineConfig::default();
    let bounds = PlausibilityBounds::new(config.bounds);
    let ctx = TableContext {
        vocab: &vocab,
        config: &config.tables,
        bounds: &bounds,
    };
    let deadline = Deadline::start("d.txt", Duration::from_secs(10));
    let candidates = extract_tables(&text, config.windows.wide, &ctx, &deadline).unwrap();
    assert!(candidates.is_empty());
}

#[test]
fn batch_is_order_insensitive() {
    let documents = || {
        vec![
            RawDocument::new("one.txt", SCENARIO_A.as_bytes().to_vec()),
            RawDocument::new("two.txt", SCENARIO_B.as_bytes().to_vec()),
            RawDocument::new("three.txt", b"nothing to see".to_vec()),
        ]
    };
    let forward = engine().run_batch(documents());
    let mut reversed_input = documents();
    reversed_input.reverse();
    let reversed = engine().run_batch(reversed_input);
    assert_eq!(forward, reversed);

    let empty = forward.records.iter().find(|r| r.source_id == "three.txt").unwrap();
    assert_eq!(empty.lot_size, None);
    assert_eq!(empty.height_feet, None);
    assert_eq!(empty.multifamily_fraction, None);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: every record's multifamily fraction is absent or within [0, 1]
    #[test]
    fn multifamily_fraction_in_unit_interval(words in prop::collection::vec(prop::sample::select(vec![
        "R-1", "R-2", "RM-3", "single-family", "apartments", "two family", "mixed use",
        "permitted uses:", "special exception", "schedule of uses", "yes", "no", "district", "the", "$",
    ]), 0..80)) {
        let batch = engine().run_batch(vec![RawDocument::new("p.txt", words.join(" ").into_bytes())]);
        prop_assert_eq!(batch.records.len(), 1);
        if let Some(f) = batch.records[0].multifamily_fraction {
            prop_assert!((0.0..=1.0).contains(&f));
        }
    }
}
