//! Integration tests for the process_sales_history() end-to-end pipeline.
//!
//! Uses a MockExtractor that returns pre-built rows and an in-memory or
//! temp-dir ledger, so nothing touches the working directory.

use larder_core::error::LarderError;
use larder_core::extraction::{CsvExportExtractor, SalesExtractor};
use larder_core::model::{IngredientDemandRow, RawSaleRow};
use larder_core::rules::builtin::load_preset;
use larder_core::store::{CsvDemandStore, DemandStore, MemoryDemandStore, SerializedStore};
use larder_core::{analyze_sales, process_export, process_sales_history};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

struct MockExtractor {
    rows: Vec<RawSaleRow>,
}

impl SalesExtractor for MockExtractor {
    fn extract_rows(&self, _bytes: &[u8]) -> Result<Vec<RawSaleRow>, LarderError> {
        Ok(self.rows.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn rows(items: &[(&str, &str)]) -> Vec<RawSaleRow> {
    items
        .iter()
        .map(|(name, qty)| RawSaleRow::new(name, qty))
        .collect()
}

// ---------------------------------------------------------------------------
// Test 1: Mixed day of sales, perishable and shelf-stable
// ---------------------------------------------------------------------------
#[test]
fn mixed_day_produces_demand_row() {
    let rules = load_preset("warung").unwrap();
    let store = MemoryDemandStore::new();
    let input = rows(&[
        ("Katsu", "4"),
        ("Es Teh Manis", "6"),
        ("Nasi rempah cumi", "2"),
        ("Nasi Siram Daging (Kari)", "1"),
        ("Tempe mendoan", "3"),
        ("Kopi pisang", "2"),
    ]);

    let report = process_sales_history("2025-07-11", &input, &rules, &store).unwrap();

    let demand = &report.ingredient_demand;
    assert_eq!(demand.date.to_string(), "2025-07-11");
    assert_eq!(demand.chicken, dec!(500.00));
    assert_eq!(demand.squid, dec!(160.00));
    assert_eq!(demand.beef, dec!(100.00));
    assert_eq!(demand.tempe, dec!(150.00));
    assert_eq!(demand.tofu, Decimal::ZERO);

    assert_eq!(
        report.non_perishable_products,
        vec!["Es Teh Manis", "Kopi pisang"]
    );
    assert_eq!(report.historical_store_location.as_deref(), Some("memory"));
    assert_eq!(store.load().unwrap(), vec![demand.clone()]);
}

// ---------------------------------------------------------------------------
// Test 2: Product list invariants
// ---------------------------------------------------------------------------
#[test]
fn product_lists_partition_unique_products() {
    let rules = load_preset("warung").unwrap();
    let input = rows(&[
        ("Tahu goreng", "2"),
        ("Air mineral", "5"),
        ("Katsu", "1"),
        ("Tahu goreng", "1"),
        ("Dancow", "1"),
    ]);

    let report = analyze_sales("2025-07-11", &input, &rules).unwrap();

    assert_eq!(report.num_unique_products, report.unique_products.len());
    assert_eq!(
        report.unique_products,
        vec!["Air mineral", "Dancow", "Katsu", "Tahu goreng"]
    );

    let mut union: Vec<String> = report
        .perishable_products
        .iter()
        .chain(report.non_perishable_products.iter())
        .cloned()
        .collect();
    union.sort();
    assert_eq!(union, report.unique_products);
    assert!(report
        .perishable_products
        .iter()
        .all(|p| !report.non_perishable_products.contains(p)));
    assert!(report.historical_store_location.is_none());
}

// ---------------------------------------------------------------------------
// Test 3: Unusable quantities are dropped from every count
// ---------------------------------------------------------------------------
#[test]
fn non_numeric_quantity_is_dropped() {
    let rules = load_preset("warung").unwrap();
    let input = rows(&[("Nasi Rempah Ayam", "abc"), ("Cumi", "1")]);

    let report = analyze_sales("2025-07-11", &input, &rules).unwrap();

    assert_eq!(report.unique_products, vec!["Cumi"]);
    assert_eq!(report.dropped_row_count(), 1);
    assert_eq!(report.dropped_rows[0].product_name, "Nasi Rempah Ayam");
    assert_eq!(report.ingredient_demand.chicken, Decimal::ZERO);
    assert_eq!(report.ingredient_demand.squid, dec!(80));
}

// ---------------------------------------------------------------------------
// Test 4: Same product twice on one day adds up
// ---------------------------------------------------------------------------
#[test]
fn split_rows_are_additive() {
    let rules = load_preset("warung").unwrap();
    let split = analyze_sales("2025-07-11", &rows(&[("Katsu", "1"), ("Katsu", "2")]), &rules)
        .unwrap();
    let whole = analyze_sales("2025-07-11", &rows(&[("Katsu", "3")]), &rules).unwrap();

    assert_eq!(split.ingredient_demand, whole.ingredient_demand);
    assert_eq!(split.ingredient_demand.chicken, dec!(375));
}

// ---------------------------------------------------------------------------
// Test 5: Re-processing a date replaces its row
// ---------------------------------------------------------------------------
#[test]
fn reprocessing_a_date_replaces_its_row() {
    let rules = load_preset("warung").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = CsvDemandStore::new(dir.path().join("ingredients_historical.csv"));

    process_sales_history("2025-07-10", &rows(&[("Cumi", "1")]), &rules, &store).unwrap();
    process_sales_history("2025-07-11", &rows(&[("Katsu", "1")]), &rules, &store).unwrap();
    let second = process_sales_history("2025-07-11", &rows(&[("Katsu", "2")]), &rules, &store)
        .unwrap();

    let ledger = store.load().unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[0].date.to_string(), "2025-07-10");
    assert_eq!(ledger[0].squid, dec!(80));
    assert_eq!(ledger[1], second.ingredient_demand);
    assert_eq!(ledger[1].chicken, dec!(250));
}

// ---------------------------------------------------------------------------
// Test 6: Upserting the same row twice is idempotent
// ---------------------------------------------------------------------------
#[test]
fn same_upload_twice_keeps_one_row() {
    let rules = load_preset("warung").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = CsvDemandStore::new(dir.path().join("ledger.csv"));
    let input = rows(&[("Katsu", "4"), ("Nasi rempah cumi", "2")]);

    let first = process_sales_history("2025-07-11", &input, &rules, &store).unwrap();
    process_sales_history("2025-07-11", &input, &rules, &store).unwrap();

    assert_eq!(store.load().unwrap(), vec![first.ingredient_demand]);
}

// ---------------------------------------------------------------------------
// Test 7: A failed write returns the computed row and leaves the store alone
// ---------------------------------------------------------------------------
#[test]
fn storage_failure_returns_computed_row() {
    let rules = load_preset("warung").unwrap();
    let existing = IngredientDemandRow::empty(chrono::NaiveDate::from_ymd_opt(2025, 7, 10).unwrap());
    let store = MemoryDemandStore::read_only(vec![existing.clone()]);

    let err = process_sales_history("2025-07-11", &rows(&[("Katsu", "4")]), &rules, &store)
        .unwrap_err();

    match err {
        LarderError::Persist { row, source } => {
            assert_eq!(row.chicken, dec!(500));
            assert!(matches!(*source, LarderError::Storage { .. }));
        }
        other => panic!("expected Persist, got {other:?}"),
    }
    assert_eq!(store.load().unwrap(), vec![existing]);
}

// ---------------------------------------------------------------------------
// Test 8: Malformed processing date is a client error
// ---------------------------------------------------------------------------
#[test]
fn malformed_date_rejected_before_store() {
    let rules = load_preset("warung").unwrap();
    let store = MemoryDemandStore::new();

    let err = process_sales_history("11-07-2025", &rows(&[("Katsu", "4")]), &rules, &store)
        .unwrap_err();

    assert!(err.is_client_error());
    assert!(store.load().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test 9: Raw CSV export through the extractor
// ---------------------------------------------------------------------------
#[test]
fn csv_export_end_to_end() {
    let rules = load_preset("warung").unwrap();
    let store = SerializedStore::new(MemoryDemandStore::new());
    let export = "REKAP HARIAN PRODUK\n\
        Tanggal 11-07-2025\n\
        PRODUK,JUMLAH,HARGA\n\
        Katsu,4,100000\n\
        Nasi goreng cumi ,4,88000\n\
        Es Teh Manis,3,15000\n\
        Tahu isi,abc,5000\n\
        TOTAL HARGA,,208000\n\
        PEMBAYARAN,Cash,208000\n";

    let report = process_export(
        "2025-07-11",
        export.as_bytes(),
        &CsvExportExtractor::new(),
        &rules,
        &store,
    )
    .unwrap();

    assert_eq!(
        report.unique_products,
        vec!["Es Teh Manis", "Katsu", "Nasi goreng cumi "]
    );
    assert_eq!(report.dropped_row_count(), 1);
    assert_eq!(report.ingredient_demand.chicken, dec!(500));
    // Exact rule: 0.75 x 4 x 80
    assert_eq!(report.ingredient_demand.squid, dec!(240));
}

// ---------------------------------------------------------------------------
// Test 10: Extractor backends are interchangeable
// ---------------------------------------------------------------------------
#[test]
fn mock_extractor_feeds_pipeline() {
    let rules = load_preset("warung").unwrap();
    let store = MemoryDemandStore::new();
    let extractor = MockExtractor {
        rows: rows(&[("Spaghetti katsu keju", "2"), ("Tahu bakso", "2")]),
    };

    let report = process_export("2025-07-12", &[], &extractor, &rules, &store).unwrap();

    // Alias onto "Spaghetti Bolognese katsu keju" -> chicken x1.
    assert_eq!(report.ingredient_demand.chicken, dec!(250));
    assert_eq!(report.ingredient_demand.tofu, dec!(100));
    assert!(report.unmapped_products.is_empty());
}

// ---------------------------------------------------------------------------
// Test 11: Out-of-range quantities are dropped instead of overflowing
// ---------------------------------------------------------------------------
#[test]
fn huge_quantity_is_dropped() {
    let rules = load_preset("warung").unwrap();
    let input = rows(&[
        ("Katsu", "79228162514264337593543950335"),
        ("Nasi Rempah Ayam", "1e28"),
        ("Cumi", "1"),
    ]);

    let report = analyze_sales("2025-07-11", &input, &rules).unwrap();

    assert_eq!(report.dropped_row_count(), 2);
    assert_eq!(report.ingredient_demand.chicken, Decimal::ZERO);
    assert_eq!(report.ingredient_demand.squid, dec!(80));
}

// ---------------------------------------------------------------------------
// Test 12: A thousands separator is not read as a decimal comma
// ---------------------------------------------------------------------------
#[test]
fn thousands_separated_quantity_is_dropped() {
    let rules = load_preset("warung").unwrap();
    let input = rows(&[("Katsu", "1,000"), ("Tempe mendoan", "1,5")]);

    let report = analyze_sales("2025-07-11", &input, &rules).unwrap();

    assert_eq!(report.dropped_row_count(), 1);
    assert_eq!(report.dropped_rows[0].product_name, "Katsu");
    assert_eq!(report.ingredient_demand.chicken, Decimal::ZERO);
    assert_eq!(report.ingredient_demand.tempe, dec!(50));
}
