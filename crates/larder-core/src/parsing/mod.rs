pub mod dates;
pub mod values;

use crate::error::LarderError;
use crate::model::{RawSaleRow, SaleRecord};
use chrono::NaiveDate;
use dates::normalize_date;
use serde::{Deserialize, Serialize};
use values::parse_quantity;

/// Substrings that mark receipt footers, payment lines and repeated header
/// rows. Matched case-sensitively against the product name.
pub const NON_PRODUCT_MARKERS: &[&str] = &[
    "HARGA",
    "Diskon",
    "PEMBAYARAN",
    "BAYAR",
    "HUTANG",
    "Cash",
    "HARGA JUAL",
    "LABA",
    "PRODUK",
];

/// A row that had a product name but was left out of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedRow {
    pub product_name: String,
    pub raw_quantity: Option<String>,
    pub reason: String,
}

/// Output of the row cleaner for one processing date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanedBatch {
    /// The processing date attached to every record.
    pub date: NaiveDate,
    pub records: Vec<SaleRecord>,
    /// Rows dropped because their quantity was unusable.
    pub dropped: Vec<DroppedRow>,
    /// Footer, payment and header rows that were filtered out.
    pub non_product_rows: usize,
}

/// Clean a raw sales extract into dated sale records.
///
/// The export carries no date column, so `sales_date` is attached to every
/// row. Non-product rows and rows without a name are discarded; rows whose
/// quantity does not coerce to a number are dropped and reported.
pub fn clean_rows(sales_date: &str, rows: &[RawSaleRow]) -> Result<CleanedBatch, LarderError> {
    let date = normalize_date(sales_date)?;
    let mut batch = CleanedBatch {
        date,
        records: Vec::new(),
        dropped: Vec::new(),
        non_product_rows: 0,
    };

    for row in rows {
        let name = match row.product_name.as_deref() {
            Some(name) => name,
            None => continue,
        };

        if is_non_product(name) {
            batch.non_product_rows += 1;
            continue;
        }

        if name.trim().is_empty() {
            continue;
        }

        match parse_quantity(row.quantity.as_deref()) {
            Ok(quantity) => batch.records.push(SaleRecord {
                date,
                product_name: name.to_string(),
                quantity,
            }),
            Err(issue) => {
                tracing::warn!(
                    product = name,
                    quantity = row.quantity.as_deref().unwrap_or(""),
                    reason = issue.describe(),
                    "dropping sales row"
                );
                batch.dropped.push(DroppedRow {
                    product_name: name.to_string(),
                    raw_quantity: row.quantity.clone(),
                    reason: issue.describe().to_string(),
                });
            }
        }
    }

    // Stable, so rows keep export order within a date.
    batch.records.sort_by_key(|r| r.date);

    tracing::debug!(
        date = %date,
        kept = batch.records.len(),
        dropped = batch.dropped.len(),
        non_product = batch.non_product_rows,
        "cleaned sales rows"
    );

    Ok(batch)
}

/// Check if a product name is a receipt footer or header rather than a sale.
pub fn is_non_product(name: &str) -> bool {
    NON_PRODUCT_MARKERS.iter().any(|m| name.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw(name: Option<&str>, qty: &str) -> RawSaleRow {
        RawSaleRow {
            product_name: name.map(|s| s.to_string()),
            quantity: Some(qty.to_string()),
            price: Some("15000".into()),
        }
    }

    #[test]
    fn test_attaches_date() {
        let batch = clean_rows("2025-07-11", &[raw(Some("Katsu"), "4")]).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].date.to_string(), "2025-07-11");
        assert_eq!(batch.records[0].quantity, dec!(4));
    }

    #[test]
    fn test_footer_rows_removed() {
        let rows = vec![
            raw(Some("Katsu"), "4"),
            raw(Some("TOTAL HARGA"), "10"),
            raw(Some("Diskon member"), "1"),
            raw(Some("PEMBAYARAN QRIS"), "1"),
            raw(Some("Cash"), "1"),
            raw(Some("PRODUK"), "JUMLAH"),
        ];
        let batch = clean_rows("2025-07-11", &rows).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.non_product_rows, 5);
        assert!(batch.dropped.is_empty());
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        // "cash" in lower case is not a footer marker.
        let batch = clean_rows("2025-07-11", &[raw(Some("Es cashew"), "1")]).unwrap();
        assert_eq!(batch.records.len(), 1);
    }

    #[test]
    fn test_missing_and_blank_names_skipped() {
        let rows = vec![raw(None, "3"), raw(Some(""), "3"), raw(Some("   "), "3")];
        let batch = clean_rows("2025-07-11", &rows).unwrap();
        assert!(batch.records.is_empty());
        assert!(batch.dropped.is_empty());
    }

    #[test]
    fn test_non_numeric_quantity_dropped_and_reported() {
        let rows = vec![raw(Some("Katsu"), "abc"), raw(Some("Cumi"), "2")];
        let batch = clean_rows("2025-07-11", &rows).unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].product_name, "Cumi");
        assert_eq!(batch.dropped.len(), 1);
        assert_eq!(batch.dropped[0].product_name, "Katsu");
        assert_eq!(batch.dropped[0].raw_quantity.as_deref(), Some("abc"));
    }

    #[test]
    fn test_product_name_kept_verbatim() {
        let batch = clean_rows("2025-07-11", &[raw(Some("Nasi siram cumi "), "1")]).unwrap();
        assert_eq!(batch.records[0].product_name, "Nasi siram cumi ");
    }

    #[test]
    fn test_bad_date_rejected() {
        let err = clean_rows("07/11/2025", &[raw(Some("Katsu"), "1")]).unwrap_err();
        assert!(matches!(err, LarderError::InvalidDate { .. }));
    }
}
