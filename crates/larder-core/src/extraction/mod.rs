pub mod csv_export;
pub mod xlsx_export;

use crate::error::LarderError;
use crate::model::RawSaleRow;
use std::path::Path;

pub use csv_export::CsvExportExtractor;
pub use xlsx_export::XlsxExportExtractor;

/// Lines before the table in a point-of-sale recap (title and period).
pub const PREAMBLE_LINES: usize = 2;

/// Trait for sales export readers.
pub trait SalesExtractor: Send + Sync {
    /// Read raw rows from export bytes, with the preamble and a repeated
    /// header row already stripped.
    fn extract_rows(&self, bytes: &[u8]) -> Result<Vec<RawSaleRow>, LarderError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Pick an extractor from the file extension; anything that is not a
/// workbook is read as CSV.
pub fn extractor_for_path(path: &Path) -> Box<dyn SalesExtractor> {
    let is_workbook = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false);
    if is_workbook {
        Box::new(XlsxExportExtractor::new())
    } else {
        Box::new(CsvExportExtractor::new())
    }
}

/// Build a raw row from the first three cells (product, quantity, price).
pub(crate) fn row_from_cells<I>(cells: I) -> RawSaleRow
where
    I: IntoIterator<Item = Option<String>>,
{
    let mut cells = cells.into_iter();
    let mut next = || cells.next().flatten().filter(|s| !s.is_empty());
    RawSaleRow {
        product_name: next(),
        quantity: next(),
        price: next(),
    }
}

/// Drop the column header row if the export repeats it as the first row.
pub(crate) fn strip_repeated_header(rows: &mut Vec<RawSaleRow>) {
    let is_header = rows
        .first()
        .and_then(|r| r.product_name.as_deref())
        .map(|name| name.trim().to_uppercase() == "PRODUK")
        .unwrap_or(false);
    if is_header {
        rows.remove(0);
    }
}
