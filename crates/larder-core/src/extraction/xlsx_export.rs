use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};

use crate::error::LarderError;
use crate::extraction::{row_from_cells, strip_repeated_header, SalesExtractor, PREAMBLE_LINES};
use crate::model::RawSaleRow;

/// Reads the daily recap when it is exported as an xlsx workbook.
///
/// Uses the first worksheet; the layout matches the CSV export (preamble
/// rows, then product, quantity and price columns).
pub struct XlsxExportExtractor {
    preamble_rows: usize,
}

impl XlsxExportExtractor {
    pub fn new() -> Self {
        XlsxExportExtractor {
            preamble_rows: PREAMBLE_LINES,
        }
    }

    /// Raw rows of one worksheet: preamble skipped, blank rows and a
    /// repeated header removed.
    pub fn rows_from_sheet(&self, sheet: &Range<Data>) -> Vec<RawSaleRow> {
        let mut rows: Vec<RawSaleRow> = sheet
            .rows()
            .skip(self.preamble_rows)
            .filter(|cells| cells.iter().any(|c| !matches!(c, Data::Empty)))
            .map(|cells| row_from_cells(cells.iter().map(cell_as_string)))
            .collect();
        strip_repeated_header(&mut rows);
        rows
    }
}

impl Default for XlsxExportExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SalesExtractor for XlsxExportExtractor {
    fn extract_rows(&self, bytes: &[u8]) -> Result<Vec<RawSaleRow>, LarderError> {
        let cursor = Cursor::new(bytes);
        let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
            .map_err(|e| LarderError::InputFormat(format!("failed to open xlsx: {e}")))?;

        let sheet = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| LarderError::InputFormat("workbook has no worksheets".into()))?
            .map_err(|e| LarderError::InputFormat(format!("failed to read worksheet: {e}")))?;

        let rows = self.rows_from_sheet(&sheet);
        tracing::debug!(backend = self.backend_name(), rows = rows.len(), "extracted sales rows");
        Ok(rows)
    }

    fn backend_name(&self) -> &str {
        "xlsx"
    }
}

fn cell_as_string(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::Empty => None,
        _ => Some(format!("{cell}")),
    }
}
