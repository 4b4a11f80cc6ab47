use crate::error::LarderError;
use crate::extraction::{row_from_cells, strip_repeated_header, SalesExtractor, PREAMBLE_LINES};
use crate::model::RawSaleRow;

/// Reads the daily recap CSV (`PRODUK,JUMLAH,HARGA` after a short preamble).
pub struct CsvExportExtractor {
    preamble_lines: usize,
}

impl CsvExportExtractor {
    pub fn new() -> Self {
        CsvExportExtractor {
            preamble_lines: PREAMBLE_LINES,
        }
    }

    pub fn with_preamble_lines(preamble_lines: usize) -> Self {
        CsvExportExtractor { preamble_lines }
    }
}

impl Default for CsvExportExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SalesExtractor for CsvExportExtractor {
    fn extract_rows(&self, bytes: &[u8]) -> Result<Vec<RawSaleRow>, LarderError> {
        let body = skip_lines(bytes, self.preamble_lines);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(body);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| LarderError::InputFormat(e.to_string()))?;
            rows.push(row_from_cells(record.iter().map(|f| Some(f.to_string()))));
        }

        strip_repeated_header(&mut rows);
        tracing::debug!(backend = self.backend_name(), rows = rows.len(), "extracted sales rows");
        Ok(rows)
    }

    fn backend_name(&self) -> &str {
        "csv"
    }
}

/// Slice off the first `n` lines.
fn skip_lines(bytes: &[u8], n: usize) -> &[u8] {
    let mut rest = bytes;
    for _ in 0..n {
        match rest.iter().position(|&b| b == b'\n') {
            Some(idx) => rest = &rest[idx + 1..],
            None => return &[],
        }
    }
    rest
}
