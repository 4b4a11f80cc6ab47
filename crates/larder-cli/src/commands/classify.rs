use larder_core::error::LarderError;
use std::path::Path;

use crate::commands::{load_rules, read_export};
use crate::output::{self, OutputFormat};

/// Run the pipeline on an export without touching the ledger.
pub fn run(
    input_file: &Path,
    date: &str,
    rules_path: Option<&Path>,
    output_format: OutputFormat,
) -> Result<(), LarderError> {
    let rules = load_rules(rules_path)?;
    let (bytes, extractor) = read_export(input_file)?;
    let rows = extractor.extract_rows(&bytes)?;
    let report = larder_core::analyze_sales(date, &rows, &rules)?;

    match output_format {
        OutputFormat::Json => output::json::print(&report)?,
        OutputFormat::Table => output::table::print_report(&report, true)?,
    }

    Ok(())
}
