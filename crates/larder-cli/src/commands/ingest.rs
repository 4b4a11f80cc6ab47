use larder_core::error::LarderError;
use larder_core::store::{CsvDemandStore, SerializedStore};
use std::path::Path;

use crate::commands::{load_rules, read_export};
use crate::output::{self, OutputFormat};

pub fn run(
    input_file: &Path,
    date: &str,
    rules_path: Option<&Path>,
    store_path: &Path,
    output_format: OutputFormat,
) -> Result<(), LarderError> {
    let rules = load_rules(rules_path)?;
    let (bytes, extractor) = read_export(input_file)?;
    let store = SerializedStore::new(CsvDemandStore::new(store_path));

    let report =
        match larder_core::process_export(date, &bytes, extractor.as_ref(), &rules, &store) {
            Ok(report) => report,
            Err(e) => {
                if let LarderError::Persist { row, .. } = &e {
                    let printed = output::table::write_history(
                        &mut std::io::stderr().lock(),
                        std::slice::from_ref(row.as_ref()),
                        "computed row (not stored)",
                    );
                    if let Err(print_err) = printed {
                        tracing::warn!(error = %print_err, "could not print the unstored row");
                    }
                }
                return Err(e);
            }
        };

    match output_format {
        OutputFormat::Json => output::json::print(&report)?,
        OutputFormat::Table => output::table::print_report(&report, false)?,
    }

    Ok(())
}
