use larder_core::error::LarderError;
use larder_core::store::{CsvDemandStore, DemandStore};
use std::path::Path;

use crate::output::{self, OutputFormat};

pub fn run(store_path: &Path, output_format: OutputFormat) -> Result<(), LarderError> {
    let store = CsvDemandStore::new(store_path);
    let rows = store.load()?;

    match output_format {
        OutputFormat::Json => output::json::print(&rows)?,
        OutputFormat::Table => output::table::print_history(&rows, &store.location())?,
    }

    Ok(())
}
