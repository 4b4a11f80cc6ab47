pub mod classify;
pub mod history;
pub mod ingest;
pub mod rules;
pub mod weather;

use larder_core::error::LarderError;
use larder_core::extraction::{extractor_for_path, SalesExtractor};
use larder_core::rules::builtin;
use larder_core::rules::schema::RuleTableDef;
use std::path::Path;

/// Load a custom rule table, or the builtin preset when no path is given.
pub(crate) fn load_rules(path: Option<&Path>) -> Result<RuleTableDef, LarderError> {
    match path {
        Some(path) => larder_core::rules::load_rule_table(path),
        None => builtin::load_preset(builtin::DEFAULT_PRESET),
    }
}

/// Read an export file and pick the extractor matching its extension.
pub(crate) fn read_export(path: &Path) -> Result<(Vec<u8>, Box<dyn SalesExtractor>), LarderError> {
    let bytes = std::fs::read(path)?;
    let extractor = extractor_for_path(path);
    tracing::debug!(
        file = %path.display(),
        backend = extractor.backend_name(),
        bytes = bytes.len(),
        "read sales export"
    );
    Ok((bytes, extractor))
}
