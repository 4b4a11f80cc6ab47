use crate::error::LarderError;
use crate::rules::schema::RuleTableDef;
use crate::rules::validate_rule_table;

const WARUNG_JSON: &str = include_str!("../../../../rules/warung.json");

/// Available predefined rule tables.
pub const PRESETS: &[&str] = &["warung"];

/// Preset used when no rule table is given.
pub const DEFAULT_PRESET: &str = "warung";

/// Load a predefined rule table by name.
pub fn load_preset(name: &str) -> Result<RuleTableDef, LarderError> {
    match name {
        "warung" => {
            let table: RuleTableDef = serde_json::from_str(WARUNG_JSON)?;
            validate_rule_table(&table)?;
            Ok(table)
        }
        _ => Err(LarderError::RulesetInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}
