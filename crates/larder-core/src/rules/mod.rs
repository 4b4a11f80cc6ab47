pub mod builtin;
pub mod schema;

use crate::error::LarderError;
use rust_decimal::Decimal;
use schema::{IngredientMultipliers, RuleTableDef};
use std::path::Path;

/// Load a rule table from a JSON file.
pub fn load_rule_table(path: &Path) -> Result<RuleTableDef, LarderError> {
    let content = std::fs::read_to_string(path).map_err(|e| LarderError::RulesetLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_rule_table(&content, path)
}

/// Parse a rule table from a JSON string.
pub fn parse_rule_table(json: &str, source: &Path) -> Result<RuleTableDef, LarderError> {
    let table: RuleTableDef = serde_json::from_str(json).map_err(|e| LarderError::RulesetLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_rule_table(&table)?;
    Ok(table)
}

/// Parse a rule table from a JSON string (no file path context).
pub fn parse_rule_table_str(json: &str) -> Result<RuleTableDef, LarderError> {
    let table: RuleTableDef = serde_json::from_str(json).map_err(LarderError::Json)?;
    validate_rule_table(&table)?;
    Ok(table)
}

/// Validate that a rule table is well-formed.
pub fn validate_rule_table(table: &RuleTableDef) -> Result<(), LarderError> {
    if table.name.trim().is_empty() {
        return Err(LarderError::RulesetInvalid("name must not be empty".into()));
    }

    if table.perishable_keywords.is_empty() {
        return Err(LarderError::RulesetInvalid(
            "perishable_keywords must not be empty".into(),
        ));
    }

    // Keywords are matched against lower-cased product names.
    let keyword_lists = table
        .perishable_keywords
        .iter()
        .chain(table.shelf_stable_exemptions.iter())
        .chain(table.aliases.keys())
        .chain(table.keyword_rules.iter().flat_map(|r| r.keywords.iter()));
    for keyword in keyword_lists {
        if keyword.is_empty() {
            return Err(LarderError::RulesetInvalid(
                "keywords must not be empty strings".into(),
            ));
        }
        if keyword.to_lowercase() != *keyword {
            return Err(LarderError::RulesetInvalid(format!(
                "keyword '{}' must be lower-case",
                keyword
            )));
        }
    }

    for (ingredient, weight) in &table.portion_weights {
        if *weight < Decimal::ZERO {
            return Err(LarderError::RulesetInvalid(format!(
                "portion weight for '{}' is negative",
                ingredient
            )));
        }
    }

    for (product, target) in &table.aliases {
        if !table.exact_rules.contains_key(target) {
            return Err(LarderError::RulesetInvalid(format!(
                "alias '{}' points to '{}', which has no exact rule",
                product, target
            )));
        }
    }

    for (product, multipliers) in &table.exact_rules {
        check_multipliers(&format!("exact rule '{}'", product), multipliers)?;
    }

    for (i, rule) in table.keyword_rules.iter().enumerate() {
        if rule.keywords.is_empty() {
            return Err(LarderError::RulesetInvalid(format!(
                "keyword rule #{} has no keywords",
                i + 1
            )));
        }
        check_multipliers(&format!("keyword rule #{}", i + 1), &rule.ingredients)?;
    }

    Ok(())
}

fn check_multipliers(label: &str, multipliers: &IngredientMultipliers) -> Result<(), LarderError> {
    if multipliers.is_empty() {
        return Err(LarderError::RulesetInvalid(format!(
            "{} maps to no ingredients",
            label
        )));
    }
    for (ingredient, multiplier) in multipliers {
        if *multiplier < Decimal::ZERO {
            return Err(LarderError::RulesetInvalid(format!(
                "{} has negative multiplier for '{}'",
                label, ingredient
            )));
        }
    }
    Ok(())
}
