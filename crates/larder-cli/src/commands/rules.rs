use larder_core::error::LarderError;
use larder_core::model::TRACKED_INGREDIENTS;
use larder_core::rules::builtin;
use larder_core::rules::schema::{IngredientMultipliers, RuleTableDef};
use std::collections::BTreeSet;
use std::path::Path;

pub fn list() -> Result<(), LarderError> {
    println!("Available predefined rule tables:\n");
    for name in builtin::PRESETS {
        let rt = builtin::load_preset(name)?;
        let default_marker = if *name == builtin::DEFAULT_PRESET {
            " [default]"
        } else {
            ""
        };
        println!("  {:<8} {} (v{}){}", name, rt.name, rt.version, default_marker);
        if let Some(ref desc) = rt.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), LarderError> {
    let rt = builtin::load_preset(preset)?;

    println!("{} (version {})\n", rt.name, rt.version);
    if let Some(ref desc) = rt.description {
        println!("{}\n", desc);
    }

    println!(
        "A product is perishable when its lower-cased name contains any of:\n  {}\n",
        rt.perishable_keywords.join(", ")
    );
    if !rt.shelf_stable_exemptions.is_empty() {
        println!(
            "unless it also contains one of:\n  {}\n",
            rt.shelf_stable_exemptions.join(", ")
        );
    }

    println!("Portion weights (grams per serving):");
    for (ingredient, grams) in &rt.portion_weights {
        println!("  {:<12} {}", ingredient, grams);
    }
    println!();

    println!("Exact menu rules ({}):", rt.exact_rules.len());
    let max_name_len = rt
        .exact_rules
        .keys()
        .map(|k| k.chars().count())
        .max()
        .unwrap_or(20);
    for (product, multipliers) in &rt.exact_rules {
        println!(
            "  {:<width$}  {}",
            format!("\"{}\"", product),
            describe(multipliers),
            width = max_name_len + 2
        );
    }
    println!();

    if !rt.aliases.is_empty() {
        println!("Name aliases:");
        for (from, to) in &rt.aliases {
            println!("  {} -> {}", from, to);
        }
        println!();
    }

    println!("Keyword fallback (all matching rules add up):");
    for rule in &rt.keyword_rules {
        print!("  {:<20} {}", rule.keywords.join(" | "), describe(&rule.ingredients));
        match rule.note.as_deref() {
            Some(note) => println!("  ({})", note),
            None => println!(),
        }
    }
    println!();

    println!("Grams = multiplier x whole servings sold x portion weight.");
    println!("Ingredients without a portion weight count as zero.\n");

    Ok(())
}

pub fn schema() -> Result<(), LarderError> {
    print!(
        r#"JSON Rule Table Schema
======================

A rule table tells `larder` which menu items are perishable and how many
grams of each raw ingredient one serving uses. Run `larder rules explain
warung` to see the builtin table.

Top-level fields:
  name          (string, required)  Human-readable name of the rule table
  description   (string, optional)  What this rule table is for
  version       (string, required)  Version identifier (e.g., "2025.7")
  perishable_keywords
                (array, required)   Lower-case substrings marking a product
                                    as perishable, e.g. ["ayam", "cumi"]
  shelf_stable_exemptions
                (array, optional)   Lower-case phrases that keep a product
                                    non-perishable despite a keyword match
  portion_weights
                (object, required)  Ingredient id -> grams per serving
  aliases       (object, optional)  Lower-cased product name -> exact rule
                                    key, for known spelling variants
  exact_rules   (object, optional)  Exact product name (case-sensitive,
                                    whitespace included) -> multipliers
  keyword_rules (array, optional)   Fallback rules, see below

Each keyword rule:
  keywords      (array, required)   Fires if any occurs in the lower-cased name
  ingredients   (object, required)  Ingredient id -> multiplier
  note          (string, optional)  Free text shown by `larder rules explain`

Example:
{{
  "name": "Night market stall",
  "version": "1.0",
  "perishable_keywords": ["ayam", "tahu"],
  "portion_weights": {{ "chicken": "120", "tofu": "40" }},
  "exact_rules": {{
    "Ayam geprek": {{ "chicken": "1" }},
    "Tahu isi": {{ "tofu": "2" }}
  }},
  "keyword_rules": [
    {{ "keywords": ["ayam"], "ingredients": {{ "chicken": "1" }} }},
    {{ "keywords": ["tahu"], "ingredients": {{ "tofu": "1" }} }}
  ]
}}

Note: weights and multipliers must be quoted strings, not bare numbers,
to preserve exact decimal precision (e.g., "0.75" not 0.75).

The ledger tracks: chicken, beef, squid, tempe, tofu (column "tahu").
Other ingredient ids are accepted but never stored.
"#
    );
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), LarderError> {
    let rt = larder_core::rules::load_rule_table(file)?;

    println!("Rule table '{}' (v{}) is valid.", rt.name, rt.version);
    println!("  Perishable keywords: {}", rt.perishable_keywords.join(", "));
    println!("  Exact rules: {} products", rt.exact_rules.len());
    println!("  Keyword rules: {}", rt.keyword_rules.len());

    let warnings = lint(&rt);
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}

/// Problems that do not make a table invalid but will produce zero grams.
fn lint(rt: &RuleTableDef) -> Vec<String> {
    let tracked: BTreeSet<&str> = TRACKED_INGREDIENTS.iter().map(|i| i.id()).collect();
    let used: BTreeSet<&str> = rt
        .exact_rules
        .values()
        .chain(rt.keyword_rules.iter().map(|r| &r.ingredients))
        .flat_map(|m| m.keys().map(String::as_str))
        .collect();

    let mut warnings = Vec::new();
    for ingredient in &used {
        if !rt.portion_weights.contains_key(*ingredient) {
            warnings.push(format!(
                "ingredient '{}' has no portion weight and always counts as zero",
                ingredient
            ));
        } else if !tracked.contains(ingredient) {
            warnings.push(format!(
                "ingredient '{}' is not a ledger column and is never stored",
                ingredient
            ));
        }
    }
    warnings
}

fn describe(multipliers: &IngredientMultipliers) -> String {
    multipliers
        .iter()
        .map(|(ingredient, m)| format!("{} x{}", ingredient, m))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lint_flags_unweighted_bolognese() {
        let rt = builtin::load_preset("warung").unwrap();
        let warnings = lint(&rt);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("ground_meat"));
        assert!(warnings[1].contains("tomato"));
    }

    #[test]
    fn test_describe_multipliers() {
        let rt = builtin::load_preset("warung").unwrap();
        assert_eq!(describe(&rt.exact_rules["Tambahan katsu"]), "chicken x0.5");
    }
}
