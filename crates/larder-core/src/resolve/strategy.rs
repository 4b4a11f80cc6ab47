use crate::rules::schema::{IngredientMultipliers, RuleTableDef};
use rust_decimal::Decimal;

/// One tier of ingredient resolution.
///
/// Returns `None` when the tier does not apply to the product, so the
/// resolver moves on to the next tier.
pub trait ResolutionStrategy: Send + Sync {
    fn resolve(&self, product_name: &str, rules: &RuleTableDef) -> Option<IngredientMultipliers>;

    /// Name of this tier (for diagnostics).
    fn name(&self) -> &'static str;
}

/// Exact, case-sensitive lookup in the rule table, after standardizing
/// known name variants through the alias table.
pub struct ExactMatch;

impl ResolutionStrategy for ExactMatch {
    fn resolve(&self, product_name: &str, rules: &RuleTableDef) -> Option<IngredientMultipliers> {
        let key = rules
            .aliases
            .get(&product_name.to_lowercase())
            .map(String::as_str)
            .unwrap_or(product_name);
        rules.exact_rules.get(key).cloned()
    }

    fn name(&self) -> &'static str {
        "exact"
    }
}

/// Keyword detection over the lower-cased name. Every matching rule
/// contributes and multipliers for the same ingredient add up.
pub struct KeywordFallback;

impl ResolutionStrategy for KeywordFallback {
    fn resolve(&self, product_name: &str, rules: &RuleTableDef) -> Option<IngredientMultipliers> {
        let lower = product_name.to_lowercase();
        let mut detected = IngredientMultipliers::new();

        for rule in rules.keyword_rules.iter().filter(|r| r.matches(&lower)) {
            for (ingredient, multiplier) in &rule.ingredients {
                *detected.entry(ingredient.clone()).or_insert(Decimal::ZERO) += *multiplier;
            }
        }

        if detected.is_empty() {
            None
        } else {
            Some(detected)
        }
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}
