use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ingredient id -> portion multiplier for one serving.
pub type IngredientMultipliers = BTreeMap<String, Decimal>;

/// A rule table describing how menu items map onto raw ingredients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleTableDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Lower-case substrings that mark a product as perishable.
    pub perishable_keywords: Vec<String>,
    /// Lower-case phrases that override a perishable keyword match.
    #[serde(default)]
    pub shelf_stable_exemptions: Vec<String>,
    /// Grams consumed by one serving, per ingredient id.
    pub portion_weights: BTreeMap<String, Decimal>,
    /// Lower-cased product name -> exact rule key.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    /// Exact product name (case-sensitive) -> ingredient multipliers.
    #[serde(default)]
    pub exact_rules: BTreeMap<String, IngredientMultipliers>,
    /// Evaluated in order when no exact rule matches; every match stacks.
    #[serde(default)]
    pub keyword_rules: Vec<KeywordRuleDef>,
}

/// Fires when any of its keywords occurs in the lower-cased product name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRuleDef {
    pub keywords: Vec<String>,
    pub ingredients: IngredientMultipliers,
    #[serde(default)]
    pub note: Option<String>,
}

impl KeywordRuleDef {
    pub fn matches(&self, lower_name: &str) -> bool {
        self.keywords.iter().any(|k| lower_name.contains(k.as_str()))
    }
}

impl RuleTableDef {
    /// Portion weight for an ingredient; unknown ingredients weigh nothing.
    pub fn portion_weight(&self, ingredient: &str) -> Decimal {
        self.portion_weights
            .get(ingredient)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}
