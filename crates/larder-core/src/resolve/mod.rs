pub mod strategy;

use crate::error::LarderError;
use crate::model::ClassifiedRecord;
use crate::parsing::values::servings;
use crate::rules::schema::{IngredientMultipliers, RuleTableDef};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use strategy::{ExactMatch, KeywordFallback, ResolutionStrategy};

/// Ingredient id -> grams.
pub type IngredientMasses = BTreeMap<String, Decimal>;

/// Which tier resolved a product, and to what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub strategy: &'static str,
    pub multipliers: IngredientMultipliers,
}

/// Maps perishable sale records onto ingredient masses.
///
/// Tiers are tried in order and the first one that applies wins. The
/// default chain is exact lookup followed by keyword detection.
pub struct IngredientResolver<'a> {
    rules: &'a RuleTableDef,
    strategies: Vec<Box<dyn ResolutionStrategy>>,
}

impl<'a> IngredientResolver<'a> {
    pub fn new(rules: &'a RuleTableDef) -> Self {
        let strategies: Vec<Box<dyn ResolutionStrategy>> =
            vec![Box::new(ExactMatch), Box::new(KeywordFallback)];
        Self::with_strategies(rules, strategies)
    }

    pub fn with_strategies(
        rules: &'a RuleTableDef,
        strategies: Vec<Box<dyn ResolutionStrategy>>,
    ) -> Self {
        IngredientResolver { rules, strategies }
    }

    /// Find the ingredient multipliers for a product name.
    pub fn lookup(&self, product_name: &str) -> Option<Resolution> {
        self.strategies.iter().find_map(|s| {
            s.resolve(product_name, self.rules).map(|multipliers| Resolution {
                strategy: s.name(),
                multipliers,
            })
        })
    }

    /// Ingredient masses consumed by one record. Empty when no rule matches.
    ///
    /// mass = multiplier x whole servings x portion weight; an ingredient
    /// without a portion weight contributes zero.
    pub fn resolve(&self, record: &ClassifiedRecord) -> Result<IngredientMasses, LarderError> {
        let name = &record.record.product_name;
        let resolution = match self.lookup(name) {
            Some(r) => r,
            None => {
                tracing::debug!(product = %name, "no ingredient rule matched");
                return Ok(IngredientMasses::new());
            }
        };

        let count = servings(record.record.quantity);
        resolution
            .multipliers
            .iter()
            .map(|(ingredient, multiplier)| {
                multiplier
                    .checked_mul(count)
                    .and_then(|m| m.checked_mul(self.rules.portion_weight(ingredient)))
                    .map(|grams| (ingredient.clone(), grams))
                    .ok_or_else(|| LarderError::Overflow {
                        product: name.clone(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SaleRecord;
    use crate::rules::builtin::load_preset;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn perishable(name: &str, qty: Decimal) -> ClassifiedRecord {
        ClassifiedRecord {
            record: SaleRecord {
                date: NaiveDate::from_ymd_opt(2025, 7, 11).unwrap(),
                product_name: name.into(),
                quantity: qty,
            },
            is_perishable: true,
        }
    }

    #[test]
    fn test_katsu_four_servings() {
        let rules = load_preset("warung").unwrap();
        let masses = IngredientResolver::new(&rules)
            .resolve(&perishable("Katsu", dec!(4)))
            .unwrap();
        assert_eq!(masses.get("chicken"), Some(&dec!(500)));
        assert_eq!(masses.len(), 1);
    }

    #[test]
    fn test_nasi_rempah_cumi() {
        let rules = load_preset("warung").unwrap();
        let masses = IngredientResolver::new(&rules)
            .resolve(&perishable("Nasi rempah cumi", dec!(2)))
            .unwrap();
        assert_eq!(masses.get("squid"), Some(&dec!(160)));
    }

    #[test]
    fn test_exact_rule_wins_over_keywords() {
        let rules = load_preset("warung").unwrap();
        let resolver = IngredientResolver::new(&rules);
        let r = resolver.lookup("Tambahan katsu").unwrap();
        assert_eq!(r.strategy, "exact");
        assert_eq!(r.multipliers.get("chicken"), Some(&dec!(0.5)));

        let masses = resolver
            .resolve(&perishable("Tambahan katsu", dec!(2)))
            .unwrap();
        assert_eq!(masses.get("chicken"), Some(&dec!(125)));
    }

    #[test]
    fn test_fallback_used_for_unknown_names() {
        let rules = load_preset("warung").unwrap();
        let resolver = IngredientResolver::new(&rules);
        assert_eq!(resolver.lookup("Tempe mendoan").unwrap().strategy, "keyword");

        let masses = resolver
            .resolve(&perishable("Tempe mendoan", dec!(3)))
            .unwrap();
        assert_eq!(masses.get("tempe"), Some(&dec!(150)));
    }

    #[test]
    fn test_quantity_truncated_to_servings() {
        let rules = load_preset("warung").unwrap();
        let masses = IngredientResolver::new(&rules)
            .resolve(&perishable("Katsu", dec!(2.7)))
            .unwrap();
        assert_eq!(masses.get("chicken"), Some(&dec!(250)));
    }

    #[test]
    fn test_ingredient_without_portion_weight_is_zero() {
        let rules = load_preset("warung").unwrap();
        let masses = IngredientResolver::new(&rules)
            .resolve(&perishable("French Fries Bolognese", dec!(3)))
            .unwrap();
        assert_eq!(masses.get("ground_meat"), Some(&Decimal::ZERO));
    }

    #[test]
    fn test_no_rule_gives_empty() {
        let rules = load_preset("warung").unwrap();
        let exact_only: Vec<Box<dyn ResolutionStrategy>> = vec![Box::new(ExactMatch)];
        let resolver = IngredientResolver::with_strategies(&rules, exact_only);
        let masses = resolver.resolve(&perishable("Tahu bakso", dec!(1))).unwrap();
        assert!(masses.is_empty());
    }

    #[test]
    fn test_mass_overflow_is_an_error() {
        let mut rules = load_preset("warung").unwrap();
        rules.portion_weights.insert("chicken".into(), Decimal::MAX);
        let err = IngredientResolver::new(&rules)
            .resolve(&perishable("Katsu", dec!(2)))
            .unwrap_err();
        assert!(matches!(err, LarderError::Overflow { ref product } if product == "Katsu"));
    }
}
