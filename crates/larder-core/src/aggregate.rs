use crate::error::LarderError;
use crate::model::{ClassifiedRecord, IngredientDemandRow, TRACKED_INGREDIENTS};
use crate::resolve::{IngredientMasses, IngredientResolver};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeSet;

/// Decimal places kept in the demand ledger.
pub const LEDGER_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub row: IngredientDemandRow,
    /// Unrounded totals for every ingredient seen, tracked or not.
    pub totals: IngredientMasses,
    /// Perishable products that contributed no ingredient mass.
    pub unmapped_products: Vec<String>,
}

/// Sum the ingredient masses of a day's perishable records into one row.
///
/// Shelf-stable records are skipped. Ingredients outside the tracked
/// columns are kept in `totals` but not in the row.
pub fn aggregate(
    date: NaiveDate,
    records: &[ClassifiedRecord],
    resolver: &IngredientResolver<'_>,
) -> Result<Aggregation, LarderError> {
    let mut totals = IngredientMasses::new();
    let mut unmapped = BTreeSet::new();

    for record in records.iter().filter(|r| r.is_perishable) {
        let masses = resolver.resolve(record)?;
        if masses.values().all(|g| g.is_zero()) {
            unmapped.insert(record.record.product_name.clone());
        }
        for (ingredient, grams) in masses {
            let total = totals.entry(ingredient).or_insert(Decimal::ZERO);
            *total = total
                .checked_add(grams)
                .ok_or_else(|| LarderError::Overflow {
                    product: record.record.product_name.clone(),
                })?;
        }
    }

    let mut row = IngredientDemandRow::empty(date);
    for ingredient in TRACKED_INGREDIENTS {
        let total = totals.get(ingredient.id()).copied().unwrap_or(Decimal::ZERO);
        row.set(ingredient, round_ledger(total));
    }

    if !unmapped.is_empty() {
        tracing::warn!(
            date = %date,
            count = unmapped.len(),
            "perishable products without ingredient mass"
        );
    }

    Ok(Aggregation {
        row,
        totals,
        unmapped_products: unmapped.into_iter().collect(),
    })
}

/// Round half-to-even and pin the scale so values print as e.g. `500.00`.
pub fn round_ledger(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(LEDGER_SCALE, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(LEDGER_SCALE);
    rounded
}
