use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of a point-of-sale recap as handed over by the caller's I/O
/// layer. Fields are kept as text; nothing is validated yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSaleRow {
    pub product_name: Option<String>,
    pub quantity: Option<String>,
    /// Carried through from the export but never used.
    pub price: Option<String>,
}

impl RawSaleRow {
    pub fn new(product_name: &str, quantity: &str) -> Self {
        RawSaleRow {
            product_name: Some(product_name.to_string()),
            quantity: Some(quantity.to_string()),
            price: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub date: NaiveDate,
    pub product_name: String,
    pub quantity: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    #[serde(flatten)]
    pub record: SaleRecord,
    pub is_perishable: bool,
}

/// Ingredient columns tracked in the historical store, in column order.
pub const TRACKED_INGREDIENTS: [Ingredient; 5] = [
    Ingredient::Chicken,
    Ingredient::Beef,
    Ingredient::Squid,
    Ingredient::Tempe,
    Ingredient::Tofu,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ingredient {
    Chicken,
    Beef,
    Squid,
    Tempe,
    Tofu,
}

impl Ingredient {
    /// Identifier used by rule tables.
    pub fn id(&self) -> &'static str {
        match self {
            Ingredient::Chicken => "chicken",
            Ingredient::Beef => "beef",
            Ingredient::Squid => "squid",
            Ingredient::Tempe => "tempe",
            Ingredient::Tofu => "tofu",
        }
    }

    /// Column header in the persisted ledger.
    pub fn column(&self) -> &'static str {
        match self {
            Ingredient::Tofu => "tahu",
            other => other.id(),
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// One day's ingredient requirement in grams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientDemandRow {
    #[serde(rename = "TANGGAL")]
    pub date: NaiveDate,
    pub chicken: Decimal,
    pub beef: Decimal,
    pub squid: Decimal,
    pub tempe: Decimal,
    #[serde(rename = "tahu")]
    pub tofu: Decimal,
}

impl IngredientDemandRow {
    pub fn empty(date: NaiveDate) -> Self {
        IngredientDemandRow {
            date,
            chicken: Decimal::ZERO,
            beef: Decimal::ZERO,
            squid: Decimal::ZERO,
            tempe: Decimal::ZERO,
            tofu: Decimal::ZERO,
        }
    }

    pub fn get(&self, ingredient: Ingredient) -> Decimal {
        match ingredient {
            Ingredient::Chicken => self.chicken,
            Ingredient::Beef => self.beef,
            Ingredient::Squid => self.squid,
            Ingredient::Tempe => self.tempe,
            Ingredient::Tofu => self.tofu,
        }
    }

    pub fn set(&mut self, ingredient: Ingredient, grams: Decimal) {
        let slot = match ingredient {
            Ingredient::Chicken => &mut self.chicken,
            Ingredient::Beef => &mut self.beef,
            Ingredient::Squid => &mut self.squid,
            Ingredient::Tempe => &mut self.tempe,
            Ingredient::Tofu => &mut self.tofu,
        };
        *slot = grams;
    }

    pub fn total(&self) -> Decimal {
        TRACKED_INGREDIENTS.iter().map(|i| self.get(*i)).sum()
    }
}
