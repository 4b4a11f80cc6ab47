use crate::model::IngredientDemandRow;
use crate::parsing::DroppedRow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Result of processing one day's sales export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReport {
    /// The processing date, canonical `YYYY-MM-DD`.
    pub sales_date: NaiveDate,
    /// Every retained product name, sorted and de-duplicated.
    pub unique_products: Vec<String>,
    pub num_unique_products: usize,
    pub perishable_products: Vec<String>,
    pub non_perishable_products: Vec<String>,
    /// Perishable products that matched no ingredient rule.
    pub unmapped_products: Vec<String>,
    /// Rows left out because their quantity was unusable.
    pub dropped_rows: Vec<DroppedRow>,
    /// Where the demand row was stored; absent for dry runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historical_store_location: Option<String>,
    pub ingredient_demand: IngredientDemandRow,
}

impl SalesReport {
    pub fn dropped_row_count(&self) -> usize {
        self.dropped_rows.len()
    }
}
