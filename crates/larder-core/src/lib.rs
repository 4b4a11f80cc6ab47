pub mod aggregate;
pub mod classify;
pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod resolve;
pub mod rules;
pub mod store;
pub mod weather;

use aggregate::aggregate;
use classify::{classify, partition_products, SalesReport};
use error::LarderError;
use extraction::SalesExtractor;
use model::RawSaleRow;
use parsing::clean_rows;
use resolve::IngredientResolver;
use rules::schema::RuleTableDef;
use store::DemandStore;

/// Run the sales pipeline for one processing date without touching the
/// historical store.
///
/// Cleans the raw rows, classifies them, and aggregates the perishable ones
/// into a single ingredient demand row.
pub fn analyze_sales(
    sales_date: &str,
    rows: &[RawSaleRow],
    rules: &RuleTableDef,
) -> Result<SalesReport, LarderError> {
    let batch = clean_rows(sales_date, rows)?;
    let date = batch.date;

    let classified = classify(&batch.records, rules);
    let products = partition_products(&classified);

    let resolver = IngredientResolver::new(rules);
    let aggregation = aggregate(date, &classified, &resolver)?;

    tracing::debug!(
        date = %date,
        products = products.unique_products.len(),
        perishable = products.perishable_products.len(),
        "analyzed sales batch"
    );

    Ok(SalesReport {
        sales_date: date,
        num_unique_products: products.unique_products.len(),
        unique_products: products.unique_products,
        perishable_products: products.perishable_products,
        non_perishable_products: products.non_perishable_products,
        unmapped_products: aggregation.unmapped_products,
        dropped_rows: batch.dropped,
        historical_store_location: None,
        ingredient_demand: aggregation.row,
    })
}

/// Main API entry point: process one day's sales and upsert the resulting
/// demand row into the historical store.
///
/// If the store cannot be read or written, the computed row comes back
/// inside [`LarderError::Persist`] and the store is left as it was.
pub fn process_sales_history(
    sales_date: &str,
    rows: &[RawSaleRow],
    rules: &RuleTableDef,
    store: &dyn DemandStore,
) -> Result<SalesReport, LarderError> {
    let mut report = analyze_sales(sales_date, rows, rules)?;

    if let Err(e) = store.upsert(report.ingredient_demand.clone()) {
        tracing::error!(store = %store.location(), error = %e, "failed to store demand row");
        return Err(LarderError::Persist {
            row: Box::new(report.ingredient_demand),
            source: Box::new(e),
        });
    }

    tracing::info!(
        date = %report.sales_date,
        store = %store.location(),
        "stored ingredient demand"
    );
    report.historical_store_location = Some(store.location());
    Ok(report)
}

/// Read an export file's bytes with `extractor` and process them.
pub fn process_export(
    sales_date: &str,
    bytes: &[u8],
    extractor: &dyn SalesExtractor,
    rules: &RuleTableDef,
    store: &dyn DemandStore,
) -> Result<SalesReport, LarderError> {
    let rows = extractor.extract_rows(bytes)?;
    process_sales_history(sales_date, &rows, rules, store)
}
