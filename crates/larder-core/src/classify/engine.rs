use crate::model::{ClassifiedRecord, SaleRecord};
use crate::rules::schema::RuleTableDef;
use std::collections::BTreeSet;

/// Tag each sale record as perishable or shelf-stable.
///
/// Output has the same order and length as the input.
pub fn classify(records: &[SaleRecord], rules: &RuleTableDef) -> Vec<ClassifiedRecord> {
    records
        .iter()
        .map(|record| ClassifiedRecord {
            is_perishable: is_perishable(&record.product_name, rules),
            record: record.clone(),
        })
        .collect()
}

/// Keyword-only check against the lower-cased product name.
///
/// A name is perishable when it contains a perishable keyword and, if the
/// table lists shelf-stable exemptions, none of those phrases.
pub fn is_perishable(product_name: &str, rules: &RuleTableDef) -> bool {
    let lower = product_name.to_lowercase();
    let keyword_hit = rules
        .perishable_keywords
        .iter()
        .any(|k| lower.contains(k.as_str()));
    if !keyword_hit {
        return false;
    }
    !rules
        .shelf_stable_exemptions
        .iter()
        .any(|phrase| lower.contains(phrase.as_str()))
}

/// Sorted, de-duplicated product name views over one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPartition {
    pub unique_products: Vec<String>,
    pub perishable_products: Vec<String>,
    pub non_perishable_products: Vec<String>,
}

pub fn partition_products(records: &[ClassifiedRecord]) -> ProductPartition {
    let mut all = BTreeSet::new();
    let mut perishable = BTreeSet::new();
    let mut shelf_stable = BTreeSet::new();

    for r in records {
        let name = r.record.product_name.as_str();
        all.insert(name);
        if r.is_perishable {
            perishable.insert(name);
        } else {
            shelf_stable.insert(name);
        }
    }

    let owned = |set: BTreeSet<&str>| -> Vec<String> {
        set.into_iter().map(str::to_string).collect()
    };
    ProductPartition {
        unique_products: owned(all),
        perishable_products: owned(perishable),
        non_perishable_products: owned(shelf_stable),
    }
}
