use crate::error::LarderError;
use crate::model::IngredientDemandRow;
use crate::store::DemandStore;
use std::sync::Mutex;

/// In-memory ledger, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryDemandStore {
    rows: Mutex<Vec<IngredientDemandRow>>,
    read_only: bool,
}

impl MemoryDemandStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut rows: Vec<IngredientDemandRow>) -> Self {
        rows.sort_by_key(|r| r.date);
        MemoryDemandStore {
            rows: Mutex::new(rows),
            read_only: false,
        }
    }

    /// A store whose writes always fail, leaving its contents untouched.
    pub fn read_only(rows: Vec<IngredientDemandRow>) -> Self {
        MemoryDemandStore {
            read_only: true,
            ..Self::with_rows(rows)
        }
    }

    fn rows(&self) -> std::sync::MutexGuard<'_, Vec<IngredientDemandRow>> {
        self.rows.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DemandStore for MemoryDemandStore {
    fn location(&self) -> String {
        "memory".into()
    }

    fn load(&self) -> Result<Vec<IngredientDemandRow>, LarderError> {
        Ok(self.rows().clone())
    }

    fn save(&self, rows: &[IngredientDemandRow]) -> Result<(), LarderError> {
        if self.read_only {
            return Err(LarderError::Storage {
                location: self.location(),
                reason: "store is read-only".into(),
            });
        }
        *self.rows() = rows.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn row(day: u32) -> IngredientDemandRow {
        IngredientDemandRow::empty(NaiveDate::from_ymd_opt(2025, 7, day).unwrap())
    }

    #[test]
    fn test_new_store_is_empty() {
        assert!(MemoryDemandStore::new().load().unwrap().is_empty());
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let store = MemoryDemandStore::new();
        let mut r = row(11);
        r.squid = dec!(160);
        store.upsert(r.clone()).unwrap();
        store.upsert(r.clone()).unwrap();
        assert_eq!(store.load().unwrap(), vec![r]);
    }

    #[test]
    fn test_read_only_store_rejects_writes() {
        let store = MemoryDemandStore::read_only(vec![row(10)]);
        let err = store.upsert(row(11)).unwrap_err();
        assert!(matches!(err, LarderError::Storage { .. }));
        assert_eq!(store.load().unwrap(), vec![row(10)]);
    }
}
