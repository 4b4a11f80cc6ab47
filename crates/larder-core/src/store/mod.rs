pub mod csv_file;
pub mod memory;

use crate::error::LarderError;
use crate::model::IngredientDemandRow;
use std::sync::Mutex;

pub use csv_file::CsvDemandStore;
pub use memory::MemoryDemandStore;

/// Backing storage for the ingredient demand ledger.
///
/// Implementations only need `load` and `save`; `upsert` is a full
/// read-modify-write on top of them. Use [`SerializedStore`] when more than
/// one caller can upsert at the same time.
pub trait DemandStore: Send + Sync {
    /// Human-readable location (file path, "memory", ...).
    fn location(&self) -> String;

    /// All rows, sorted by date. A store that does not exist yet is empty.
    fn load(&self) -> Result<Vec<IngredientDemandRow>, LarderError>;

    /// Replace the whole store with `rows`.
    fn save(&self, rows: &[IngredientDemandRow]) -> Result<(), LarderError>;

    /// Insert `row`, replacing any existing row for the same date.
    ///
    /// Returns the store contents after the write.
    fn upsert(&self, row: IngredientDemandRow) -> Result<Vec<IngredientDemandRow>, LarderError> {
        let rows = upsert_rows(self.load()?, row);
        self.save(&rows)?;
        Ok(rows)
    }
}

/// Replace-or-insert by date, keeping the ledger sorted ascending.
pub fn upsert_rows(
    mut rows: Vec<IngredientDemandRow>,
    row: IngredientDemandRow,
) -> Vec<IngredientDemandRow> {
    rows.retain(|r| r.date != row.date);
    rows.push(row);
    rows.sort_by_key(|r| r.date);
    rows
}

/// Check the one-row-per-date invariant on freshly loaded rows.
pub(crate) fn ensure_unique_dates(rows: &[IngredientDemandRow]) -> Result<(), String> {
    let mut dates: Vec<_> = rows.iter().map(|r| r.date).collect();
    dates.sort();
    match dates.windows(2).find(|w| w[0] == w[1]) {
        Some(w) => Err(format!("duplicate TANGGAL {}", w[0])),
        None => Ok(()),
    }
}

/// Wraps a store so that every upsert runs inside one critical section.
///
/// Without it, two upserts reading the same snapshot would each write back
/// their own version and one of them would be lost. This only covers
/// callers sharing one process; [`CsvDemandStore`] also locks the file
/// itself for writers in other processes.
pub struct SerializedStore<S> {
    inner: S,
    lock: Mutex<()>,
}

impl<S: DemandStore> SerializedStore<S> {
    pub fn new(inner: S) -> Self {
        SerializedStore {
            inner,
            lock: Mutex::new(()),
        }
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        // The guarded value is (), so a poisoned lock carries no bad state.
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<S: DemandStore> DemandStore for SerializedStore<S> {
    fn location(&self) -> String {
        self.inner.location()
    }

    fn load(&self) -> Result<Vec<IngredientDemandRow>, LarderError> {
        let _guard = self.guard();
        self.inner.load()
    }

    fn save(&self, rows: &[IngredientDemandRow]) -> Result<(), LarderError> {
        let _guard = self.guard();
        self.inner.save(rows)
    }

    fn upsert(&self, row: IngredientDemandRow) -> Result<Vec<IngredientDemandRow>, LarderError> {
        let _guard = self.guard();
        self.inner.upsert(row)
    }
}
