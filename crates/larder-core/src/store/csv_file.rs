use crate::error::LarderError;
use crate::model::IngredientDemandRow;
use crate::store::{ensure_unique_dates, upsert_rows, DemandStore};
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Default ledger file name.
pub const DEFAULT_STORE_FILE: &str = "ingredients_historical.csv";

/// How long an upsert waits for another writer to release the ledger.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);

const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(20);

/// Ledger kept as a CSV file with columns
/// `TANGGAL,chicken,beef,squid,tempe,tahu`.
///
/// Saves write a temporary file next to the target and rename it into
/// place, so a failed write never leaves a half-written ledger behind.
/// Upserts hold `<ledger>.lock` (created exclusively) for the whole
/// read-modify-write, so concurrent `larder` processes take turns.
#[derive(Debug, Clone)]
pub struct CsvDemandStore {
    path: PathBuf,
    lock_timeout: Duration,
}

impl CsvDemandStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvDemandStore {
            path: path.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lock file guarding upserts, e.g. `ingredients_historical.csv.lock`.
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn acquire_lock(&self) -> Result<LedgerLock, LarderError> {
        let lock_path = self.lock_path();
        let deadline = Instant::now() + self.lock_timeout;
        loop {
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&lock_path)
            {
                Ok(_) => return Ok(LedgerLock { path: lock_path }),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    if Instant::now() >= deadline {
                        return Err(self.storage_error(format!(
                            "locked by another writer; remove {} if no other larder is running",
                            lock_path.display()
                        )));
                    }
                    std::thread::sleep(LOCK_RETRY_INTERVAL);
                }
                Err(e) => return Err(self.storage_error(e)),
            }
        }
    }

    fn storage_error(&self, reason: impl ToString) -> LarderError {
        LarderError::Storage {
            location: self.location(),
            reason: reason.to_string(),
        }
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }
}

impl DemandStore for CsvDemandStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<IngredientDemandRow>, LarderError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| self.storage_error(e))?;

        let mut rows = Vec::new();
        for (i, result) in reader.deserialize::<IngredientDemandRow>().enumerate() {
            let row = result.map_err(|e| self.storage_error(format!("row {}: {}", i + 1, e)))?;
            rows.push(row);
        }

        ensure_unique_dates(&rows).map_err(|reason| self.storage_error(reason))?;
        rows.sort_by_key(|r| r.date);

        tracing::debug!(store = %self.location(), rows = rows.len(), "loaded demand ledger");
        Ok(rows)
    }

    fn save(&self, rows: &[IngredientDemandRow]) -> Result<(), LarderError> {
        let dir = self.parent_dir();
        let tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.storage_error(e))?;

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(true)
                .from_writer(tmp.as_file());
            for row in rows {
                writer.serialize(row).map_err(|e| self.storage_error(e))?;
            }
            writer.flush().map_err(|e| self.storage_error(e))?;
        }
        tmp.as_file().sync_all().map_err(|e| self.storage_error(e))?;

        tmp.persist(&self.path)
            .map_err(|e| self.storage_error(e.error))?;

        tracing::info!(store = %self.location(), rows = rows.len(), "saved demand ledger");
        Ok(())
    }

    fn upsert(&self, row: IngredientDemandRow) -> Result<Vec<IngredientDemandRow>, LarderError> {
        let _lock = self.acquire_lock()?;
        let rows = upsert_rows(self.load()?, row);
        self.save(&rows)?;
        Ok(rows)
    }
}

/// Held while an upsert runs; removes the lock file when dropped.
struct LedgerLock {
    path: PathBuf,
}

impl Drop for LedgerLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(lock = %self.path.display(), error = %e, "failed to release ledger lock");
        }
    }
}
