mod driver;
mod error;
mod lock;

use std::path::Path;

use bytes::Bytes;
use time::OffsetDateTime;

pub use self::{
    driver::{Driver, FileSystemDriver},
    error::Error,
    lock::HistoryLock,
};
use crate::{Entry, EntryId, EntrySnapshot, HistoryStore, InsertOutcome, Record};

/// [`HistoryStore`] bound to its persisted file.
///
/// Every mutation first picks up changes other processes made to the file and
/// then rewrites the whole file before returning. Processes sharing the file
/// serialize their mutations with [`HistoryManager::lock`].
pub struct HistoryManager {
    store: HistoryStore,
    driver: Box<dyn Driver>,
}

impl HistoryManager {
    /// Loads the history at `file_path`, a missing file yields an empty
    /// history.
    ///
    /// # Errors
    /// Returns [`Error::DeserializeHistory`] if the file is not a valid history.
    pub async fn load<P>(file_path: P, capacity: usize) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        Self::load_with_driver(Box::new(FileSystemDriver::new(file_path)), capacity).await
    }

    /// Like [`HistoryManager::load`], but a corrupted file is moved aside and
    /// the history starts empty.
    ///
    /// # Errors
    /// Returns an error if the file can not be read or moved aside.
    pub async fn load_or_recover<P>(file_path: P, capacity: usize) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let mut driver: Box<dyn Driver> = Box::new(FileSystemDriver::new(file_path));
        match driver.load().await {
            Ok(records) => Ok(Self::from_records(driver, records, capacity)),
            Err(err @ Error::DeserializeHistory { .. }) => {
                tracing::error!("{err}, starting with an empty history");
                driver.quarantine().await?;
                Ok(Self { store: HistoryStore::with_capacity(capacity), driver })
            }
            Err(err) => Err(err),
        }
    }

    /// # Errors
    pub async fn load_with_driver(
        mut driver: Box<dyn Driver>,
        capacity: usize,
    ) -> Result<Self, Error> {
        let records = driver.load().await?;
        Ok(Self::from_records(driver, records, capacity))
    }

    fn from_records(driver: Box<dyn Driver>, records: Vec<Record>, capacity: usize) -> Self {
        let mut store = HistoryStore::with_capacity(capacity);
        store.import(into_snapshots(records));
        tracing::info!(
            "{} entries loaded from `{}`",
            store.len(),
            driver.path().display()
        );
        Self { store, driver }
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path { self.driver.path() }

    #[inline]
    #[must_use]
    pub const fn store(&self) -> &HistoryStore { &self.store }

    /// # Errors
    pub async fn lock(&self) -> Result<HistoryLock, Error> {
        HistoryLock::acquire(self.path()).await
    }

    /// # Errors
    pub async fn insert_text<S>(
        &mut self,
        text: S,
        now: OffsetDateTime,
    ) -> Result<InsertOutcome, Error>
    where
        S: Into<String>,
    {
        let _ = self.reload_if_changed().await?;
        let outcome = self.store.insert_text(text, now);
        if outcome.is_inserted() {
            self.save().await?;
        }
        Ok(outcome)
    }

    /// # Errors
    pub async fn insert_image<S>(
        &mut self,
        data: Bytes,
        ocr_text: S,
        now: OffsetDateTime,
    ) -> Result<InsertOutcome, Error>
    where
        S: Into<String>,
    {
        let _ = self.reload_if_changed().await?;
        let outcome = self.store.insert_image(data, ocr_text, now);
        self.save().await?;
        Ok(outcome)
    }

    /// # Errors
    pub async fn toggle_pin(&mut self, id: EntryId) -> Result<Option<bool>, Error> {
        let _ = self.reload_if_changed().await?;
        let pinned = self.store.toggle_pin(id);
        if pinned.is_some() {
            self.save().await?;
        }
        Ok(pinned)
    }

    /// # Errors
    pub async fn delete(&mut self, id: EntryId) -> Result<Option<Entry>, Error> {
        let _ = self.reload_if_changed().await?;
        let entry = self.store.delete(id);
        if entry.is_some() {
            self.save().await?;
        }
        Ok(entry)
    }

    /// # Errors
    pub async fn clear(&mut self) -> Result<(), Error> {
        let _ = self.reload_if_changed().await?;
        self.store.clear();
        self.save().await
    }

    /// # Errors
    pub async fn save(&mut self) -> Result<(), Error> {
        let records = self.store.export().iter().map(Record::from).collect::<Vec<_>>();
        self.driver.save(&records).await
    }

    /// Replaces the in-memory history with the file content if the file was
    /// changed by someone else. Returns `true` if the history was replaced.
    ///
    /// A file that became unreadable is moved aside and the in-memory history
    /// is kept, the next save writes it back.
    ///
    /// # Errors
    pub async fn reload_if_changed(&mut self) -> Result<bool, Error> {
        let records = match self.driver.load_if_changed().await {
            Ok(records) => records,
            Err(err @ Error::DeserializeHistory { .. }) => {
                tracing::error!("{err}, keeping the history in memory");
                self.driver.quarantine().await?;
                return Ok(false);
            },
            Err(err) => return Err(err),
        };

        match records {
            Some(records) => {
                self.store.import(into_snapshots(records));
                tracing::info!(
                    "History reloaded from `{}`, {} entries",
                    self.path().display(),
                    self.store.len()
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn into_snapshots(records: Vec<Record>) -> Vec<EntrySnapshot> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match EntrySnapshot::try_from(record) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::warn!("Skip history record #{index}, error: {err}");
                None
            }
        })
        .collect()
}
