mod fs;

use std::path::Path;

use async_trait::async_trait;

pub use self::fs::FileSystemDriver;
pub(crate) use self::fs::sibling_path;
use crate::{history::Error, Record};

#[async_trait]
pub trait Driver: Send + Sync {
    fn path(&self) -> &Path;

    /// Reads all records, an absent history yields an empty list.
    async fn load(&mut self) -> Result<Vec<Record>, Error>;

    /// Like [`Driver::load`], but returns `None` when the stored content is
    /// the same as the one last loaded or saved through this driver.
    async fn load_if_changed(&mut self) -> Result<Option<Vec<Record>>, Error>;

    /// Replaces the stored history with `records`.
    async fn save(&mut self, records: &[Record]) -> Result<(), Error>;

    /// Moves unreadable history out of the way so it is not overwritten.
    async fn quarantine(&mut self) -> Result<(), Error>;
}
