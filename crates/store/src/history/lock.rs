use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
};

use fs2::FileExt;
use snafu::ResultExt;

use crate::history::{driver::sibling_path, error, Error};

/// Exclusive advisory lock on `<history file>.lock`.
///
/// Every process that changes the history holds it from reading the file to
/// writing it back. The lock is released when the value is dropped.
#[derive(Debug)]
pub struct HistoryLock {
    _file: File,
    path: PathBuf,
}

impl HistoryLock {
    /// Waits until no other process holds the lock of `history_file_path`.
    ///
    /// # Errors
    /// Returns an error if the lock file can not be created or locked.
    pub async fn acquire<P>(history_file_path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let path = sibling_path(history_file_path.as_ref(), ".lock");
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .context(error::CreateDirectorySnafu { file_path: parent.to_path_buf() })?;
        }

        let lock_path = path.clone();
        let file = tokio::task::spawn_blocking(move || {
            let file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&lock_path)?;
            file.lock_exclusive()?;
            Ok::<_, std::io::Error>(file)
        })
        .await
        .context(error::JoinLockTaskSnafu)?
        .context(error::LockFileSnafu { file_path: path.clone() })?;

        tracing::trace!("History lock `{}` acquired", path.display());
        Ok(Self { _file: file, path })
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path { &self.path }
}
