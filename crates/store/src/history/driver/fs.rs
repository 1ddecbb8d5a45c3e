use std::{
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use snafu::ResultExt;
use time::OffsetDateTime;

use crate::{
    history::{driver::Driver, error, Error},
    Record,
};

/// Keeps the history as a JSON array in a single file.
///
/// Every save rewrites the whole file through a temporary sibling and an
/// atomic rename.
pub struct FileSystemDriver {
    file_path: PathBuf,
    last_digest: Option<Vec<u8>>,
}

impl FileSystemDriver {
    pub fn new<P>(file_path: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self { file_path: file_path.as_ref().to_path_buf(), last_digest: None }
    }

    async fn read(&self) -> Result<Option<Vec<u8>>, Error> {
        match tokio::fs::read(&self.file_path).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(Error::ReadFile { source, file_path: self.file_path.clone() }),
        }
    }

    fn parse(&self, content: &[u8]) -> Result<Vec<Record>, Error> {
        serde_json::from_slice(content)
            .with_context(|_| error::DeserializeHistorySnafu { file_path: self.file_path.clone() })
    }

    fn temporary_file_path(&self) -> PathBuf { sibling_path(&self.file_path, ".tmp") }
}

#[async_trait]
impl Driver for FileSystemDriver {
    fn path(&self) -> &Path { &self.file_path }

    async fn load(&mut self) -> Result<Vec<Record>, Error> {
        let Some(content) = self.read().await? else {
            tracing::info!("History file `{}` does not exist", self.file_path.display());
            self.last_digest = Some(digest(&[]));
            return Ok(Vec::new());
        };

        let records = self.parse(&content)?;
        self.last_digest = Some(digest(&content));
        Ok(records)
    }

    async fn load_if_changed(&mut self) -> Result<Option<Vec<Record>>, Error> {
        let content = self.read().await?.unwrap_or_default();
        let new_digest = digest(&content);
        if self.last_digest.as_deref() == Some(new_digest.as_slice()) {
            return Ok(None);
        }

        let records = if content.is_empty() { Vec::new() } else { self.parse(&content)? };
        self.last_digest = Some(new_digest);
        Ok(Some(records))
    }

    async fn save(&mut self, records: &[Record]) -> Result<(), Error> {
        let content = serde_json::to_vec(records).context(error::SerializeHistorySnafu)?;

        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .context(error::CreateDirectorySnafu { file_path: parent.to_path_buf() })?;
        }

        let tmp_file_path = self.temporary_file_path();
        tokio::fs::write(&tmp_file_path, &content)
            .await
            .context(error::WriteFileSnafu { file_path: tmp_file_path.clone() })?;
        tokio::fs::rename(&tmp_file_path, &self.file_path).await.context(
            error::RenameFileSnafu { from: tmp_file_path, to: self.file_path.clone() },
        )?;

        self.last_digest = Some(digest(&content));
        tracing::debug!("{} record(s) saved to `{}`", records.len(), self.file_path.display());
        Ok(())
    }

    async fn quarantine(&mut self) -> Result<(), Error> {
        let suffix = format!(".corrupted-{}", OffsetDateTime::now_utc().unix_timestamp());
        let backup_path = sibling_path(&self.file_path, &suffix);
        tokio::fs::rename(&self.file_path, &backup_path).await.context(
            error::RenameFileSnafu { from: self.file_path.clone(), to: backup_path.clone() },
        )?;
        tracing::warn!("Corrupted history is moved to `{}`", backup_path.display());
        self.last_digest = Some(digest(&[]));
        Ok(())
    }
}

pub(crate) fn sibling_path(file_path: &Path, suffix: &str) -> PathBuf {
    let mut file_name = file_path.file_name().map_or_else(OsString::new, OsString::from);
    file_name.push(suffix);
    file_path.with_file_name(file_name)
}

fn digest(content: &[u8]) -> Vec<u8> { Sha256::digest(content).to_vec() }
