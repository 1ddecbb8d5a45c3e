use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to read file {}, error: {source}", file_path.display()))]
    ReadFile { source: std::io::Error, file_path: PathBuf },

    #[snafu(display("Failed to write file {}, error: {source}", file_path.display()))]
    WriteFile { source: std::io::Error, file_path: PathBuf },

    #[snafu(display("Failed to create directory {}, error: {source}", file_path.display()))]
    CreateDirectory { source: std::io::Error, file_path: PathBuf },

    #[snafu(display("Failed to rename {} to {}, error: {source}", from.display(), to.display()))]
    RenameFile { source: std::io::Error, from: PathBuf, to: PathBuf },

    #[snafu(display("Failed to lock {}, error: {source}", file_path.display()))]
    LockFile { source: std::io::Error, file_path: PathBuf },

    #[snafu(display("Failed to wait for history lock, error: {source}"))]
    JoinLockTask { source: tokio::task::JoinError },

    #[snafu(display("Failed to serialize history, error: {source}"))]
    SerializeHistory { source: serde_json::Error },

    #[snafu(display("History file {} is corrupted, error: {source}", file_path.display()))]
    DeserializeHistory { source: serde_json::Error, file_path: PathBuf },
}
