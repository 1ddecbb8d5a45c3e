mod event_handler;

use std::path::Path;

use notify::{RecursiveMode, Watcher};
use snafu::ResultExt;
use tokio::sync::mpsc;

use self::event_handler::EventHandler;
use crate::{error, event::Event, Error};

/// Watches the directory of the history file, the file itself may be
/// replaced by a rename.
///
/// # Errors
/// Returns an error if the watcher can not be created or the directory can
/// not be watched.
pub fn create_watcher(
    file_path: &Path,
    event_sender: mpsc::UnboundedSender<Event>,
) -> Result<notify::RecommendedWatcher, Error> {
    let directory =
        file_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    if let Err(err) = std::fs::create_dir_all(directory) {
        tracing::warn!("Could not create directory `{}`, error: {err}", directory.display());
    }

    let event_handler = EventHandler::new(file_path, event_sender);
    let mut watcher =
        notify::recommended_watcher(event_handler).context(error::CreateFileWatcherSnafu)?;
    watcher
        .watch(directory, RecursiveMode::NonRecursive)
        .context(error::WatchFileSnafu { path: directory.to_path_buf() })?;
    tracing::info!("Watch history file `{}`", file_path.display());
    Ok(watcher)
}
