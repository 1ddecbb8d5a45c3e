use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Could not create clipboard, error: {source}"))]
    CreateClipboard { source: clipnest_clipboard::Error },

    #[snafu(display("Could not load history, error: {source}"))]
    LoadHistory { source: clipnest_store::HistoryError },

    #[snafu(display("Could not save history, error: {source}"))]
    SaveHistory { source: clipnest_store::HistoryError },

    #[snafu(display("Could not create file watcher, error: {source}"))]
    CreateFileWatcher { source: notify::Error },

    #[snafu(display("Could not watch `{}`, error: {source}", path.display()))]
    WatchFile { path: std::path::PathBuf, source: notify::Error },

    #[snafu(display("{source}"))]
    ClipboardWatcher { source: crate::watcher::Error },

    #[snafu(display("Event channel is closed"))]
    EventChannelClosed,
}
