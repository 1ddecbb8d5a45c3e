use std::path::PathBuf;

use clipnest_preview::OcrEngine;

use crate::ClipboardWatcherOptions;

#[derive(Clone, Debug)]
pub struct Config {
    pub max_history: usize,

    pub history_file_path: PathBuf,

    pub watcher: ClipboardWatcherOptions,

    /// Text recognition for captured images, `None` disables it.
    pub ocr: Option<OcrEngine>,
}
