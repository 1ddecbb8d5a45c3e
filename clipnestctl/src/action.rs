use std::path::{Path, PathBuf};

use bytes::Bytes;
use clipnest_base::ClipboardContent;
use clipnest_clipboard::{Clipboard, ClipboardStore};
use clipnest_preview::{url, MetadataFetcher, ScreenshotCapturer};
use clipnest_store::{Entry, EntryContent, HistoryLock, HistoryManager, HistoryStore};
use snafu::{OptionExt, ResultExt};
use tokio::{io::AsyncWriteExt, process::Command};

use crate::{
    config::Config,
    error::{self, Error},
};

/// What the double-click action does with an entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Activation {
    CopyText(String),

    CopyImage(Bytes),

    OpenUrl(String),
}

impl Activation {
    /// Images with recognized text yield that text, URLs are opened and any
    /// other text is copied.
    pub fn of(entry: &Entry) -> Self {
        match entry.content() {
            EntryContent::Image { ocr_text, .. } if !ocr_text.is_empty() => {
                Self::CopyText(ocr_text.clone())
            }
            EntryContent::Image { data, .. } => Self::CopyImage(data.clone()),
            EntryContent::Text(text) if url::is_url(text) => Self::OpenUrl(url::normalize_url(text)),
            EntryContent::Text(text) => Self::CopyText(text.clone()),
        }
    }
}

/// Lines printed by `list`, in display order.
pub fn list_lines(store: &HistoryStore, filter: Option<&str>, preview_length: usize) -> Vec<String> {
    store
        .query(filter)
        .into_iter()
        .enumerate()
        .map(|(index, entry)| format!("{index}  {}", entry.display_line(Some(preview_length))))
        .collect()
}

/// Finds the entry shown at `index` of the listing filtered by `filter`.
pub fn select<'a>(
    store: &'a HistoryStore,
    index: usize,
    filter: Option<&str>,
) -> Result<&'a Entry, Error> {
    store
        .resolve_display_index(index, filter)
        .and_then(|id| store.get(id))
        .context(error::NoSuchEntrySnafu { index })
}

pub struct Context {
    config: Config,
}

impl Context {
    pub const fn new(config: Config) -> Self { Self { config } }

    #[inline]
    pub const fn config(&self) -> &Config { &self.config }

    /// Loads the history for reading, a corrupted file is reported.
    pub async fn history(&self) -> Result<HistoryManager, Error> {
        Ok(HistoryManager::load(&self.config.history_file_path, self.config.max_history).await?)
    }

    /// Loads the history for changing it, a corrupted file is moved aside.
    ///
    /// The daemon waits for the returned lock before touching the file, keep
    /// it until the change is saved.
    pub async fn history_for_update(&self) -> Result<(HistoryLock, HistoryManager), Error> {
        let lock = HistoryLock::acquire(&self.config.history_file_path).await?;
        let history =
            HistoryManager::load_or_recover(&self.config.history_file_path, self.config.max_history)
                .await?;
        Ok((lock, history))
    }

    pub async fn store_clipboard(&self, content: ClipboardContent) -> Result<(), Error> {
        let wait = self.config.serve_until_replaced;
        tokio::task::spawn_blocking(move || {
            Clipboard::new()?.wait_until_replaced(wait).store(content)
        })
        .await
        .context(error::JoinTaskSnafu)??;
        Ok(())
    }

    pub async fn copy_text(&self, text: &str) -> Result<(), Error> {
        println!("Copied: {}", abbreviate(text, self.config.preview_length));
        self.store_clipboard(ClipboardContent::Plaintext(text.to_string())).await
    }

    pub async fn copy_image(&self, png: &[u8]) -> Result<(), Error> {
        let content = ClipboardContent::from_png(png).context(error::DecodeImageSnafu)?;
        println!("Copied image: {}", content.basic_information());
        self.store_clipboard(content).await
    }

    pub async fn open(&self, target: &str) -> Result<(), Error> {
        let program = &self.config.opener_program;
        tracing::debug!("Open `{target}` with `{program}`");
        let status = Command::new(program)
            .arg(target)
            .status()
            .await
            .context(error::CallOpenerSnafu { program: program.clone() })?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::OpenerFailed { program: program.clone(), status })
        }
    }

    pub async fn activate(&self, entry: &Entry) -> Result<(), Error> {
        match Activation::of(entry) {
            Activation::CopyText(text) => self.copy_text(&text).await,
            Activation::CopyImage(png) => self.copy_image(&png).await,
            Activation::OpenUrl(url) => {
                println!("Opening URL: {}", abbreviate(&url, self.config.preview_length));
                self.open(&url).await
            }
        }
    }

    pub async fn preview(&self, entry: &Entry, with_screenshot: bool) -> Result<(), Error> {
        match entry.content() {
            EntryContent::Image { ocr_text, .. } => {
                println!("Image Preview: {}", entry.basic_information());
                if !ocr_text.is_empty() {
                    println!("Text: {}", abbreviate(ocr_text, self.config.preview_length));
                }
                Ok(())
            }
            EntryContent::Text(text) if url::is_url(text) => {
                self.preview_url(text.trim(), with_screenshot).await
            }
            EntryContent::Text(_) => {
                println!("No preview for plain text");
                Ok(())
            }
        }
    }

    async fn preview_url(&self, url: &str, with_screenshot: bool) -> Result<(), Error> {
        let preview = &self.config.preview;
        let fetcher = MetadataFetcher::new(preview.request_timeout(), preview.favicon_timeout())
            .context(error::PreviewSnafu)?;
        let capturer = ScreenshotCapturer::new(
            &self.config.screenshot_cache_dir,
            preview.browser_program.clone(),
            preview.screenshot_timeout(),
        );

        let metadata_future = async {
            let metadata = fetcher.fetch(url).await;
            let favicon = match &metadata.favicon_url {
                Some(favicon_url) => fetcher.fetch_favicon(favicon_url).await,
                None => None,
            };
            (metadata, favicon)
        };
        let screenshot_future = async {
            if with_screenshot {
                capturer.capture(url).await
            } else {
                None
            }
        };
        let ((metadata, favicon), screenshot) = tokio::join!(metadata_future, screenshot_future);

        println!("Title: {}", metadata.title);
        println!("Description: {}", metadata.description);
        println!("URL: {}", metadata.url);
        if let Some(favicon_url) = &metadata.favicon_url {
            match favicon {
                Some(favicon) => println!("Favicon: {favicon_url} ({} bytes)", favicon.len()),
                None => println!("Favicon: {favicon_url} (unavailable)"),
            }
        }
        if with_screenshot {
            match screenshot {
                Some(path) => println!("Screenshot: {}", path.display()),
                None => println!("Screenshot failed"),
            }
        }
        Ok(())
    }
}

/// Writes the PNG of an image entry to `file_path` or to a temporary file.
pub async fn save_image(png: &[u8], file_path: Option<PathBuf>) -> Result<PathBuf, Error> {
    let file_path = file_path.unwrap_or_else(default_image_path);
    write_file(&file_path, png).await?;
    Ok(file_path)
}

fn default_image_path() -> PathBuf {
    std::env::temp_dir().join(format!("{}_clipboard_image.png", clipnest_base::PROJECT_NAME))
}

async fn write_file(file_path: &Path, data: &[u8]) -> Result<(), Error> {
    let mut file = tokio::fs::File::create(file_path)
        .await
        .context(error::WriteFileSnafu { filename: file_path.to_path_buf() })?;
    file.write_all(data).await.context(error::WriteFileSnafu { filename: file_path.to_path_buf() })
}

fn abbreviate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use clipnest_store::HistoryStore;
    use time::{Duration, OffsetDateTime};

    use super::{abbreviate, list_lines, select, Activation};

    fn at(seconds: i64) -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH + Duration::seconds(seconds)
    }

    fn sample_store() -> HistoryStore {
        let mut store = HistoryStore::new();
        let _ = store.insert_text("plain words", at(1));
        let _ = store.insert_text("example.com", at(2));
        let _ = store.insert_image(vec![1, 2, 3].into(), "", at(3));
        let _ = store.insert_image(vec![4, 5, 6].into(), "scanned", at(4));
        store
    }

    #[test]
    fn test_activation() {
        let store = sample_store();
        let activation = |index| Activation::of(select(&store, index, None).unwrap());

        assert_eq!(activation(0), Activation::CopyText("scanned".to_string()));
        assert_eq!(activation(1), Activation::CopyImage(vec![1, 2, 3].into()));
        assert_eq!(activation(2), Activation::OpenUrl("http://example.com".to_string()));
        assert_eq!(activation(3), Activation::CopyText("plain words".to_string()));
    }

    #[test]
    fn test_select_with_filter() {
        let store = sample_store();
        assert_eq!(select(&store, 2, Some("WORDS")).unwrap().as_text(), Some("plain words"));
        assert!(select(&store, 3, Some("words")).is_err());
        assert!(select(&store, 10, None).is_err());
    }

    #[test]
    fn test_list_lines() {
        let store = sample_store();
        let lines = list_lines(&store, Some("example"), 50);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("0  ["));
        assert!(lines[0].ends_with("[IMAGE: scanned...]"));
        assert!(lines[1].ends_with("[IMAGE]"));
        assert!(lines[2].starts_with("2  ["));
        assert!(lines[2].ends_with("example.com"));
    }

    #[test]
    fn test_abbreviate() {
        assert_eq!(abbreviate("hello", 10), "hello");
        assert_eq!(abbreviate("hello world", 5), "hello...");
    }
}
