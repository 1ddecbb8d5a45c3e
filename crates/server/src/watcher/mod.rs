mod error;
mod options;

use std::sync::Arc;

use bytes::Bytes;
use clipnest_clipboard::{ClipboardContent, ClipboardLoad, Error as ClipboardError};
use futures::{FutureExt, StreamExt};
use snafu::ResultExt;
use time::OffsetDateTime;
use tokio::sync::mpsc;

pub use self::{error::Error, options::Options as ClipboardWatcherOptions};
use crate::event::{CapturedImage, Event};

/// Something new seen on the clipboard.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Capture {
    Text(String),

    Image(Bytes),
}

/// Polls the clipboard and reports content that differs from the last value
/// seen of the same kind.
pub struct ClipboardWatcher {
    clipboard: Arc<dyn ClipboardLoad>,

    opts: ClipboardWatcherOptions,

    last_text: Option<String>,

    // raw RGBA pixels of the last image
    last_image: Option<Bytes>,
}

impl ClipboardWatcher {
    pub fn new(
        clipboard: Arc<dyn ClipboardLoad>,
        opts: ClipboardWatcherOptions,
        last_text: Option<String>,
    ) -> Self {
        Self { clipboard, opts, last_text, last_image: None }
    }

    /// Reads the clipboard once.
    ///
    /// # Errors
    /// Returns an error if the blocking clipboard task could not complete.
    pub async fn poll(&mut self) -> Result<Option<Capture>, Error> {
        let clipboard = self.clipboard.clone();
        let content = tokio::task::spawn_blocking(move || clipboard.load())
            .await
            .context(error::JoinClipboardTaskSnafu)?;

        match content {
            Ok(ClipboardContent::Plaintext(text)) => Ok(self.on_text(text)),
            Ok(ClipboardContent::Image { width, height, bytes }) => {
                Ok(self.on_image(width, height, bytes).await)
            }
            Err(ClipboardError::Empty) => Ok(None),
            Err(err) => {
                tracing::debug!("Failed to load clipboard, error: {err}");
                Ok(None)
            }
        }
    }

    fn on_text(&mut self, text: String) -> Option<Capture> {
        if text.trim().is_empty() || self.last_text.as_deref() == Some(text.as_str()) {
            return None;
        }

        self.last_text = Some(text.clone());
        if text.chars().count() > self.opts.filter_text_max_length {
            tracing::info!(
                "Text is longer than {} characters, ignored",
                self.opts.filter_text_max_length
            );
            return None;
        }

        Some(Capture::Text(text))
    }

    async fn on_image(&mut self, width: usize, height: usize, bytes: Bytes) -> Option<Capture> {
        if !self.opts.capture_image || bytes.is_empty() || self.last_image.as_ref() == Some(&bytes)
        {
            return None;
        }

        self.last_image = Some(bytes.clone());
        let content = ClipboardContent::Image { width, height, bytes };
        let png = match tokio::task::spawn_blocking(move || content.to_png()).await {
            Ok(Ok(png)) => png,
            Ok(Err(err)) => {
                tracing::warn!("Could not encode image, error: {err}");
                return None;
            }
            Err(err) => {
                tracing::warn!("Image encoding task failed, error: {err}");
                return None;
            }
        };

        if png.len() > self.opts.filter_image_max_size {
            tracing::info!(
                "Image of {} bytes is larger than {} bytes, ignored",
                png.len(),
                self.opts.filter_image_max_size
            );
            return None;
        }

        Some(Capture::Image(png))
    }

    /// Polls until shutdown, texts go to the control loop and images to the
    /// text recognition worker.
    ///
    /// # Errors
    /// Returns an error if a receiver is gone.
    #[allow(clippy::redundant_pub_crate)]
    pub async fn serve(
        mut self,
        event_sender: mpsc::UnboundedSender<Event>,
        image_sender: mpsc::UnboundedSender<CapturedImage>,
        shutdown_signal: sigfinn::Shutdown,
    ) -> Result<(), Error> {
        let mut shutdown_signal = shutdown_signal.into_stream();
        let mut interval = tokio::time::interval(self.opts.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        tracing::info!("Watch clipboard every {:?}", self.opts.poll_interval);
        loop {
            tokio::select! {
                _ = interval.tick() => {},
                _ = shutdown_signal.next() => return Ok(()),
            }

            let captured_at = OffsetDateTime::now_utc();
            match self.poll().await? {
                Some(Capture::Text(text)) => {
                    tracing::debug!("New text of {} bytes", text.len());
                    event_sender
                        .send(Event::TextCaptured { text, captured_at })
                        .map_err(|_| Error::SendClipboardEvent)?;
                }
                Some(Capture::Image(png)) => {
                    tracing::debug!("New image of {} bytes", png.len());
                    image_sender
                        .send(CapturedImage { png, captured_at })
                        .map_err(|_| Error::SendClipboardEvent)?;
                }
                None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use clipnest_clipboard::{ClipboardContent, ClipboardStore, ClipboardStoreExt, LocalClipboard};

    use super::{Capture, ClipboardWatcher, ClipboardWatcherOptions};

    fn image(pixel: u8) -> ClipboardContent {
        ClipboardContent::Image { width: 2, height: 2, bytes: vec![pixel; 16].into() }
    }

    fn watcher(clipboard: &LocalClipboard, last_text: Option<&str>) -> ClipboardWatcher {
        ClipboardWatcher::new(
            Arc::new(clipboard.clone()),
            ClipboardWatcherOptions::default(),
            last_text.map(ToString::to_string),
        )
    }

    #[tokio::test]
    async fn test_text_changes() {
        let clipboard = LocalClipboard::new();
        let mut watcher = watcher(&clipboard, None);
        assert_eq!(watcher.poll().await.unwrap(), None);

        clipboard.store_string("hello").unwrap();
        assert_eq!(watcher.poll().await.unwrap(), Some(Capture::Text("hello".to_string())));
        assert_eq!(watcher.poll().await.unwrap(), None);

        clipboard.store_string("   \n").unwrap();
        assert_eq!(watcher.poll().await.unwrap(), None);

        clipboard.store_string("world").unwrap();
        assert_eq!(watcher.poll().await.unwrap(), Some(Capture::Text("world".to_string())));
    }

    #[tokio::test]
    async fn test_seeded_text_is_not_captured_again() {
        let clipboard = LocalClipboard::new();
        clipboard.store_string("restored").unwrap();
        let mut watcher = watcher(&clipboard, Some("restored"));
        assert_eq!(watcher.poll().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_long_text_is_ignored() {
        let clipboard = LocalClipboard::new();
        let mut watcher = ClipboardWatcher::new(
            Arc::new(clipboard.clone()),
            ClipboardWatcherOptions { filter_text_max_length: 4, ..Default::default() },
            None,
        );
        clipboard.store_string("abcde").unwrap();
        assert_eq!(watcher.poll().await.unwrap(), None);
        clipboard.store_string("abcd").unwrap();
        assert_eq!(watcher.poll().await.unwrap(), Some(Capture::Text("abcd".to_string())));
    }

    #[tokio::test]
    async fn test_image_changes() {
        let clipboard = LocalClipboard::new();
        let mut watcher = watcher(&clipboard, None);

        clipboard.store(image(1)).unwrap();
        let Some(Capture::Image(png)) = watcher.poll().await.unwrap() else {
            panic!("image is expected");
        };
        assert_eq!(ClipboardContent::from_png(&png).unwrap(), image(1));
        assert_eq!(watcher.poll().await.unwrap(), None);

        clipboard.store(image(2)).unwrap();
        assert!(matches!(watcher.poll().await.unwrap(), Some(Capture::Image(_))));
    }

    #[tokio::test]
    async fn test_image_capture_disabled() {
        let clipboard = LocalClipboard::with_content(image(1));
        let mut watcher = ClipboardWatcher::new(
            Arc::new(clipboard),
            ClipboardWatcherOptions { capture_image: false, ..Default::default() },
            None,
        );
        assert_eq!(watcher.poll().await.unwrap(), None);
    }
}
