use clipnest_store::HistoryManager;
use futures::{FutureExt, StreamExt};
use snafu::ResultExt;
use tokio::sync::mpsc;

use crate::{error, event::Event, Error};

/// Applies [`Event`]s to the history one at a time.
pub struct Controller {
    history: HistoryManager,
}

impl Controller {
    #[inline]
    pub const fn new(history: HistoryManager) -> Self { Self { history } }

    #[inline]
    pub const fn history(&self) -> &HistoryManager { &self.history }

    /// Persistence failures are logged, the in-memory history stays usable.
    pub async fn handle(&mut self, event: Event) {
        let _lock = match self.history.lock().await {
            Ok(lock) => Some(lock),
            Err(err) => {
                tracing::warn!("Update history without lock, error: {err}");
                None
            },
        };

        let result = match event {
            Event::TextCaptured { text, .. } if self.is_recognized_text(&text) => {
                tracing::debug!("Skip text recognized from an image in history");
                Ok(())
            },
            Event::TextCaptured { text, captured_at } => {
                self.history.insert_text(text, captured_at).await.map(|outcome| {
                    if outcome.is_inserted() {
                        tracing::info!("New text entry {}", outcome.id());
                    } else {
                        tracing::debug!("Text is already in history as {}", outcome.id());
                    }
                })
            }
            Event::ImageCaptured { png, ocr_text, captured_at } => self
                .history
                .insert_image(png, ocr_text, captured_at)
                .await
                .map(|outcome| tracing::info!("New image entry {}", outcome.id())),
            Event::HistoryFileChanged => self.history.reload_if_changed().await.map(|_| ()),
        };

        if let Err(err) = result {
            tracing::warn!("Failed to update history, error: {err}");
        }
    }

    /// Text put on the clipboard from an image entry is not a new capture.
    fn is_recognized_text(&self, text: &str) -> bool {
        !text.is_empty()
            && self.history.store().iter().any(|entry| entry.ocr_text() == Some(text))
    }

    /// Handles events until shutdown or until every sender is gone, then
    /// saves the history.
    ///
    /// # Errors
    /// Returns an error if the final save fails.
    #[allow(clippy::redundant_pub_crate)]
    pub async fn serve(
        mut self,
        mut event_receiver: mpsc::UnboundedReceiver<Event>,
        shutdown_signal: sigfinn::Shutdown,
    ) -> Result<(), Error> {
        let mut shutdown_signal = shutdown_signal.into_stream();
        loop {
            let event = tokio::select! {
                event = event_receiver.recv() => event,
                _ = shutdown_signal.next() => break,
            };
            let Some(event) = event else {
                tracing::info!("All event senders are closed");
                break;
            };
            self.handle(event).await;
        }

        let _lock = match self.history.lock().await {
            Ok(lock) => Some(lock),
            Err(err) => {
                tracing::warn!("Save history without lock, error: {err}");
                None
            },
        };
        // pick up changes made while the daemon was running before overwriting them
        if let Err(err) = self.history.reload_if_changed().await {
            tracing::warn!("Could not reload history before saving, error: {err}");
        }
        self.history.save().await.context(error::SaveHistorySnafu)?;
        tracing::info!(
            "{} entries are stored in `{}`",
            self.history.store().len(),
            self.history.path().display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clipnest_store::HistoryManager;
    use time::{Duration, OffsetDateTime};

    use super::Controller;
    use crate::event::Event;

    fn at(seconds: i64) -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH + Duration::seconds(seconds)
    }

    #[tokio::test]
    async fn test_handle_events() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("clipboard_history.json");
        let mut controller =
            Controller::new(HistoryManager::load(&file_path, 25).await.unwrap());

        controller.handle(Event::TextCaptured { text: "a".to_string(), captured_at: at(1) }).await;
        controller.handle(Event::TextCaptured { text: "a".to_string(), captured_at: at(2) }).await;
        controller
            .handle(Event::ImageCaptured {
                png: vec![1, 2, 3].into(),
                ocr_text: "hello".to_string(),
                captured_at: at(3),
            })
            .await;

        let store = controller.history().store();
        assert_eq!(store.len(), 2);
        assert_eq!(store.query(None)[0].ocr_text(), Some("hello"));
        assert_eq!(store.query(None)[1].timestamp(), at(1));

        let mut other = HistoryManager::load(&file_path, 25).await.unwrap();
        other.clear().await.unwrap();
        controller.handle(Event::HistoryFileChanged).await;
        assert!(controller.history().store().is_empty());
    }

    #[tokio::test]
    async fn test_recognized_text_is_not_captured() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("clipboard_history.json");
        let mut controller =
            Controller::new(HistoryManager::load(&file_path, 25).await.unwrap());

        controller
            .handle(Event::ImageCaptured {
                png: vec![1, 2, 3].into(),
                ocr_text: "Invoice 42".to_string(),
                captured_at: at(1),
            })
            .await;
        controller
            .handle(Event::TextCaptured { text: "Invoice 42".to_string(), captured_at: at(2) })
            .await;
        assert_eq!(controller.history().store().len(), 1);

        controller
            .handle(Event::TextCaptured { text: "Invoice".to_string(), captured_at: at(3) })
            .await;
        assert_eq!(controller.history().store().len(), 2);
    }

    #[tokio::test]
    async fn test_ctl_delete_is_not_undone() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("clipboard_history.json");
        let mut controller =
            Controller::new(HistoryManager::load(&file_path, 25).await.unwrap());
        controller
            .handle(Event::TextCaptured { text: "secret".to_string(), captured_at: at(1) })
            .await;

        let mut ctl = HistoryManager::load(&file_path, 25).await.unwrap();
        let id = ctl.store().resolve_display_index(0, None).unwrap();
        let _ = ctl.delete(id).await.unwrap();

        // the change notification is still queued when the next capture arrives
        controller
            .handle(Event::TextCaptured { text: "next".to_string(), captured_at: at(2) })
            .await;
        controller.handle(Event::HistoryFileChanged).await;

        let stored = HistoryManager::load(&file_path, 25).await.unwrap();
        let texts = stored.store().iter().filter_map(|entry| entry.as_text()).collect::<Vec<_>>();
        assert_eq!(texts, vec!["next"]);
        assert_eq!(controller.history().store().len(), 1);
    }
}
