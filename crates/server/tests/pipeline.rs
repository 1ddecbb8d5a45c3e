use std::sync::Arc;

use clipnest_clipboard::{ClipboardContent, ClipboardStore, ClipboardStoreExt, LocalClipboard};
use clipnest_server::{Capture, ClipboardWatcher, ClipboardWatcherOptions, Controller, Event};
use clipnest_store::HistoryManager;
use time::OffsetDateTime;

async fn poll_into(watcher: &mut ClipboardWatcher, controller: &mut Controller) {
    let captured_at = OffsetDateTime::now_utc();
    let event = match watcher.poll().await.unwrap() {
        Some(Capture::Text(text)) => Event::TextCaptured { text, captured_at },
        Some(Capture::Image(png)) => {
            Event::ImageCaptured { png, ocr_text: String::new(), captured_at }
        }
        None => return,
    };
    controller.handle(event).await;
}

#[tokio::test]
async fn test_clipboard_changes_reach_history_file() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("clipboard_history.json");

    let clipboard = LocalClipboard::new();
    let mut watcher = ClipboardWatcher::new(
        Arc::new(clipboard.clone()),
        ClipboardWatcherOptions::default(),
        None,
    );
    let mut controller = Controller::new(HistoryManager::load(&file_path, 25).await.unwrap());

    clipboard.store_string("first").unwrap();
    poll_into(&mut watcher, &mut controller).await;
    poll_into(&mut watcher, &mut controller).await;

    clipboard
        .store(ClipboardContent::Image { width: 1, height: 1, bytes: vec![9, 9, 9, 255].into() })
        .unwrap();
    poll_into(&mut watcher, &mut controller).await;

    clipboard.store_string("first").unwrap();
    poll_into(&mut watcher, &mut controller).await;

    let reloaded = HistoryManager::load(&file_path, 25).await.unwrap();
    let kinds = reloaded
        .store()
        .query(None)
        .into_iter()
        .map(|entry| entry.kind().to_string())
        .collect::<Vec<_>>();
    assert_eq!(kinds, vec!["image", "text"]);
}

#[tokio::test]
async fn test_restart_does_not_capture_newest_text_again() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("clipboard_history.json");

    let mut history = HistoryManager::load(&file_path, 25).await.unwrap();
    let _ = history.insert_text("kept", OffsetDateTime::now_utc()).await.unwrap();
    let last_text = history.store().latest_text().map(ToString::to_string);

    let clipboard = LocalClipboard::new();
    clipboard.store_string("kept").unwrap();
    let mut watcher =
        ClipboardWatcher::new(Arc::new(clipboard), ClipboardWatcherOptions::default(), last_text);
    assert_eq!(watcher.poll().await.unwrap(), None);
}
