pub mod config;
mod controller;
mod error;
mod event;
mod history_watcher;
mod ocr;
mod watcher;

use std::{future::Future, pin::Pin, sync::Arc};

use clipnest_clipboard::{Clipboard, ClipboardLoad};
use clipnest_store::HistoryManager;
use futures::FutureExt;
use sigfinn::{ExitStatus, LifecycleManager, Shutdown};
use snafu::ResultExt;
use tokio::sync::mpsc;

pub use self::{
    config::Config,
    controller::Controller,
    error::{Error, Result},
    event::{CapturedImage, Event},
    ocr::OcrWorker,
    watcher::{Capture, ClipboardWatcher, ClipboardWatcherOptions},
};

/// # Errors
///
/// This function will return an error if the server fails to start.
pub async fn serve_with_shutdown(config: Config) -> Result<()> {
    let clipboard = Clipboard::new().context(error::CreateClipboardSnafu)?;
    serve_with_clipboard(config, Arc::new(clipboard)).await
}

/// Runs the daemon on top of any clipboard.
///
/// # Errors
///
/// This function will return an error if the history can not be loaded or a
/// worker fails.
pub async fn serve_with_clipboard(
    Config { max_history, history_file_path, watcher: watcher_opts, ocr }: Config,
    clipboard: Arc<dyn ClipboardLoad>,
) -> Result<()> {
    tracing::info!("History file path: `{path}`", path = history_file_path.display());
    let history = HistoryManager::load_or_recover(&history_file_path, max_history)
        .await
        .context(error::LoadHistorySnafu)?;
    tracing::info!(
        "Initialize history with capacity {capacity}",
        capacity = history.store().capacity()
    );
    let last_text = history.store().latest_text().map(ToString::to_string);

    let (event_sender, event_receiver) = mpsc::unbounded_channel();
    let (image_sender, image_receiver) = mpsc::unbounded_channel();

    let file_watcher = history_watcher::create_watcher(&history_file_path, event_sender.clone())
        .map_err(|err| tracing::warn!("History file changes will not be picked up, {err}"))
        .ok();

    let clipboard_watcher = ClipboardWatcher::new(clipboard, watcher_opts, last_text);
    let ocr_worker = OcrWorker::new(ocr, image_receiver, event_sender.clone());
    let controller = Controller::new(history);

    let lifecycle_manager = LifecycleManager::<Error>::new();
    let _handle = lifecycle_manager
        .spawn(
            "Clipboard watcher",
            create_clipboard_watcher_future(clipboard_watcher, event_sender, image_sender),
        )
        .spawn("OCR worker", create_ocr_worker_future(ocr_worker))
        .spawn("History controller", create_controller_future(controller, event_receiver));

    let result = lifecycle_manager.serve().await;
    drop(file_watcher);
    if let Ok(Err(err)) = result {
        tracing::error!("{err}");
        Err(err)
    } else {
        Ok(())
    }
}

fn create_clipboard_watcher_future(
    watcher: ClipboardWatcher,
    event_sender: mpsc::UnboundedSender<Event>,
    image_sender: mpsc::UnboundedSender<CapturedImage>,
) -> impl FnOnce(Shutdown) -> Pin<Box<dyn Future<Output = ExitStatus<Error>> + Send>> {
    move |shutdown_signal| {
        async move {
            match watcher
                .serve(event_sender, image_sender, shutdown_signal)
                .await
                .context(error::ClipboardWatcherSnafu)
            {
                Ok(()) => {
                    tracing::info!("Clipboard watcher is shut down gracefully");
                    ExitStatus::Success
                }
                Err(err) => ExitStatus::Failure(err),
            }
        }
        .boxed()
    }
}

fn create_ocr_worker_future(
    worker: OcrWorker,
) -> impl FnOnce(Shutdown) -> Pin<Box<dyn Future<Output = ExitStatus<Error>> + Send>> {
    move |shutdown_signal| {
        async move {
            match worker.serve(shutdown_signal).await {
                Ok(()) => {
                    tracing::info!("OCR worker is shut down gracefully");
                    ExitStatus::Success
                }
                Err(err) => ExitStatus::Failure(err),
            }
        }
        .boxed()
    }
}

fn create_controller_future(
    controller: Controller,
    event_receiver: mpsc::UnboundedReceiver<Event>,
) -> impl FnOnce(Shutdown) -> Pin<Box<dyn Future<Output = ExitStatus<Error>> + Send>> {
    move |shutdown_signal| {
        async move {
            match controller.serve(event_receiver, shutdown_signal).await {
                Ok(()) => {
                    tracing::info!("History controller is shut down gracefully");
                    ExitStatus::Success
                }
                Err(err) => ExitStatus::Failure(err),
            }
        }
        .boxed()
    }
}
